use extractor_core::text::normalize_whitespace;
use extractor_core::Thread;

/// Plain-text rendering of a thread: the title, the post body when present,
/// a blank line, then one indented line per kept comment.
pub fn render_transcript(thread: &Thread) -> String {
    let mut lines = vec![thread.post.title.trim().to_string()];
    let body = normalize_whitespace(&thread.post.selftext);
    if !body.is_empty() {
        lines.push(body);
    }
    lines.push(String::new());

    for comment in &thread.comments {
        lines.push(format!(
            "{}[{}] (d={}) {}: {}",
            "  ".repeat(comment.depth as usize),
            comment.score,
            comment.depth,
            comment.author,
            normalize_whitespace(&comment.body)
        ));
    }

    let mut rendered = lines.join("\n").trim().to_string();
    rendered.push('\n');
    rendered
}
