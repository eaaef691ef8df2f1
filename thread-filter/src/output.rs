use crate::transcript::render_transcript;
use extractor_core::text::{char_len, token_estimate};
use extractor_core::{Comment, ExtractionError, Post, Thread};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::info;

const SUBREDDIT_SLUG_LEN: usize = 24;
const TITLE_SLUG_LEN: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadStats {
    pub kept: usize,
    pub chars: usize,
    pub tokens: usize,
}

/// Counts over `title\nselftext\n` followed by the newline-joined comment
/// bodies.
pub fn thread_stats(post: &Post, comments: &[Comment]) -> ThreadStats {
    let bodies: Vec<&str> = comments.iter().map(|c| c.body.as_str()).collect();
    let all_text = format!("{}\n{}\n{}", post.title, post.selftext, bodies.join("\n"));
    ThreadStats {
        kept: comments.len(),
        chars: char_len(&all_text),
        tokens: token_estimate(&all_text),
    }
}

fn non_alphanumeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("static regex"))
}

fn unsafe_id_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_-]+").expect("static regex"))
}

/// Lowercase ASCII slug of at most `max_len` characters, `untitled` when
/// nothing survives.
pub fn slugify(value: &str, max_len: usize) -> String {
    let lowered = value.to_lowercase();
    let dashed = non_alphanumeric().replace_all(&lowered, "-");
    let truncated: String = dashed.trim_matches('-').chars().take(max_len).collect();
    let slug = truncated.trim_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

/// `r-<subreddit>__<title>__<id>.json`
pub fn json_filename(post: &Post) -> String {
    format!("{}.json", file_stem(post))
}

pub fn file_stem(post: &Post) -> String {
    // Ids end up in a path; anything that could form a separator or `..` goes.
    let post_id = match post.id.trim() {
        "" => "unknown".to_string(),
        id => unsafe_id_chars().replace_all(id, "_").into_owned(),
    };
    let subreddit = match post.subreddit.trim() {
        "" => "unknown",
        name => name,
    };
    format!(
        "r-{}__{}__{}",
        slugify(subreddit, SUBREDDIT_SLUG_LEN),
        slugify(&post.title, TITLE_SLUG_LEN),
        post_id
    )
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Also write a plain-text transcript next to the JSON file.
    pub transcript: bool,
}

/// Writes the thread as compact JSON into `out_dir` (created if missing) and
/// returns the written paths, JSON first.
pub fn save_outputs(
    thread: &Thread,
    out_dir: &Path,
    options: &OutputOptions,
) -> Result<Vec<PathBuf>, ExtractionError> {
    fs::create_dir_all(out_dir)?;

    let json_path = out_dir.join(json_filename(&thread.post));
    let encoded = serde_json::to_string(thread)?;
    fs::write(&json_path, encoded)?;
    info!("Wrote {}", json_path.display());

    let mut paths = vec![json_path];
    if options.transcript {
        let txt_path = out_dir.join(format!("{}.txt", file_stem(&thread.post)));
        fs::write(&txt_path, render_transcript(thread))?;
        info!("Wrote {}", txt_path.display());
        paths.push(txt_path);
    }
    Ok(paths)
}

/// Reads a thread file written by [`save_outputs`].
pub fn load_thread(path: &Path) -> Result<Thread, ExtractionError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
