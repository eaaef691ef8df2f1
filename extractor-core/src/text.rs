//! Free-text helpers shared by the filter and the serializer.

use regex::Regex;
use std::sync::OnceLock;

fn blank_lines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("static regex"))
}

fn horizontal_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").expect("static regex"))
}

/// Unifies line endings, caps blank-line runs at one empty line, squeezes
/// spaces and tabs, and trims the result.
///
/// Idempotent: `normalize_whitespace(&normalize_whitespace(x)) == normalize_whitespace(x)`.
pub fn normalize_whitespace(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");
    let collapsed = blank_lines().replace_all(&unified, "\n\n");
    let squeezed = horizontal_space().replace_all(&collapsed, " ");
    squeezed.trim().to_string()
}

/// Number of characters (Unicode scalar values) in `text`.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Rough language-model token count: a quarter of the character count,
/// at least 1 for non-empty text.
pub fn token_estimate(text: &str) -> usize {
    if text.is_empty() {
        0
    } else {
        (char_len(text) / 4).max(1)
    }
}
