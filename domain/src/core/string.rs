//! String utilities for quoting content into prompts.
//!
//! Budgets are measured in characters (Unicode scalar values), never bytes,
//! so a budget of 120 keeps 120 visible characters of Japanese text just as it
//! does for ASCII.

/// Truncate a string to at most `max_chars` characters.
///
/// Returns a sub-slice of the original string; never splits a character.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Replace every line break with a single space.
///
/// `\r\n` counts as one break.
pub fn flatten_newlines(s: &str) -> String {
    s.replace("\r\n", " ").replace(['\n', '\r'], " ")
}

/// Truncate to `max_chars` and flatten line breaks.
///
/// This is the single lossy rule applied to any node or transcript content
/// embedded into a new prompt. The result never exceeds `max_chars`
/// characters.
pub fn clip(s: &str, max_chars: usize) -> String {
    flatten_newlines(truncate_chars(s, max_chars))
}
