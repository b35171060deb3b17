//! Character-safe text truncation.
//!
//! Model output and search snippets are arbitrary UTF-8, so truncation is
//! always done on `char` boundaries.

/// Returns at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Truncates to `max_chars` characters, appending `...` when anything was cut.
///
/// The ellipsis is counted inside the limit.
pub fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    format!("{}...", truncate_chars(text, keep))
}
