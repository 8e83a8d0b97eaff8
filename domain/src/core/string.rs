//! String utilities for the domain layer.

/// One-line preview of a message, at most `max_len` bytes including the
/// trailing ellipsis.
///
/// Line breaks are folded into spaces so a preview never spans rows in a
/// session listing. Truncation happens on a UTF-8 character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    let folded: String = s
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    if folded.len() <= max_len {
        return folded;
    }
    let mut end = max_len.saturating_sub(3).min(folded.len());
    while end > 0 && !folded.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &folded[..end])
}
