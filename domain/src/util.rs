//! Shared utility functions.

/// Truncate a string to approximately `max_bytes` without splitting a UTF-8
/// character boundary.
///
/// Returns a sub-slice of the original string. If the string is shorter than
/// `max_bytes`, the entire string is returned unchanged.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Bounded excerpt of a string for prompt interpolation.
///
/// Same truncation rule as [`truncate_str`], with trailing whitespace trimmed
/// and an ellipsis appended when the text was actually cut.
pub fn excerpt(s: &str, max_bytes: usize) -> String {
    let cut = truncate_str(s, max_bytes);
    if cut.len() == s.len() {
        cut.to_string()
    } else {
        format!("{}…", cut.trim_end())
    }
}
