// src/util.rs — Shared utility functions

use std::borrow::Cow;

/// Shorten a string for display/logging (UTF-8 safe).
///
/// Strings at or under `max_len` bytes pass through unchanged; longer ones
/// are cut at the nearest character boundary and suffixed with an ellipsis.
pub fn ellipsize(s: &str, max_len: usize) -> Cow<'_, str> {
    if s.len() <= max_len {
        return Cow::Borrowed(s);
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    Cow::Owned(format!("{}…", &s[..end]))
}
