//! Titan Chat Library
//!
//! Core library for the Titan Chat desktop client.

pub mod api;
pub mod app;
pub mod controller;
pub mod history;
pub mod storage;
pub mod stream;
pub mod thinking;
pub mod types;
pub mod ui;

/// Safely truncate a string at a char boundary, never panics.
pub fn truncate_str(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    // Walk backwards from max_bytes to find a valid char boundary
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// First `max_chars` characters of `s`
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}
