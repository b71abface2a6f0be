//! Single-line preview normalization for listings.

/// Normalize text for a one-line listing.
///
/// - Skips leading whitespace
/// - Converts newlines/tabs to spaces and collapses runs of whitespace
/// - Truncates at `max_chars` with an ellipsis
/// - Trims trailing spaces
pub fn normalize_preview(text: &str, max_chars: usize) -> String {
    let mut result = String::with_capacity(max_chars.min(text.len()) + 1);
    let mut last_was_space = false;
    let mut count = 0;

    for ch in text.trim_start().chars() {
        let ch = if ch.is_whitespace() { ' ' } else { ch };
        if ch == ' ' && last_was_space {
            continue;
        }
        if count >= max_chars {
            result.push('…');
            return result;
        }
        last_was_space = ch == ' ';
        result.push(ch);
        count += 1;
    }

    while result.ends_with(' ') {
        result.pop();
    }
    result
}
