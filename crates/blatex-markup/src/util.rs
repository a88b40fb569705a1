//! Shared utility functions for directive processing.

/// Convert a byte offset into a 1-based `(line, column)` position.
///
/// Columns count characters, not bytes. Offsets past the end clamp to the
/// end of the text; offsets inside a character resolve to that character.
///
/// # Examples
///
/// ```
/// use blatex_markup::line_col;
///
/// assert_eq!(line_col("ab\ncd", 0), (1, 1));
/// assert_eq!(line_col("ab\ncd", 4), (2, 2));
/// ```
pub fn line_col(text: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let before = &text[..end];

    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;

    (line, column)
}

/// Escape text for safe inclusion in HTML content or attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
