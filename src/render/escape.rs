use std::fmt::Write;

/// Escape code for display without highlighting.
///
/// `<`, `>`, `&` and every char in U+00A0..=U+9999 become decimal numeric
/// character references; everything else passes through unchanged.
pub fn escape_plain(code: &str) -> String {
    let mut escaped = String::with_capacity(code.len());
    for c in code.chars() {
        if matches!(c, '<' | '>' | '&' | '\u{00A0}'..='\u{9999}') {
            let _ = write!(escaped, "&#{};", c as u32);
        } else {
            escaped.push(c);
        }
    }
    escaped
}
