//! String and template escape processing

use crate::taco::ast::range::is_line_break;

/// Cooked value of a string or template body (the text between the delimiters).
///
/// Returns `None` when an escape is malformed; string literals fall back to the raw
/// text in that case, template elements record no cooked value.
pub fn cook(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let escaped = chars.next()?;
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' => out.push('\0'),
            'x' => {
                let hex: String = (0..2).filter_map(|_| chars.next()).collect();
                out.push(hex_char(&hex, 2)?);
            }
            'u' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    let mut hex = String::new();
                    loop {
                        match chars.next()? {
                            '}' => break,
                            c => hex.push(c),
                        }
                    }
                    out.push(hex_char(&hex, hex.len().max(1))?);
                } else {
                    let hex: String = (0..4).filter_map(|_| chars.next()).collect();
                    out.push(hex_char(&hex, 4)?);
                }
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            c if is_line_break(c) => {}
            c => out.push(c),
        }
    }

    Some(out)
}

fn hex_char(hex: &str, expected_len: usize) -> Option<char> {
    if hex.is_empty() || hex.len() != expected_len {
        return None;
    }
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_escapes() {
        assert_eq!(cook(r"a\nb\t\\").as_deref(), Some("a\nb\t\\"));
        assert_eq!(cook(r#"\"q\""#).as_deref(), Some("\"q\""));
    }

    #[test]
    fn test_unicode_escapes() {
        assert_eq!(cook(r"\x41B\u{1F600}").as_deref(), Some("AB😀"));
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(cook("a\\\nb").as_deref(), Some("ab"));
    }

    #[test]
    fn test_malformed_escape() {
        assert_eq!(cook(r"\xZ"), None);
        assert_eq!(cook(r"\u{12"), None);
    }
}
