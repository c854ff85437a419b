//! Value quoting for `key: value` lines.
//!
//! A value is written bare when a reader could not mistake it for block
//! structure, and double-quoted with backslash escapes otherwise. Decoding a
//! bare value returns it verbatim.

use std::borrow::Cow;

const QUOTE: char = '"';
const ESCAPE: char = '\\';

fn breaks_line(c: char) -> bool {
    c.is_control() || c == '\u{2028}' || c == '\u{2029}'
}

/// Whether `value` has to be quoted to survive a round trip unchanged.
pub fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value.starts_with(char::is_whitespace)
        || value.ends_with(char::is_whitespace)
        || value.starts_with([QUOTE, '\'', '#'])
        || value.ends_with(':')
        || value.contains(": ")
        || value.contains(" #")
        || value.chars().any(breaks_line)
}

/// Renders a value for the right-hand side of `key: `.
pub fn format_value(value: &str) -> Cow<'_, str> {
    if !needs_quoting(value) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push(QUOTE);
    for c in value.chars() {
        match c {
            QUOTE => out.push_str("\\\""),
            ESCAPE => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if breaks_line(c) => out.push_str(&format!("\\u{{{:x}}}", c as u32)),
            c => out.push(c),
        }
    }
    out.push(QUOTE);
    Cow::Owned(out)
}

/// Parses the (already trimmed) right-hand side of a `key: value` line.
///
/// Errors carry a human-readable reason; the caller attaches the line.
pub fn parse_value(raw: &str) -> Result<String, String> {
    let Some(quoted) = raw.strip_prefix(QUOTE) else {
        return Ok(raw.to_string());
    };

    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        match c {
            QUOTE => {
                return if chars.as_str().is_empty() {
                    Ok(out)
                } else {
                    Err("unexpected characters after closing quote".to_string())
                };
            }
            ESCAPE => match chars.next() {
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(QUOTE) => out.push(QUOTE),
                Some(ESCAPE) => out.push(ESCAPE),
                Some('u') => out.push(parse_unicode_escape(&mut chars)?),
                Some(other) => return Err(format!("unknown escape `\\{other}`")),
                None => break,
            },
            c => out.push(c),
        }
    }
    Err("unterminated quoted value".to_string())
}

/// Parses the `{hex}` part of a `\u{hex}` escape.
fn parse_unicode_escape(chars: &mut std::str::Chars<'_>) -> Result<char, String> {
    if chars.next() != Some('{') {
        return Err("expected `{` after `\\u`".to_string());
    }
    let mut hex = String::new();
    for c in chars.by_ref() {
        if c == '}' {
            return u32::from_str_radix(&hex, 16)
                .ok()
                .and_then(char::from_u32)
                .ok_or_else(|| format!("invalid unicode escape `\\u{{{hex}}}`"));
        }
        hex.push(c);
    }
    Err("unterminated unicode escape".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Example Domain")]
    #[case("https://example.com/a?b=c#d")]
    #[case(r"C:\path")]
    #[case(r#"say "hi""#)]
    fn plain_values_stay_bare(#[case] value: &str) {
        assert!(!needs_quoting(value));
        assert_eq!(format_value(value), value);
    }

    #[test]
    fn quoted_values() {
        assert_eq!(format_value(""), r#""""#);
        assert_eq!(format_value(" padded "), r#"" padded ""#);
        assert_eq!(format_value("Rust: the book"), r#""Rust: the book""#);
        assert_eq!(format_value("a\nb"), r#""a\nb""#);
        assert_eq!(format_value("\"quoted\""), r#""\"quoted\"""#);
        assert_eq!(format_value("bell\u{7}"), r#""bell\u{7}""#);
        assert_eq!(format_value("a\u{2028}b"), r#""a\u{2028}b""#);
    }

    #[rstest]
    #[case("")]
    #[case("Rust: a \"safe\"\nlanguage")]
    #[case("tab\there\\ back\\slash")]
    #[case("  lead and trail\r\n")]
    #[case("#hashtag")]
    #[case("ends with:")]
    #[case("line\u{2029}separator\u{1b}")]
    fn format_then_parse_restores_value(#[case] value: &str) {
        assert_eq!(parse_value(&format_value(value)).unwrap(), value);
    }

    #[rstest]
    #[case(r#""unterminated"#)]
    #[case(r#""closed" extra"#)]
    #[case(r#""bad \q escape""#)]
    #[case(r#""\u{zz}""#)]
    #[case(r#""\u{110000}""#)]
    #[case(r#""\u12""#)]
    fn malformed_quoted_values(#[case] raw: &str) {
        assert!(parse_value(raw).is_err(), "{raw:?} should not parse");
    }
}
