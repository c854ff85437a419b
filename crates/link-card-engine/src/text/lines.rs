use super::span::Span;

/// A reference to a single line of a document with its byte span.
#[derive(Debug, Clone, Copy)]
pub struct LineRef<'a> {
    /// Zero-based line number.
    pub number: usize,
    /// Byte span of this line (includes the newline if present).
    pub span: Span,
    /// The line text without its trailing `\n` or `\r\n`.
    pub text: &'a str,
}

/// Returns an iterator over lines with their byte spans.
///
/// Uses `split_inclusive` so spans cover the newline characters and the
/// spans of consecutive lines tile the whole document.
pub fn lines_with_spans(text: &str) -> impl Iterator<Item = LineRef<'_>> + '_ {
    let mut offset = 0usize;
    text.split_inclusive('\n')
        .enumerate()
        .map(move |(number, raw)| {
            let start = offset;
            offset += raw.len();
            LineRef {
                number,
                span: Span::new(start, offset),
                text: raw.trim_end_matches(['\r', '\n']),
            }
        })
}
