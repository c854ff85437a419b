//! Card block decoder.
//!
//! A line-driven state machine:
//!
//! - **AwaitingBlock**: outside any block; looks for an opening fence and
//!   skips over foreign fenced code so examples inside it are left alone.
//! - **InBlock**: accumulating the current record (the "in record" state).
//!   Deeper lines continue it; a repeated key or a shallower line starts the
//!   next one.
//! - **BlockClosed**: on the closing fence the accumulated result is
//!   emitted and the machine returns to `AwaitingBlock`.
//!
//! The first error in a block poisons that block only. Its remaining lines
//! are consumed up to the closing fence and scanning continues after it.

use std::ops::Range;

use log::{debug, warn};

use crate::models::LinkMetadata;
use crate::text::{LineRef, Span, lines_with_spans};

use super::{
    CardError,
    escape::parse_value,
    fence::{CardFence, FenceSig, INDENT_WIDTH, Key},
};

/// One card block found in a document, decoded independently of the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedBlock {
    /// Bytes of the block, fences included. An unterminated block extends to
    /// the next opening fence or the end of the document.
    pub span: Span,
    /// Zero-based line range of the block.
    pub lines: Range<usize>,
    pub result: Result<Vec<LinkMetadata>, CardError>,
}

impl DecodedBlock {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Decodes every card block in `text`.
///
/// Text outside blocks is ignored. Each block carries its own result, so a
/// malformed block never hides the cards in the blocks around it.
pub fn decode_document(text: &str) -> Vec<DecodedBlock> {
    let mut decoder = DocumentDecoder::default();
    for line in lines_with_spans(text) {
        decoder.push(line);
    }
    decoder.finish(text.len())
}

/// Decodes text holding exactly one block, delimiters included.
pub fn decode_block(text: &str) -> Result<Vec<LinkMetadata>, CardError> {
    let mut blocks = decode_document(text).into_iter();
    match (blocks.next(), blocks.next()) {
        (Some(block), None) => block.result,
        (None, _) => Err(CardError::NoBlock),
        (Some(_), Some(second)) => Err(CardError::Malformed {
            line: second.lines.start + 1,
            reason: "more than one card block".to_string(),
        }),
    }
}

/// Decodes the body of a block, without its fences.
///
/// This is what a renderer receives for a fenced code block whose info
/// string is `cardlink`. Line numbers in errors are relative to `body`.
pub fn decode_records(body: &str) -> Result<Vec<LinkMetadata>, CardError> {
    let mut block = BlockDecoder::new("", 0);
    for line in lines_with_spans(body) {
        block.push(line);
    }
    block.finish()
}

enum State<'a> {
    AwaitingBlock,
    InForeignFence(FenceSig),
    InBlock {
        start: LineRef<'a>,
        body: BlockDecoder<'a>,
    },
}

struct DocumentDecoder<'a> {
    state: State<'a>,
    blocks: Vec<DecodedBlock>,
}

impl Default for DocumentDecoder<'_> {
    fn default() -> Self {
        Self {
            state: State::AwaitingBlock,
            blocks: Vec::new(),
        }
    }
}

impl<'a> DocumentDecoder<'a> {
    fn push(&mut self, line: LineRef<'a>) {
        let state = std::mem::replace(&mut self.state, State::AwaitingBlock);
        self.state = match state {
            State::AwaitingBlock => self.await_block(line),
            State::InForeignFence(sig) if CardFence::closes(sig, line.text) => State::AwaitingBlock,
            State::InForeignFence(sig) => State::InForeignFence(sig),
            State::InBlock { start, body } if CardFence::is_open(line.text) => {
                self.emit(start, line.span.start, line.number, Err(body.unterminated()));
                self.open(line)
            }
            State::InBlock { start, body } if CardFence::is_close(line.text) => {
                self.emit(start, line.span.end, line.number + 1, body.finish());
                State::AwaitingBlock
            }
            State::InBlock { start, mut body } => {
                body.push(line);
                State::InBlock { start, body }
            }
        };
    }

    fn await_block(&mut self, line: LineRef<'a>) -> State<'a> {
        if CardFence::is_open(line.text) {
            self.open(line)
        } else if let Some(sig) = CardFence::foreign_sig(line.text) {
            State::InForeignFence(sig)
        } else {
            State::AwaitingBlock
        }
    }

    fn open(&mut self, line: LineRef<'a>) -> State<'a> {
        State::InBlock {
            start: line,
            body: BlockDecoder::new(CardFence::prefix(line.text), line.number + 1),
        }
    }

    fn emit(
        &mut self,
        start: LineRef<'a>,
        end: usize,
        end_line: usize,
        result: Result<Vec<LinkMetadata>, CardError>,
    ) {
        if let Err(err) = &result {
            warn!("Skipping card block at line {}: {err}", start.number + 1);
        }
        self.blocks.push(DecodedBlock {
            span: Span::new(start.span.start, end),
            lines: start.number..end_line,
            result,
        });
    }

    fn finish(mut self, len: usize) -> Vec<DecodedBlock> {
        match std::mem::replace(&mut self.state, State::AwaitingBlock) {
            State::InBlock { start, body } => {
                let end_line = start.number + 1 + body.lines_seen;
                self.emit(start, len, end_line, Err(body.unterminated()));
            }
            State::InForeignFence(_) => debug!("Document ends inside a fenced code block"),
            State::AwaitingBlock => {}
        }
        self.blocks
    }
}

/// Accumulates the records of one block.
struct BlockDecoder<'a> {
    /// Leading whitespace of the opening fence, stripped from body lines.
    prefix: &'a str,
    /// One-based line of the opening fence.
    open_line: usize,
    lines_seen: usize,
    records: Vec<LinkMetadata>,
    current: Option<RecordBuilder>,
    error: Option<CardError>,
}

impl<'a> BlockDecoder<'a> {
    fn new(prefix: &'a str, open_line: usize) -> Self {
        Self {
            prefix,
            open_line,
            lines_seen: 0,
            records: Vec::new(),
            current: None,
            error: None,
        }
    }

    fn push(&mut self, line: LineRef<'_>) {
        self.lines_seen += 1;
        if self.error.is_some() {
            return;
        }
        if let Err(err) = self.accept(line) {
            self.error = Some(err);
        }
    }

    fn accept(&mut self, line: LineRef<'_>) -> Result<(), CardError> {
        // Line numbers in errors are one-based.
        let number = line.number + 1;
        let Some(parsed) = parse_line(line.text, self.prefix, number)? else {
            return Ok(());
        };

        let Some(key) = Key::parse(parsed.key) else {
            debug!("Ignoring unknown card key `{}` at line {number}", parsed.key);
            return Ok(());
        };

        let starts_record = match &self.current {
            None => true,
            Some(record) => parsed.indent < record.indent || record.has(key),
        };
        if starts_record {
            if let Some(record) = self.current.take() {
                self.records.push(record.build()?);
            }
            self.current = Some(RecordBuilder::new(parsed.indent, number));
        }
        if let Some(record) = self.current.as_mut() {
            record.set(key, parsed.value);
        }
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<LinkMetadata>, CardError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        if let Some(record) = self.current.take() {
            self.records.push(record.build()?);
        }
        Ok(self.records)
    }

    fn unterminated(self) -> CardError {
        CardError::Unterminated {
            line: self.open_line,
        }
    }
}

struct ParsedLine<'l> {
    indent: usize,
    key: &'l str,
    value: String,
}

/// Splits a body line into indent level, key and unescaped value.
///
/// Blank lines yield `None`.
fn parse_line<'l>(
    text: &'l str,
    prefix: &str,
    number: usize,
) -> Result<Option<ParsedLine<'l>>, CardError> {
    let malformed = |reason: &str| CardError::Malformed {
        line: number,
        reason: reason.to_string(),
    };

    if text.trim().is_empty() {
        return Ok(None);
    }
    let text = text
        .strip_prefix(prefix)
        .ok_or_else(|| malformed("line is indented less than its opening fence"))?;

    let content = text.trim_start_matches([' ', '\t']);
    let width: usize = text[..text.len() - content.len()]
        .chars()
        .map(|c| if c == '\t' { INDENT_WIDTH } else { 1 })
        .sum();
    if width % INDENT_WIDTH != 0 {
        return Err(malformed("indentation is not a whole number of levels"));
    }

    let (key, raw) = content
        .split_once(':')
        .ok_or_else(|| malformed("expected `key: value`"))?;
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(malformed("invalid key"));
    }
    let value = parse_value(raw.trim()).map_err(|reason| malformed(&reason))?;

    Ok(Some(ParsedLine {
        indent: width / INDENT_WIDTH,
        key,
        value,
    }))
}

/// The record currently being accumulated.
struct RecordBuilder {
    indent: usize,
    /// One-based line of the record's first key.
    line: usize,
    fields: [Option<String>; 5],
}

impl RecordBuilder {
    fn new(indent: usize, line: usize) -> Self {
        Self {
            indent,
            line,
            fields: Default::default(),
        }
    }

    fn has(&self, key: Key) -> bool {
        self.fields[key as usize].is_some()
    }

    fn set(&mut self, key: Key, value: String) {
        self.fields[key as usize] = Some(value);
    }

    fn build(self) -> Result<LinkMetadata, CardError> {
        let line = self.line;
        let [url, title, description, host, image] = self.fields;
        let url = url.ok_or(CardError::MissingField { line, field: "url" })?;
        let title = title.ok_or(CardError::MissingField {
            line,
            field: "title",
        })?;

        let mut metadata = LinkMetadata::new(url, title)?.with_indent(self.indent);
        metadata.set_description(description);
        metadata.set_host(host);
        metadata.set_image(image);
        Ok(metadata)
    }
}
