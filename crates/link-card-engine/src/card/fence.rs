//! Delimiters and key vocabulary of the card block format.
//!
//! All syntax constants live here; the encoder and decoder never hardcode
//! a fence or a key name.

use crate::models::LinkMetadata;

/// Fence constants for a card block.
pub struct CardFence;

impl CardFence {
    /// Info string marking a fenced block as a card. Doubles as the format
    /// version: a future incompatible layout gets a new info string.
    pub const INFO: &'static str = "cardlink";
    pub const BACKTICKS: &'static str = "```";
    pub const CLOSE: &'static str = Self::BACKTICKS;

    /// Minimum run of fence characters that opens a fence.
    const MIN_RUN: usize = 3;

    pub fn is_open(line: &str) -> bool {
        line.trim().strip_prefix(Self::BACKTICKS) == Some(Self::INFO)
    }

    pub fn is_close(line: &str) -> bool {
        line.trim() == Self::CLOSE
    }

    /// Any other fence opener (` ```rust `, `~~~~`, bare ` ``` `) whose
    /// content must not be scanned for cards.
    pub fn foreign_sig(line: &str) -> Option<FenceSig> {
        if Self::is_open(line) {
            return None;
        }
        let t = line.trim_start();
        let ch = t.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = t.chars().take_while(|&c| c == ch).count();
        (len >= Self::MIN_RUN).then_some(FenceSig { ch, len })
    }

    /// Whether `line` closes a foreign fence opened with `sig`: the same
    /// character, a run at least as long, and nothing after it.
    pub fn closes(sig: FenceSig, line: &str) -> bool {
        let t = line.trim();
        t.chars().all(|c| c == sig.ch) && t.chars().count() >= sig.len
    }

    /// The leading whitespace of an opening fence line.
    pub fn prefix(line: &str) -> &str {
        &line[..line.len() - line.trim_start().len()]
    }
}

/// Opening run of a foreign fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceSig {
    /// `` ` `` or `~`.
    pub ch: char,
    pub len: usize,
}

/// One nesting level of a record inside a block.
pub const INDENT_UNIT: &str = "  ";

/// Width of [`INDENT_UNIT`]; a tab counts as one full unit.
pub const INDENT_WIDTH: usize = INDENT_UNIT.len();

/// Keys of the block format, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    Url,
    Title,
    Description,
    Host,
    Image,
}

impl Key {
    pub const ALL: [Key; 5] = [Key::Url, Key::Title, Key::Description, Key::Host, Key::Image];

    pub fn as_str(self) -> &'static str {
        match self {
            Key::Url => "url",
            Key::Title => "title",
            Key::Description => "description",
            Key::Host => "host",
            Key::Image => "image",
        }
    }

    pub fn parse(s: &str) -> Option<Key> {
        Self::ALL.into_iter().find(|key| key.as_str() == s)
    }

    /// The record's value for this key, `None` when absent.
    pub fn value(self, metadata: &LinkMetadata) -> Option<&str> {
        match self {
            Key::Url => Some(metadata.url()),
            Key::Title => Some(metadata.title()),
            Key::Description => metadata.description(),
            Key::Host => metadata.host(),
            Key::Image => metadata.image(),
        }
    }
}
