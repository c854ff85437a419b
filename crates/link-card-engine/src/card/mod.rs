//! # Card Blocks
//!
//! Bidirectional codec between [`LinkMetadata`] records and the fenced
//! block embedded in a document:
//!
//! ````text
//! ```cardlink
//! url: https://example.com
//! title: "Example: a site"
//! host: example.com
//!   url: https://example.com/child
//!   title: Child
//! ```
//! ````
//!
//! One `key: value` line per populated field, keys in a fixed order, two
//! spaces per nesting level. The byte shape is a stable boundary that people
//! edit by hand; the `cardlink` info string versions it.
//!
//! [`LinkMetadata`]: crate::models::LinkMetadata

pub mod decode;
pub mod encode;
pub mod escape;
pub mod fence;

pub use decode::{DecodedBlock, decode_block, decode_document, decode_records};
pub use encode::{encode, encode_all, encode_indented};
pub use fence::{CardFence, INDENT_UNIT, Key};

/// Reasons a card block cannot be decoded, or a record cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("Malformed card block at line {line}: {reason}")]
    Malformed { line: usize, reason: String },
    #[error("Card block opened at line {line} is never closed")]
    Unterminated { line: usize },
    #[error("Card at line {line} is missing required field `{field}`")]
    MissingField { line: usize, field: &'static str },
    #[error("Card url must not be empty")]
    EmptyUrl,
    #[error("No cardlink block found")]
    NoBlock,
}
