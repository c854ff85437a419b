pub mod card;
pub mod classify;
pub mod convert;
pub mod io;
pub mod models;
pub mod text;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use card::{CardError, DecodedBlock, decode_block, decode_document, encode, encode_all};
pub use classify::{Classification, classify, find_urls, is_image, is_linked_url, is_url};
pub use convert::{ConvertOptions, MetadataProvider, OfflineProvider, RetrievalError};
pub use models::LinkMetadata;
