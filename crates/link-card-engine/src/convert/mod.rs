//! Turning a selection or paste into a card block.
//!
//! Metadata retrieval is external: a [`MetadataProvider`] hands back a
//! finished [`LinkMetadata`] and this module only decides eligibility and
//! encodes. A caller with an async HTTP client awaits its own fetch and
//! implements the trait over the result.

use crate::card::{CardError, encode_indented};
use crate::classify::{classify, host_of};
use crate::models::LinkMetadata;

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Response from {url} is not HTML")]
    NotHtml { url: String },
    #[error("Timed out fetching {url}")]
    Timeout { url: String },
    #[error("Invalid metadata: {0}")]
    Card(#[from] CardError),
}

/// Source of link metadata for a URL.
pub trait MetadataProvider {
    fn fetch(&self, url: &str) -> Result<LinkMetadata, RetrievalError>;
}

/// Provider that never touches the network.
///
/// Produces the fallback record (title = URL) with the host derived from
/// the URL itself.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineProvider;

impl MetadataProvider for OfflineProvider {
    fn fetch(&self, url: &str) -> Result<LinkMetadata, RetrievalError> {
        let metadata = LinkMetadata::fallback(url)?;
        Ok(match host_of(url) {
            Some(host) => metadata.with_host(host),
            None => metadata,
        })
    }
}

/// Where the converted card lands in the document.
#[derive(Debug, Default, Clone)]
pub struct ConvertOptions {
    /// Nesting depth given to the fetched record.
    pub indent: usize,
    /// Whitespace placed before every line of the block.
    pub prefix: String,
    /// Convert direct image links too.
    pub allow_images: bool,
}

/// Converts `text` into a card block if it is a bare or linked URL.
///
/// Returns `Ok(None)` for ineligible text, leaving the document unchanged;
/// provider failures propagate so the caller can keep the plain URL.
pub fn convert_selection(
    text: &str,
    provider: &dyn MetadataProvider,
    options: &ConvertOptions,
) -> Result<Option<String>, RetrievalError> {
    let classification = classify(text);
    let url = match classification.url() {
        Some(url) if classification.is_convertible() || options.allow_images => url,
        _ => return Ok(None),
    };

    log::debug!("Converting {url} into a card");
    let metadata = provider.fetch(url)?.with_indent(options.indent);
    Ok(Some(encode_indented(&[metadata], &options.prefix)))
}
