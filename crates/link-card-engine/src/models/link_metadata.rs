use serde::{Deserialize, Serialize};

use crate::card::CardError;

/// The canonical record behind a link card.
///
/// `url` is never empty. Optional fields distinguish "absent" (`None`) from
/// "present but empty" (`Some("")`) and both survive an encode/decode round
/// trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LinkMetadataFields")]
pub struct LinkMetadata {
    url: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    indent: usize,
}

/// Unvalidated serde shape of [`LinkMetadata`].
#[derive(Deserialize)]
struct LinkMetadataFields {
    url: String,
    title: String,
    description: Option<String>,
    host: Option<String>,
    image: Option<String>,
    #[serde(default)]
    indent: usize,
}

impl TryFrom<LinkMetadataFields> for LinkMetadata {
    type Error = CardError;

    fn try_from(fields: LinkMetadataFields) -> Result<Self, Self::Error> {
        let mut metadata = LinkMetadata::new(fields.url, fields.title)?;
        metadata.description = fields.description;
        metadata.host = fields.host;
        metadata.image = fields.image;
        metadata.indent = fields.indent;
        Ok(metadata)
    }
}

impl LinkMetadata {
    /// Create a top-level record with only the required fields.
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Result<Self, CardError> {
        let url = url.into();
        if url.is_empty() {
            return Err(CardError::EmptyUrl);
        }
        Ok(Self {
            url,
            title: title.into(),
            description: None,
            host: None,
            image: None,
            indent: 0,
        })
    }

    /// The record a provider produces when no metadata could be discovered:
    /// every optional field absent and the title falling back to the URL.
    pub fn fallback(url: impl Into<String>) -> Result<Self, CardError> {
        let url = url.into();
        let title = url.clone();
        Self::new(url, title)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the nesting depth within an outline (0 = top level).
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub(crate) fn set_description(&mut self, value: Option<String>) {
        self.description = value;
    }

    pub(crate) fn set_host(&mut self, value: Option<String>) {
        self.host = value;
    }

    pub(crate) fn set_image(&mut self, value: Option<String>) {
        self.image = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_url_is_rejected() {
        assert_eq!(LinkMetadata::new("", "title"), Err(CardError::EmptyUrl));
        assert_eq!(LinkMetadata::fallback(""), Err(CardError::EmptyUrl));
    }

    #[test]
    fn fallback_uses_url_as_title() {
        let metadata = LinkMetadata::fallback("https://example.com").unwrap();

        assert_eq!(metadata.title(), "https://example.com");
        assert_eq!(metadata.description(), None);
        assert_eq!(metadata.host(), None);
        assert_eq!(metadata.image(), None);
        assert_eq!(metadata.indent(), 0);
    }

    #[test]
    fn builder_populates_optional_fields() {
        let metadata = LinkMetadata::new("https://example.com", "Example")
            .unwrap()
            .with_description("")
            .with_host("example.com")
            .with_indent(2);

        assert_eq!(metadata.description(), Some(""));
        assert_eq!(metadata.host(), Some("example.com"));
        assert_eq!(metadata.image(), None);
        assert_eq!(metadata.indent(), 2);
    }

    #[test]
    fn json_round_trip_omits_absent_fields() {
        let metadata = LinkMetadata::new("https://example.com", "Example")
            .unwrap()
            .with_image("https://example.com/og.png");

        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(
            json,
            r#"{"url":"https://example.com","title":"Example","image":"https://example.com/og.png","indent":0}"#
        );

        let back: LinkMetadata = serde_json::from_str(&json).unwrap();
        assert_eq!(back, metadata);
    }

    #[test]
    fn json_with_empty_url_is_rejected() {
        let result: Result<LinkMetadata, _> = serde_json::from_str(r#"{"url":"","title":"x"}"#);
        assert!(result.is_err());
    }
}
