//! # URL Classification
//!
//! Pure predicates deciding whether a piece of text is eligible to become a
//! link card. Nothing here allocates state between calls; compiled regexes
//! live in process-wide [`OnceLock`]s.
//!
//! - [`is_url`]: the whole trimmed text is a bare URL
//! - [`find_urls`]: line scan for every bare URL inside free text
//! - [`is_linked_url`]: the whole trimmed text is `[label](url)`
//! - [`is_image`]: the URL path ends in an image extension
//!
//! [`classify`] combines them into the decision a paste or selection handler
//! needs. Image URLs are recognised but never convertible: a card adds
//! nothing to a direct image link.

pub mod patterns;

use std::sync::OnceLock;

use regex::Regex;

use crate::text::Span;

fn compiled(cell: &'static OnceLock<Regex>, pattern: fn() -> String) -> &'static Regex {
    cell.get_or_init(|| Regex::new(&pattern()).expect("Invalid URL grammar"))
}

fn anchored_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, patterns::anchored_url)
}

fn scan_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, patterns::bare_url)
}

fn linked_url_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, patterns::linked_url)
}

fn image_path_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, patterns::image_path)
}

fn authority_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    compiled(&RE, patterns::authority)
}

/// A URL found by [`find_urls`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlMatch<'a> {
    /// Byte span of the URL within the scanned text.
    pub span: Span,
    pub url: &'a str,
}

/// The parts of a `[label](url)` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedUrl {
    pub label: String,
    pub url: String,
}

/// What a piece of text is, from the point of view of card conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A bare URL, trimmed.
    Bare { url: String },
    /// A Markdown link whose target is a URL.
    Linked(LinkedUrl),
    /// A bare or linked URL pointing directly at an image.
    Image { url: String },
    NotUrl,
}

impl Classification {
    /// The URL carried by this classification, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            Classification::Bare { url } | Classification::Image { url } => Some(url),
            Classification::Linked(linked) => Some(&linked.url),
            Classification::NotUrl => None,
        }
    }

    /// Whether the text should be turned into a card.
    pub fn is_convertible(&self) -> bool {
        matches!(self, Classification::Bare { .. } | Classification::Linked(_))
    }
}

/// True iff the entire trimmed text is a bare URL.
pub fn is_url(text: &str) -> bool {
    let text = text.trim();
    !text.is_empty() && anchored_url_regex().is_match(text)
}

/// Finds every bare URL in free text, in order, without overlaps.
///
/// Trailing sentence punctuation is dropped from a match as long as what
/// remains is still a URL, so `see https://example.com/a.` yields
/// `https://example.com/a`.
pub fn find_urls(text: &str) -> Vec<UrlMatch<'_>> {
    scan_url_regex()
        .find_iter(text)
        .map(|m| {
            let start = m.start();
            let mut end = m.end();
            while let Some(last) = text[start..end].chars().last() {
                if !patterns::TRAILING_PUNCTUATION.contains(&last) {
                    break;
                }
                let shorter = end - last.len_utf8();
                if !anchored_url_regex().is_match(&text[start..shorter]) {
                    break;
                }
                end = shorter;
            }
            UrlMatch {
                span: Span::new(start, end),
                url: &text[start..end],
            }
        })
        .collect()
}

/// True iff the entire trimmed text is a `[label](url)` link to a bare URL.
pub fn is_linked_url(text: &str) -> bool {
    linked_url(text).is_some()
}

/// Splits a `[label](url)` link into its label and URL.
pub fn linked_url(text: &str) -> Option<LinkedUrl> {
    let caps = linked_url_regex().captures(text.trim())?;
    Some(LinkedUrl {
        label: caps.name("label")?.as_str().to_string(),
        url: caps.name("url")?.as_str().to_string(),
    })
}

/// True iff the URL's path ends in one of the image extensions.
///
/// Query string and fragment are ignored, so `photo.png?w=200` counts.
pub fn is_image(text: &str) -> bool {
    let text = text.trim();
    let path = text.split(['?', '#']).next().unwrap_or(text);
    image_path_regex().is_match(path)
}

/// Classifies a selection or pasted text.
pub fn classify(text: &str) -> Classification {
    let trimmed = text.trim();
    if is_url(trimmed) {
        let url = trimmed.to_string();
        return if is_image(&url) {
            Classification::Image { url }
        } else {
            Classification::Bare { url }
        };
    }
    match linked_url(trimmed) {
        Some(linked) if is_image(&linked.url) => Classification::Image { url: linked.url },
        Some(linked) => Classification::Linked(linked),
        None => Classification::NotUrl,
    }
}

/// The URL to fetch when `text` is turned into a card, or `None` when the
/// text is not eligible.
pub fn card_target(text: &str) -> Option<String> {
    match classify(text) {
        Classification::Bare { url } => Some(url),
        Classification::Linked(linked) => Some(linked.url),
        Classification::Image { .. } | Classification::NotUrl => None,
    }
}

/// Extracts the lowercased hostname of a URL, dropping userinfo and port.
pub fn host_of(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() || url.contains(char::is_whitespace) {
        return None;
    }
    let authority = authority_regex().captures(url)?.name("authority")?.as_str();
    let host = authority.rsplit('@').next().unwrap_or(authority);
    let host = host.split(':').next().unwrap_or(host);
    if host.contains('.') {
        Some(host.to_ascii_lowercase())
    } else {
        None
    }
}
