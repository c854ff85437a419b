//! # URL Grammar
//!
//! Pattern fragments for bare and bracketed URLs. Every regex the
//! classifier compiles is assembled from these constants; the classifier
//! itself never spells out a character class.
//!
//! ```text
//! bare   = (scheme | www)? (label ".")+ label remainder
//! linked = "[" label-text "](" bare ")"
//! ```
//!
//! The remainder needs at least two non-whitespace characters. Since the
//! final hostname label may be as short as one character, `example.com`
//! satisfies the grammar as `example.` + `c` + `om`.

/// `http://` or `https://`, any case.
pub const SCHEME: &str = r"(?i:https?://)";

/// A bare `www.` prefix, any case.
pub const WWW: &str = r"(?i:www\.)";

/// One hostname label: alphanumerics with internal hyphens only.
pub const LABEL: &str = r"[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?";

/// Path, query and fragment: two or more non-whitespace characters.
pub const REMAINDER: &str = r"\S{2,}";

/// Link text between brackets: no unescaped `[` or `]`.
pub const LINK_LABEL: &str = r"(?:[^\[\]\\]|\\.)*";

/// Image extensions recognised at the end of a URL path.
pub const IMAGE_EXTENSIONS: &[&str] = &[
    "gif", "jpg", "jpeg", "tiff", "tif", "png", "webp", "bmp", "tga", "psd", "ai",
];

/// Trailing punctuation a line scan drops when the URL still matches
/// without it.
pub const TRAILING_PUNCTUATION: &[char] = &['.', ',', ':', ';', '!', '?', ')', ']', '}', '"', '\''];

/// The bare-URL grammar, unanchored.
pub fn bare_url() -> String {
    format!(r"(?:{SCHEME}|{WWW})?(?:{LABEL}\.)+{LABEL}{REMAINDER}")
}

/// The bare-URL grammar anchored at both ends.
pub fn anchored_url() -> String {
    format!("^{}$", bare_url())
}

/// A whole-string `[label](url)` link with capture groups `label` and `url`.
pub fn linked_url() -> String {
    format!(r"^\[(?P<label>{LINK_LABEL})\]\((?P<url>{})\)$", bare_url())
}

/// Matches a path ending in one of [`IMAGE_EXTENSIONS`].
pub fn image_path() -> String {
    format!(r"(?i)\.(?:{})$", IMAGE_EXTENSIONS.join("|"))
}

/// Captures the authority of a URL: everything after the optional scheme up
/// to the first `/`, `?` or `#`.
pub fn authority() -> String {
    format!(r"^{SCHEME}?(?P<authority>[^/?#\s]+)")
}
