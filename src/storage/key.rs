//! Storage key derivation
//!
//! Every page is stored under `<sanitized title>_<url hash>`. The hash suffix keeps
//! same-titled pages apart; the title prefix keeps file listings readable.

use crate::url::NormalizedUrl;
use sha2::{Digest, Sha256};

/// Title used when a page has none
pub const UNTITLED: &str = "Untitled";

/// Stem used when sanitization leaves nothing
const EMPTY_STEM: &str = "untitled";

/// Maximum number of characters kept from the title
const MAX_STEM_CHARS: usize = 100;

/// Number of hex characters of the URL hash appended to the stem
const HASH_CHARS: usize = 8;

/// Characters illegal in common filesystems
const ILLEGAL_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Punctuation kept in addition to alphanumerics
const SAFE_PUNCTUATION: &[char] = &[' ', '.', '_', '-', '(', ')'];

/// Turns an arbitrary title into a filesystem-safe stem
///
/// # Examples
///
/// ```
/// use site_harvest::storage::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Hello: World?"), "Hello_World");
/// assert_eq!(sanitize_filename("///"), "untitled");
/// ```
pub fn sanitize_filename(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .filter(|c| c.is_alphanumeric() || SAFE_PUNCTUATION.contains(c))
        .collect();

    let stem: String = kept
        .trim()
        .replace(' ', "_")
        .chars()
        .take(MAX_STEM_CHARS)
        .collect();

    if stem.is_empty() {
        EMPTY_STEM.to_string()
    } else {
        stem
    }
}

/// Short, stable hex digest of a URL
pub fn url_hash(url: &NormalizedUrl) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(HASH_CHARS);
    encoded
}

/// Derives the storage key for a page
pub fn page_key(title: Option<&str>, url: &NormalizedUrl) -> String {
    format!(
        "{}_{}",
        sanitize_filename(title.unwrap_or(UNTITLED)),
        url_hash(url)
    )
}
