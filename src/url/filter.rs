use crate::url::NormalizedUrl;

/// Checks whether a URL's host is exactly the crawl's start domain
///
/// Only an exact match is accepted: subdomains of the start domain are treated
/// as foreign sites. Both sides are compared lower-cased.
///
/// # Examples
///
/// ```
/// use site_harvest::url::{is_same_domain, NormalizedUrl};
///
/// let url = NormalizedUrl::parse("https://example.com/x").unwrap();
/// assert!(is_same_domain(&url, "example.com"));
///
/// let sub = NormalizedUrl::parse("https://sub.example.com/x").unwrap();
/// assert!(!is_same_domain(&sub, "example.com"));
/// ```
pub fn is_same_domain(url: &NormalizedUrl, start_domain: &str) -> bool {
    url.host().eq_ignore_ascii_case(start_domain)
}

/// Returns the first exclusion pattern that occurs in the URL, if any
///
/// Patterns are plain substrings matched against the normalized URL string.
/// Empty patterns never match.
pub fn matching_exclusion<'a>(url: &NormalizedUrl, patterns: &'a [String]) -> Option<&'a str> {
    let candidate = url.as_str();
    patterns
        .iter()
        .map(String::as_str)
        .find(|pattern| !pattern.is_empty() && candidate.contains(pattern))
}
