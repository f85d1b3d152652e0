//! HTML parsing for links, titles and body text
//!
//! This module handles:
//! - The `LinkExtractor` and `TextExtractor` capabilities
//! - A `scraper`-backed implementation of both (`HtmlExtractor`)
//! - Turning raw hrefs into admitted, normalized links

use crate::config::CrawlPolicy;
use crate::url::{normalize, NormalizedUrl};
use crate::UrlError;
use scraper::{Html, Node, Selector};
use url::Url;

/// Elements whose text never counts as page content
const NON_CONTENT_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Enumerates hyperlink targets in raw markup
pub trait LinkExtractor: Send + Sync {
    /// Returns every raw href in document order, unnormalized
    fn hrefs(&self, raw_markup: &str) -> Vec<String>;
}

/// Extracts human-readable content from raw markup
pub trait TextExtractor: Send + Sync {
    /// Returns the document title, if there is a non-empty one
    fn title(&self, raw_markup: &str) -> Option<String>;

    /// Returns the body text, one trimmed line per text node, blank lines removed
    fn text(&self, raw_markup: &str) -> String;
}

/// HTML extractor backed by `scraper`
#[derive(Debug, Clone, Default)]
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlExtractor {
    fn hrefs(&self, raw_markup: &str) -> Vec<String> {
        let document = Html::parse_document(raw_markup);
        let Ok(selector) = Selector::parse("a[href], area[href]") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .filter_map(|element| element.value().attr("href"))
            .map(str::to_string)
            .collect()
    }
}

impl TextExtractor for HtmlExtractor {
    fn title(&self, raw_markup: &str) -> Option<String> {
        let document = Html::parse_document(raw_markup);
        let title_selector = Selector::parse("title").ok()?;

        document
            .select(&title_selector)
            .next()
            .map(|element| element.text().collect::<String>().trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn text(&self, raw_markup: &str) -> String {
        let document = Html::parse_document(raw_markup);
        let mut lines = Vec::new();

        for node in document.root_element().descendants() {
            let Node::Text(text) = node.value() else {
                continue;
            };

            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map(|element| NON_CONTENT_ELEMENTS.contains(&element.name()))
                    .unwrap_or(false)
            });
            if hidden {
                continue;
            }

            lines.extend(
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string),
            );
        }

        lines.join("\n")
    }
}

/// Normalizes raw hrefs against `base_url` and keeps those the policy admits
///
/// Order of appearance is preserved. A malformed href is dropped with a
/// warning; it never affects the other links of the page.
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::{CrawlPolicy, CrawlerConfig};
/// use site_harvest::crawler::extract_links;
/// use site_harvest::url::NormalizedUrl;
///
/// let seed = NormalizedUrl::parse("https://example.com/").unwrap();
/// let policy = CrawlPolicy::from_config(&seed, &CrawlerConfig::default());
/// let hrefs = vec!["/about".to_string(), "mailto:me@example.com".to_string()];
/// let links = extract_links(seed.as_url(), &hrefs, &policy);
/// assert_eq!(links.len(), 1);
/// ```
pub fn extract_links(base_url: &Url, hrefs: &[String], policy: &CrawlPolicy) -> Vec<NormalizedUrl> {
    let mut links = Vec::new();

    for href in hrefs {
        let url = match normalize(base_url, href) {
            Ok(url) => url,
            Err(e @ UrlError::UnsupportedScheme(_)) => {
                tracing::debug!("Skipping link on {}: {}", base_url, e);
                continue;
            }
            Err(e) => {
                tracing::warn!("Skipping malformed link on {}: {}", base_url, e);
                continue;
            }
        };

        match policy.check(&url) {
            Ok(()) => links.push(url),
            Err(reason) => tracing::trace!("Filtered {}: {}", url, reason),
        }
    }

    links
}
