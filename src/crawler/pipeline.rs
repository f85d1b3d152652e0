//! Fetch-extract-persist pipeline
//!
//! Processes one frontier entry at a time and reports what happened as an
//! `Outcome`. The pipeline never touches the frontier: the driver marks URLs
//! visited and offers the returned links itself.

use crate::config::CrawlPolicy;
use crate::crawler::fetcher::{FetchError, PageFetcher};
use crate::crawler::frontier::FrontierEntry;
use crate::crawler::parser::{extract_links, LinkExtractor, TextExtractor};
use crate::storage::{page_key, ContentStore, PageRecord, StoreError};
use crate::url::NormalizedUrl;
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Why a page counted as failed
#[derive(Debug, Error)]
pub enum FailureReason {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),
}

/// Why an entry was dropped without fetching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    DepthExceeded,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DepthExceeded => write!(f, "depth exceeded"),
        }
    }
}

/// Result of processing one frontier entry
#[derive(Debug)]
pub enum Outcome {
    /// The page was fetched and stored
    Success {
        /// Admitted outbound links in document order (empty at the depth ceiling)
        links: Vec<NormalizedUrl>,
        title: Option<String>,
        /// Key the page was stored under
        key: String,
    },
    Failed(FailureReason),
    Skipped(SkipReason),
}

/// The per-page processing step and its collaborators
pub struct Pipeline {
    fetcher: Arc<dyn PageFetcher>,
    links: Arc<dyn LinkExtractor>,
    text: Arc<dyn TextExtractor>,
    store: Arc<dyn ContentStore>,
    policy: CrawlPolicy,
}

impl Pipeline {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        links: Arc<dyn LinkExtractor>,
        text: Arc<dyn TextExtractor>,
        store: Arc<dyn ContentStore>,
        policy: CrawlPolicy,
    ) -> Self {
        Self {
            fetcher,
            links,
            text,
            store,
            policy,
        }
    }

    pub fn policy(&self) -> &CrawlPolicy {
        &self.policy
    }

    pub fn fetcher(&self) -> &Arc<dyn PageFetcher> {
        &self.fetcher
    }

    pub fn store(&self) -> &Arc<dyn ContentStore> {
        &self.store
    }

    /// Fetches, extracts and persists a single entry
    ///
    /// # Steps
    ///
    /// 1. Skip entries beyond the depth limit without fetching
    /// 2. Fetch the page (the fetcher applies its own retry policy)
    /// 3. Extract title and plain text
    /// 4. Derive the storage key from the title and URL
    /// 5. Persist markup, text and metadata
    /// 6. Below the depth ceiling, extract admitted outbound links
    pub async fn process(&self, entry: &FrontierEntry) -> Outcome {
        if !self.policy.within_depth(entry.depth) {
            return Outcome::Skipped(SkipReason::DepthExceeded);
        }

        let page = match self.fetcher.fetch(&entry.url).await {
            Ok(page) => page,
            Err(e) => return Outcome::Failed(e.into()),
        };

        let markup = String::from_utf8_lossy(&page.content);
        let title = self.text.title(&markup);
        let plain_text = self.text.text(&markup);

        let key = page_key(title.as_deref(), &entry.url);
        let record = PageRecord {
            url: entry.url.clone(),
            title: title.clone(),
            raw_markup: page.content.clone(),
            plain_text,
            fetched_at: Utc::now(),
        };

        if let Err(e) = self.store.save(&key, &record) {
            return Outcome::Failed(e.into());
        }

        let links = if self.policy.should_expand(entry.depth) {
            let hrefs = self.links.hrefs(&markup);
            extract_links(&page.final_url, &hrefs, &self.policy)
        } else {
            Vec::new()
        };

        Outcome::Success { links, title, key }
    }
}
