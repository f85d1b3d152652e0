//! Crawler module for breadth-first page harvesting
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - HTML parsing and link extraction
//! - The breadth-first frontier
//! - The per-page fetch-extract-persist pipeline
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod pipeline;

pub use coordinator::{Crawler, DelayRange};
pub use fetcher::{build_http_client, FetchError, HttpFetcher, PageFetcher, RawPage};
pub use frontier::{Frontier, FrontierEntry, FrontierError};
pub use parser::{extract_links, HtmlExtractor, LinkExtractor, TextExtractor};
pub use pipeline::{FailureReason, Outcome, Pipeline, SkipReason};

use crate::config::{Config, CrawlPolicy};
use crate::storage::ContentStore;
use crate::url::NormalizedUrl;
use crate::Result;
use std::sync::Arc;

/// Wires the default collaborators into a ready-to-run crawler
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Derive the crawl policy from the seed and configuration
/// 2. Build the HTTP fetcher
/// 3. Share one HTML extractor for links and text
/// 4. Assemble the pipeline and the driver
///
/// # Arguments
///
/// * `seed` - The validated seed URL
/// * `config` - The effective configuration
/// * `store` - Where pages are persisted
pub fn build_crawler(
    seed: NormalizedUrl,
    config: &Config,
    store: Arc<dyn ContentStore>,
) -> Result<Crawler> {
    let policy = CrawlPolicy::from_config(&seed, &config.crawler);
    let fetcher = Arc::new(HttpFetcher::new(&config.fetcher)?);
    let extractor = Arc::new(HtmlExtractor::new());

    let pipeline = Pipeline::new(fetcher, extractor.clone(), extractor, store, policy);
    let delay = DelayRange::from_secs(config.crawler.delay_min, config.crawler.delay_max);

    Ok(Crawler::new(seed, pipeline, delay))
}
