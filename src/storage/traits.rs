//! Content store trait and error types
//!
//! This module defines the interface the crawl pipeline persists pages through,
//! plus the records handed across it.

use crate::output::CrawlReport;
use crate::url::NormalizedUrl;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while persisting pages
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Database error: {0}")]
    Database(String),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Everything captured for one visited page
///
/// Created by the pipeline, lent to the store for persistence, then dropped.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub url: NormalizedUrl,
    /// Title exactly as found in the document, if any
    pub title: Option<String>,
    pub raw_markup: Vec<u8>,
    pub plain_text: String,
    pub fetched_at: DateTime<Utc>,
}

/// The metadata document stored next to each page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub url: String,
    pub title: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl PageRecord {
    /// Builds the metadata document for this page
    pub fn metadata(&self) -> PageMetadata {
        PageMetadata {
            url: self.url.to_string(),
            title: self.title.clone(),
            fetched_at: self.fetched_at,
        }
    }
}

/// Identifies a crawl run for stores that keep run bookkeeping
#[derive(Debug, Clone)]
pub struct RunInfo {
    pub seed: String,
    pub config_hash: Option<String>,
    pub started_at: DateTime<Utc>,
}

/// Trait for content store backends
///
/// `save` is called at most once per distinct key during a run. Keys come from
/// [`crate::storage::page_key`], which makes collisions between distinct URLs
/// improbable.
pub trait ContentStore: Send + Sync {
    /// Persists the raw markup, plain text and metadata of one page
    fn save(&self, key: &str, record: &PageRecord) -> StoreResult<()>;

    /// Called once when the crawl starts
    fn begin_run(&self, _run: &RunInfo) -> StoreResult<()> {
        Ok(())
    }

    /// Called once when the crawl ends, on every exit path
    fn finish_run(&self, _report: &CrawlReport) -> StoreResult<()> {
        Ok(())
    }

    /// Human-readable location of the stored content
    fn describe(&self) -> String;
}
