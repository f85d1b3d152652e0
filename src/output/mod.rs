//! Output module for crawl statistics and reports
//!
//! This module handles:
//! - Running counters kept by the crawl driver
//! - The completion report printed to stdout
//! - A markdown rendering of the report written next to the content

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, generate_markdown_report, ReportContext};
pub use stats::{print_report, CrawlReport, CrawlStats, FailedPage};

use thiserror::Error;

/// File name of the markdown report inside the output directory
pub const REPORT_FILE_NAME: &str = "crawl_report.md";

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
