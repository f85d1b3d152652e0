//! Running crawl statistics and the completion report
//!
//! The driver owns one `CrawlStats` for the lifetime of a crawl and updates it
//! once per processed frontier entry. At completion (or interruption) it is
//! frozen into a `CrawlReport`.

use crate::state::CrawlState;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// A page that could not be fetched or stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPage {
    pub url: String,
    pub reason: String,
}

/// Running crawl counters
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Entries handed to the pipeline that ended in success or failure
    pub total: u64,

    /// Pages fetched and persisted
    pub success: u64,

    /// Pages whose fetch or persistence failed
    pub failed: u64,

    /// Entries dropped without fetching (already visited, beyond the depth limit)
    pub skipped: u64,

    /// Successful pages per depth
    pub pages_by_depth: BTreeMap<u32, u64>,

    /// Every failure with its cause, in processing order
    pub failures: Vec<FailedPage>,

    /// Wall-clock start of the crawl
    pub started_at: DateTime<Utc>,

    start: Instant,
}

impl CrawlStats {
    /// Starts a fresh set of counters at the current instant
    pub fn new() -> Self {
        Self {
            total: 0,
            success: 0,
            failed: 0,
            skipped: 0,
            pages_by_depth: BTreeMap::new(),
            failures: Vec::new(),
            started_at: Utc::now(),
            start: Instant::now(),
        }
    }

    /// Records a page that was fetched and stored
    pub fn record_success(&mut self, depth: u32) {
        self.total += 1;
        self.success += 1;
        *self.pages_by_depth.entry(depth).or_insert(0) += 1;
    }

    /// Records a page that failed to fetch or store
    pub fn record_failure(&mut self, url: &str, reason: impl Into<String>) {
        self.total += 1;
        self.failed += 1;
        self.failures.push(FailedPage {
            url: url.to_string(),
            reason: reason.into(),
        });
    }

    /// Records an entry that was dropped without fetching
    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Time since the crawl started
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Freezes the counters into a final report
    pub fn finish(self, final_state: CrawlState) -> CrawlReport {
        let elapsed = self.elapsed();
        CrawlReport {
            stats: self,
            elapsed,
            final_state,
        }
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Final summary of a crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    pub stats: CrawlStats,
    pub elapsed: Duration,
    pub final_state: CrawlState,
}

impl CrawlReport {
    /// Zero-count report for a crawl that never got to fetch anything
    pub fn not_started() -> Self {
        Self {
            stats: CrawlStats::new(),
            elapsed: Duration::ZERO,
            final_state: CrawlState::Interrupted,
        }
    }

    /// Successful pages per second, `None` when no time has elapsed
    pub fn throughput(&self) -> Option<f64> {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            Some(self.stats.success as f64 / seconds)
        } else {
            None
        }
    }

    /// True if the crawl ran until the frontier was empty
    pub fn completed(&self) -> bool {
        self.final_state == CrawlState::Finished
    }
}

/// Prints the completion report to stdout
///
/// # Arguments
///
/// * `report` - The report to display
/// * `location` - Where the crawled content was written
pub fn print_report(report: &CrawlReport, location: &str) {
    println!("{}", "=".repeat(70));
    if report.completed() {
        println!("Crawl finished");
    } else {
        println!("Crawl {}", report.final_state);
    }
    println!("{}", "=".repeat(70));
    println!("Total pages: {}", report.stats.total);
    println!("Success:     {}", report.stats.success);
    println!("Failed:      {}", report.stats.failed);
    println!("Skipped:     {}", report.stats.skipped);
    println!("Elapsed:     {:.2} s", report.elapsed.as_secs_f64());
    if let Some(rate) = report.throughput() {
        println!("Throughput:  {:.2} pages/s", rate);
    }
    println!("Output:      {}", location);
    println!("{}", "=".repeat(70));
}
