//! Crawl driver - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates the crawl:
//! - Popping frontier entries in breadth-first order
//! - Handing each entry to the pipeline and counting the outcome
//! - Offering discovered links back to the frontier
//! - Politeness delays between fetches
//! - Handling interruption and releasing resources on every exit path

use crate::crawler::frontier::{Frontier, FrontierEntry, FrontierError};
use crate::crawler::pipeline::{Outcome, Pipeline};
use crate::output::{CrawlReport, CrawlStats};
use crate::state::CrawlState;
use crate::storage::RunInfo;
use crate::url::NormalizedUrl;
use crate::{HarvestError, Result};
use rand::Rng;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Number of processed entries between progress lines
const PROGRESS_INTERVAL: u64 = 10;

/// Randomized wait between consecutive fetches
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl DelayRange {
    /// Builds a range from seconds; invalid bounds become zero
    pub fn from_secs(min: f64, max: f64) -> Self {
        Self {
            min: Duration::try_from_secs_f64(min).unwrap_or_default(),
            max: Duration::try_from_secs_f64(max).unwrap_or_default(),
        }
    }

    /// No delay at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Samples a delay uniformly from `[min, max]`
    pub fn sample(&self) -> Duration {
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::thread_rng().gen_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Single-worker breadth-first crawl driver
///
/// Owns the frontier and the running statistics; the pipeline is borrowed
/// once per entry. Exactly one entry is in flight at a time.
pub struct Crawler {
    seed: NormalizedUrl,
    frontier: Frontier,
    pipeline: Pipeline,
    stats: CrawlStats,
    state: CrawlState,
    delay: DelayRange,
    cancel: CancellationToken,
    config_hash: Option<String>,
}

impl Crawler {
    /// Creates a driver whose frontier holds only `seed`
    pub fn new(seed: NormalizedUrl, pipeline: Pipeline, delay: DelayRange) -> Self {
        let frontier = Frontier::new(seed.clone(), pipeline.policy().clone());
        Self {
            seed,
            frontier,
            pipeline,
            stats: CrawlStats::new(),
            state: CrawlState::Running,
            delay,
            cancel: CancellationToken::new(),
            config_hash: None,
        }
    }

    /// Uses an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Records the configuration hash with the run
    pub fn with_config_hash(mut self, hash: Option<String>) -> Self {
        self.config_hash = hash;
        self
    }

    /// Token that interrupts the crawl when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl to completion or interruption
    ///
    /// The fetcher is closed and the store's run is finished exactly once,
    /// whatever way the loop ends.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - Final statistics, also after interruption
    /// * `Err(HarvestError)` - The store refused to start the run
    pub async fn run(mut self) -> Result<CrawlReport> {
        let policy = self.pipeline.policy();
        tracing::info!("Starting crawl of {}", self.seed);
        tracing::info!(
            "Output: {}, depth limit: {}, same domain only: {}, delay: {:.1}-{:.1}s",
            self.pipeline.store().describe(),
            policy.depth_limit,
            policy.same_domain_only,
            self.delay.min.as_secs_f64(),
            self.delay.max.as_secs_f64()
        );

        let run = RunInfo {
            seed: self.seed.to_string(),
            config_hash: self.config_hash.clone(),
            started_at: self.stats.started_at,
        };
        if let Err(e) = self.pipeline.store().begin_run(&run) {
            self.pipeline.fetcher().close().await;
            return Err(e.into());
        }

        if let Err(e) = self.crawl_loop().await {
            tracing::error!("Crawl aborted: {}", e);
            if !self.state.is_terminal() {
                self.state = CrawlState::Interrupted;
            }
        }

        if self.state == CrawlState::Interrupted {
            tracing::warn!(
                "Crawl interrupted with {} entries left in the frontier",
                self.frontier.len()
            );
        }

        self.pipeline.fetcher().close().await;

        let report = self.stats.finish(self.state);
        if let Err(e) = self.pipeline.store().finish_run(&report) {
            tracing::warn!("Failed to record run completion: {}", e);
        }

        tracing::info!(
            "Crawl {}: {} pages in {:.2}s",
            report.final_state,
            report.stats.total,
            report.elapsed.as_secs_f64()
        );

        Ok(report)
    }

    async fn crawl_loop(&mut self) -> Result<()> {
        let depth_limit = self.pipeline.policy().depth_limit;
        let mut processed: u64 = 0;

        while self.state.is_active() {
            if self.cancel.is_cancelled() {
                self.transition(CrawlState::Interrupted)?;
                break;
            }

            let entry = match self.frontier.pop_next() {
                Ok(entry) => entry,
                Err(FrontierError::Empty) => {
                    tracing::info!("Frontier is empty, crawl complete");
                    self.transition(CrawlState::Finished)?;
                    break;
                }
            };

            if self.frontier.is_visited(&entry.url) {
                tracing::debug!("Already visited: {}", entry.url);
                self.stats.record_skip();
                continue;
            }

            if entry.depth >= depth_limit {
                self.transition(CrawlState::Draining)?;
            }

            if processed > 0 && !self.wait_politely().await {
                self.transition(CrawlState::Interrupted)?;
                break;
            }

            self.frontier.mark_visited(&entry.url);
            tracing::info!("[depth {}/{}] {}", entry.depth, depth_limit, entry.url);

            let outcome = self.pipeline.process(&entry).await;
            self.record_outcome(&entry, outcome);

            processed += 1;
            if processed % PROGRESS_INTERVAL == 0 {
                let rate = processed as f64 / self.stats.elapsed().as_secs_f64();
                tracing::info!(
                    "Progress: {} pages processed, {} in frontier, {:.2} pages/sec",
                    processed,
                    self.frontier.len(),
                    rate
                );
            }
        }

        Ok(())
    }

    /// Counts an outcome and offers any discovered links
    fn record_outcome(&mut self, entry: &FrontierEntry, outcome: Outcome) {
        match outcome {
            Outcome::Success { links, key, .. } => {
                self.stats.record_success(entry.depth);
                tracing::info!("Saved {}", key);

                for link in links {
                    let text = link.to_string();
                    if self.frontier.offer(link, entry.depth + 1) {
                        tracing::debug!("Queued {} at depth {}", text, entry.depth + 1);
                    }
                }
            }
            Outcome::Failed(reason) => {
                tracing::warn!("Failed {}: {}", entry.url, reason);
                self.stats.record_failure(entry.url.as_str(), reason.to_string());
            }
            Outcome::Skipped(reason) => {
                tracing::debug!("Skipped {}: {}", entry.url, reason);
                self.stats.record_skip();
            }
        }
    }

    /// Sleeps for a sampled delay; returns false if cancelled meanwhile
    async fn wait_politely(&self) -> bool {
        let delay = self.delay.sample();
        if delay.is_zero() {
            return true;
        }

        tracing::trace!("Waiting {:.2}s before next request", delay.as_secs_f64());
        tokio::select! {
            _ = self.cancel.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    fn transition(&mut self, next: CrawlState) -> Result<()> {
        if self.state == next {
            return Ok(());
        }
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::debug!("Crawl state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }
}
