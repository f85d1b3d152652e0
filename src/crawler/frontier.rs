//! Breadth-first work queue
//!
//! The frontier owns the FIFO of pending `(url, depth)` entries, the set of
//! visited URLs, and an index of URLs currently queued. Children are always
//! appended after their parent is popped, so every depth-`d` entry is drained
//! before any depth-`d + 1` entry.

use crate::config::CrawlPolicy;
use crate::url::NormalizedUrl;
use std::collections::{HashSet, VecDeque};
use thiserror::Error;

/// A unit of pending work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: NormalizedUrl,
    /// Link hops from the seed (the seed is depth 0)
    pub depth: u32,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FrontierError {
    #[error("frontier is empty")]
    Empty,
}

/// FIFO frontier with visited-set and in-flight deduplication
#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<NormalizedUrl>,
    queued: HashSet<NormalizedUrl>,
    policy: CrawlPolicy,
}

impl Frontier {
    /// Creates a frontier holding only the seed at depth 0
    pub fn new(seed: NormalizedUrl, policy: CrawlPolicy) -> Self {
        let mut queued = HashSet::new();
        queued.insert(seed.clone());

        let mut queue = VecDeque::new();
        queue.push_back(FrontierEntry {
            url: seed,
            depth: 0,
        });

        Self {
            queue,
            visited: HashSet::new(),
            queued,
            policy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of entries waiting
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Number of URLs marked visited
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// Removes and returns the oldest entry
    pub fn pop_next(&mut self) -> Result<FrontierEntry, FrontierError> {
        let entry = self.queue.pop_front().ok_or(FrontierError::Empty)?;
        self.queued.remove(&entry.url);
        Ok(entry)
    }

    /// Records a URL as visited; repeated calls have no further effect
    pub fn mark_visited(&mut self, url: &NormalizedUrl) {
        if !self.visited.contains(url) {
            self.visited.insert(url.clone());
        }
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains(url)
    }

    /// Appends `url` at `depth` if it is new, within the depth limit, and
    /// admitted by the policy
    ///
    /// Returns whether the URL was queued.
    pub fn offer(&mut self, url: NormalizedUrl, depth: u32) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        if !self.policy.within_depth(depth) || !self.policy.admits(&url) {
            return false;
        }

        self.queued.insert(url.clone());
        self.queue.push_back(FrontierEntry { url, depth });
        true
    }
}
