//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: The driver's lifecycle (running, draining, finished, interrupted)

mod crawl_state;

// Re-export main types
pub use crawl_state::CrawlState;
