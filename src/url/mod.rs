//! URL handling module for Site-Harvest
//!
//! This module provides link normalization and the host/pattern checks the
//! crawl policy is built from.

mod filter;
mod normalize;

// Re-export main functions
pub use filter::{is_same_domain, matching_exclusion};
pub use normalize::{normalize, NormalizedUrl};
