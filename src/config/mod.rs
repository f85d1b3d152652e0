//! Configuration module for Site-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files,
//! and derives the immutable [`CrawlPolicy`] a crawl runs under.
//!
//! # Example
//!
//! ```no_run
//! use site_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use depth limit: {}", config.crawler.depth_limit);
//! ```

mod parser;
mod policy;
mod types;
mod validation;

// Re-export types
pub use policy::{CrawlPolicy, PolicyRejection};
pub use types::{
    default_exclude_patterns, Config, CrawlerConfig, FetcherConfig, OutputConfig, StoreBackend,
    DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_seed};
