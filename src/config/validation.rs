use crate::config::types::{Config, CrawlerConfig, FetcherConfig, OutputConfig};
use crate::url::NormalizedUrl;
use crate::ConfigError;
use std::time::Duration;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates the crawl seed and returns its normalized form
///
/// A malformed seed is an unrecoverable startup error: the crawl fails fast
/// before any frontier exists.
pub fn validate_seed(seed: &str) -> Result<NormalizedUrl, ConfigError> {
    let trimmed = seed.trim();
    if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
        return Err(ConfigError::InvalidUrl(format!(
            "Seed URL '{}' must start with http:// or https://",
            seed
        )));
    }

    NormalizedUrl::parse(trimmed)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid seed URL '{}': {}", seed, e)))
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // depth_limit is a u32, so every value is a valid limit

    for (name, value) in [("delay_min", config.delay_min), ("delay_max", config.delay_max)] {
        if Duration::try_from_secs_f64(value).is_err() {
            return Err(ConfigError::Validation(format!(
                "{} must be a non-negative, representable number of seconds, got {}",
                name, value
            )));
        }
    }

    if config.delay_min > config.delay_max {
        return Err(ConfigError::Validation(format!(
            "delay_min ({}) must not exceed delay_max ({})",
            config.delay_min, config.delay_max
        )));
    }

    if config.exclude_patterns.iter().any(|p| p.is_empty()) {
        return Err(ConfigError::Validation(
            "exclude_patterns cannot contain empty patterns".to_string(),
        ));
    }

    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    if config.connect_timeout == 0 {
        return Err(ConfigError::Validation(
            "connect_timeout must be >= 1 second".to_string(),
        ));
    }

    if config.read_timeout == 0 {
        return Err(ConfigError::Validation(
            "read_timeout must be >= 1 second".to_string(),
        ));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.as_os_str().is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.database_file.trim().is_empty() {
        return Err(ConfigError::Validation(
            "database_file cannot be empty".to_string(),
        ));
    }

    Ok(())
}
