//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - The `PageFetcher` capability the pipeline fetches through
//! - Building the HTTP client with browser-like headers and timeouts
//! - Bounded retry logic for transient failures
//! - Error classification

use crate::config::FetcherConfig;
use crate::url::NormalizedUrl;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A fetched page
#[derive(Debug, Clone)]
pub struct RawPage {
    /// Response body exactly as received (after content decoding)
    pub content: Vec<u8>,
    /// URL after following redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: u16,
    /// Content-Type header value, if present
    pub content_type: Option<String>,
}

/// Terminal fetch failures surfaced to the crawl engine
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("connection to {url} failed: {message}")]
    Connection { url: String, message: String },

    #[error("{url} returned HTTP status {code}")]
    HttpStatus { url: String, code: u16 },

    #[error("failed to read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Returns true if another attempt may succeed
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } | Self::Body { .. } => true,
            Self::HttpStatus { code, .. } => {
                *code == StatusCode::TOO_MANY_REQUESTS.as_u16() || *code >= 500
            }
        }
    }
}

/// Capability for retrieving a page over the network
///
/// Implementations own their connection resources and their retry policy. The
/// crawl engine never retries; it only sees the terminal result.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a single page
    async fn fetch(&self, url: &NormalizedUrl) -> Result<RawPage, FetchError>;

    /// Releases held resources; called exactly once when the crawl ends
    async fn close(&self) {}
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use site_harvest::config::FetcherConfig;
/// use site_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&FetcherConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    if let Ok(language) = HeaderValue::from_str(&config.accept_language) {
        headers.insert(ACCEPT_LANGUAGE, language);
    }

    Client::builder()
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.read_timeout))
        .connect_timeout(Duration::from_secs(config.connect_timeout))
        .gzip(true)
        .brotli(true)
        .build()
}

/// reqwest-backed fetcher with bounded retries
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | HTTP 429 / 5xx | Retry up to `max_retries` times |
/// | Other HTTP status | Immediate failure |
/// | Timeout | Retry up to `max_retries` times |
/// | Connection error | Retry up to `max_retries` times |
pub struct HttpFetcher {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
}

impl HttpFetcher {
    /// Creates a fetcher from the fetcher configuration
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            max_retries: config.max_retries,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
        })
    }

    async fn fetch_once(&self, url: &NormalizedUrl) -> Result<RawPage, FetchError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let body = response.bytes().await.map_err(|e| FetchError::Body {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        Ok(RawPage {
            content: body.to_vec(),
            final_url,
            status: status.as_u16(),
            content_type,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &NormalizedUrl) -> Result<RawPage, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.max_retries => {
                    attempt += 1;
                    tracing::debug!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt,
                        self.max_retries + 1,
                        url,
                        e
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn close(&self) {
        tracing::debug!("HTTP fetcher released");
    }
}

/// Maps a reqwest transport error onto the fetch error taxonomy
fn classify_error(url: &NormalizedUrl, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else {
        FetchError::Connection {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
