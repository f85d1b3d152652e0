use serde::Deserialize;
use std::path::PathBuf;

/// Browser-like user agent sent by default
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Site-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub crawler: CrawlerConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// Crawl policy configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of link hops from the seed URL
    #[serde(rename = "depth-limit")]
    pub depth_limit: u32,

    /// Lower bound of the politeness delay between fetches (seconds)
    #[serde(rename = "delay-min")]
    pub delay_min: f64,

    /// Upper bound of the politeness delay between fetches (seconds)
    #[serde(rename = "delay-max")]
    pub delay_max: f64,

    /// Only follow links whose host equals the seed's host
    #[serde(rename = "same-domain-only")]
    pub same_domain_only: bool,

    /// Substrings that exclude a URL from the crawl
    #[serde(rename = "exclude-patterns")]
    pub exclude_patterns: Vec<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            depth_limit: 3,
            delay_min: 2.0,
            delay_max: 4.0,
            same_domain_only: true,
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// The exclusion list used when none is configured
pub fn default_exclude_patterns() -> Vec<String> {
    [".pdf", ".zip", ".tar", ".gz", ".exe", "#"]
        .iter()
        .map(|p| p.to_string())
        .collect()
}

/// HTTP fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Accept-Language header sent with every request
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout")]
    pub connect_timeout: u64,

    /// Whole-request timeout (seconds)
    #[serde(rename = "read-timeout")]
    pub read_timeout: u64,

    /// Additional attempts after a transient failure
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Pause between retry attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "zh-CN,zh;q=0.9,en;q=0.8".to_string(),
            connect_timeout: 10,
            read_timeout: 90,
            max_retries: 3,
            retry_delay_ms: 1000,
        }
    }
}

/// Which content store receives saved pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// One `.html`, `.txt` and `.json` file per page
    #[default]
    Files,
    /// A single SQLite database inside the output directory
    Sqlite,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "files" => Ok(Self::Files),
            "sqlite" => Ok(Self::Sqlite),
            other => Err(format!("unknown backend '{}' (expected files or sqlite)", other)),
        }
    }
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Files => write!(f, "files"),
            Self::Sqlite => write!(f, "sqlite"),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving all crawl output
    pub directory: PathBuf,

    /// Content store backend
    pub backend: StoreBackend,

    /// SQLite file name, relative to `directory`
    #[serde(rename = "database-file")]
    pub database_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("scraped_content"),
            backend: StoreBackend::Files,
            database_file: "pages.db".to_string(),
        }
    }
}

impl OutputConfig {
    /// Full path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.directory.join(&self.database_file)
    }
}
