//! Site-Harvest main entry point
//!
//! This is the command-line interface for the Site-Harvest site archiver.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use site_harvest::config::{
    load_config_with_hash, validate, validate_seed, Config, CrawlPolicy, StoreBackend,
};
use site_harvest::crawler::build_crawler;
use site_harvest::output::{
    generate_markdown_report, print_report, CrawlReport, ReportContext, REPORT_FILE_NAME,
};
use site_harvest::storage::open_store;
use site_harvest::NormalizedUrl;
use tracing_subscriber::EnvFilter;

/// Site-Harvest: a breadth-first site archiver
///
/// Site-Harvest crawls a website from a seed URL up to a bounded depth and
/// saves every visited page's markup, plain text and metadata.
#[derive(Parser, Debug)]
#[command(name = "site-harvest")]
#[command(version = "1.0.0")]
#[command(about = "A breadth-first site archiver", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum number of link hops from the seed
    #[arg(short, long, value_name = "DEPTH")]
    depth: Option<u32>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Politeness delay range between requests, in seconds
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"])]
    delay: Option<Vec<f64>>,

    /// Follow links to other domains
    #[arg(long)]
    allow_external: bool,

    /// URL substrings to exclude (replaces the default list)
    #[arg(long, num_args = 1.., value_name = "PAT")]
    exclude: Option<Vec<String>>,

    /// Path to TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Content store backend (files or sqlite)
    #[arg(long, value_name = "BACKEND")]
    backend: Option<StoreBackend>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Fail fast on a malformed seed, before anything is built
    let seed = validate_seed(&cli.url)?;

    let (config, config_hash) = load_effective_config(&cli)?;
    let policy = CrawlPolicy::from_config(&seed, &config.crawler);

    if cli.dry_run {
        handle_dry_run(&seed, &config, &policy);
        return Ok(());
    }

    handle_crawl(seed, config, policy, config_hash).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("site_harvest=info,warn")),
            1 => EnvFilter::new("site_harvest=debug,info"),
            2 => EnvFilter::new("site_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<(Config, Option<String>)> {
    let (mut config, hash) = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(depth) = cli.depth {
        config.crawler.depth_limit = depth;
    }
    if let Some(directory) = &cli.output {
        config.output.directory = directory.clone();
    }
    if let Some(delay) = &cli.delay {
        if let [min, max] = delay.as_slice() {
            config.crawler.delay_min = *min;
            config.crawler.delay_max = *max;
        }
    }
    if cli.allow_external {
        config.crawler.same_domain_only = false;
    }
    if let Some(patterns) = &cli.exclude {
        config.crawler.exclude_patterns = patterns.clone();
    }
    if let Some(backend) = cli.backend {
        config.output.backend = backend;
    }

    validate(&config).context("Invalid configuration")?;
    Ok((config, hash))
}

/// Handles the --dry-run mode: shows the effective configuration and policy
fn handle_dry_run(seed: &NormalizedUrl, config: &Config, policy: &CrawlPolicy) {
    println!("=== Site-Harvest Dry Run ===\n");

    println!("Seed: {}", seed);
    println!("Start domain: {}", policy.start_domain);

    println!("\nCrawl Policy:");
    println!("  Depth limit: {}", policy.depth_limit);
    println!("  Same domain only: {}", policy.same_domain_only);
    println!("  Exclude patterns: {}", policy.exclude_patterns.join(" "));
    println!(
        "  Delay: {:.1}-{:.1}s",
        config.crawler.delay_min, config.crawler.delay_max
    );

    println!("\nFetcher:");
    println!("  User agent: {}", config.fetcher.user_agent);
    println!("  Accept-Language: {}", config.fetcher.accept_language);
    println!(
        "  Timeouts: connect {}s, read {}s",
        config.fetcher.connect_timeout, config.fetcher.read_timeout
    );
    println!(
        "  Retries: {} (every {}ms)",
        config.fetcher.max_retries, config.fetcher.retry_delay_ms
    );

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory.display());
    println!("  Backend: {}", config.output.backend);
    if config.output.backend == StoreBackend::Sqlite {
        println!("  Database: {}", config.output.database_path().display());
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(
    seed: NormalizedUrl,
    config: Config,
    policy: CrawlPolicy,
    config_hash: Option<String>,
) -> anyhow::Result<()> {
    let store = open_store(&config.output).context("Failed to open output store")?;
    let location = store.describe();

    let crawler = build_crawler(seed.clone(), &config, store)?.with_config_hash(config_hash);

    // Ctrl-C cancels the crawl between pages
    let token = crawler.cancellation_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, stopping after the current page");
            token.cancel();
        }
    });

    let report = match crawler.run().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl could not start: {}", e);
            print_report(&CrawlReport::not_started(), &location);
            return Err(e).context("Crawl failed");
        }
    };

    print_report(&report, &location);

    let context = ReportContext {
        seed: seed.as_str(),
        depth_limit: policy.depth_limit,
        same_domain_only: policy.same_domain_only,
        location: &location,
    };
    let report_path = config.output.directory.join(REPORT_FILE_NAME);
    match generate_markdown_report(&report, &context, &report_path) {
        Ok(()) => tracing::info!("Report written to {}", report_path.display()),
        Err(e) => tracing::warn!("Failed to write report {}: {}", report_path.display(), e),
    }

    Ok(())
}
