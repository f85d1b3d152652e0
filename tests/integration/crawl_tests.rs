//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle end-to-end through the HTTP fetcher, the HTML extractor and
//! the content stores.

use site_harvest::config::{Config, StoreBackend};
use site_harvest::crawler::build_crawler;
use site_harvest::output::CrawlReport;
use site_harvest::state::CrawlState;
use site_harvest::storage::{open_store, SqliteStore};
use site_harvest::url::NormalizedUrl;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a configuration without politeness delays or retries
fn create_test_config(output: &Path, depth_limit: u32) -> Config {
    let mut config = Config::default();
    config.crawler.depth_limit = depth_limit;
    config.crawler.delay_min = 0.0;
    config.crawler.delay_max = 0.0;
    config.fetcher.max_retries = 0;
    config.fetcher.retry_delay_ms = 1;
    config.fetcher.read_timeout = 5;
    config.fetcher.connect_timeout = 2;
    config.output.directory = output.to_path_buf();
    config
}

fn html_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>Content of {}</p>{}</body></html>",
        title, title, anchors
    )
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "text/html"),
        )
        .mount(server)
        .await;
}

async fn run_crawl(server: &MockServer, config: &Config) -> CrawlReport {
    let seed = NormalizedUrl::parse(&format!("{}/", server.uri())).expect("valid seed");
    let store = open_store(&config.output).expect("Failed to open store");
    let crawler = build_crawler(seed, config, store).expect("Failed to build crawler");
    crawler.run().await.expect("Crawl failed")
}

fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
        .expect("output directory exists")
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|e| e.to_str()) == Some(extension))
        .collect();
    files.sort();
    files
}

#[tokio::test]
async fn test_linear_chain_with_cycle() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", html_page("A", &["/b"])).await;
    mount_page(&mock_server, "/b", html_page("B", &["/c"])).await;
    mount_page(&mock_server, "/c", html_page("C", &["/", "/d"])).await;

    // C sits at the depth ceiling, so its links are never followed
    Mock::given(method("GET"))
        .and(path("/d"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(output.path(), 2);
    let report = run_crawl(&mock_server, &config).await;

    assert_eq!(report.final_state, CrawlState::Finished);
    assert_eq!(report.stats.total, 3);
    assert_eq!(report.stats.success, 3);
    assert_eq!(report.stats.failed, 0);
    assert_eq!(files_with_extension(output.path(), "html").len(), 3);
}

#[tokio::test]
async fn test_excluded_pattern_never_fetched() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        html_page("Home", &["/file.pdf", "/archive.zip", "/about"]),
    )
    .await;
    mount_page(&mock_server, "/about", html_page("About", &[])).await;

    Mock::given(method("GET"))
        .and(path("/file.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(output.path(), 2);
    let report = run_crawl(&mock_server, &config).await;

    assert_eq!(report.stats.total, 2);
    assert_eq!(report.stats.success, 2);
    assert_eq!(report.stats.skipped, 0);
}

#[tokio::test]
async fn test_fetch_failure_isolation() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", html_page("Home", &["/b", "/c"])).await;
    mount_page(&mock_server, "/c", html_page("C", &[])).await;

    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(output.path(), 2);
    let report = run_crawl(&mock_server, &config).await;

    assert_eq!(report.final_state, CrawlState::Finished);
    assert_eq!(report.stats.failed, 1);
    assert_eq!(report.stats.success, 2);
    assert!(report.stats.failures[0].url.ends_with("/b"));
    assert!(report.stats.failures[0].reason.contains("404"));
}

#[tokio::test]
async fn test_page_visited_once_across_pages() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", html_page("Home", &["/a", "/b", "/shared#top"])).await;
    mount_page(&mock_server, "/a", html_page("A", &["/shared", "/"])).await;
    mount_page(&mock_server, "/b", html_page("B", &["/shared?"])).await;

    Mock::given(method("GET"))
        .and(path("/shared"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(html_page("Shared", &[]), "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(output.path(), 3);
    let report = run_crawl(&mock_server, &config).await;

    assert_eq!(report.stats.success, 4);
}

#[tokio::test]
async fn test_file_store_artifacts() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", html_page("Hello: World?", &[])).await;

    let config = create_test_config(output.path(), 1);
    run_crawl(&mock_server, &config).await;

    let html = files_with_extension(output.path(), "html");
    assert_eq!(html.len(), 1);
    let stem = html[0].file_stem().unwrap().to_str().unwrap().to_string();
    assert!(stem.starts_with("Hello_World_"));
    assert_eq!(stem.len(), "Hello_World_".len() + 8);

    let text = std::fs::read_to_string(output.path().join(format!("{}.txt", stem))).unwrap();
    assert_eq!(text, "Hello: World?\nContent of Hello: World?");

    let metadata: serde_json::Value = serde_json::from_str(
        &std::fs::read_to_string(output.path().join(format!("{}.json", stem))).unwrap(),
    )
    .unwrap();
    assert_eq!(metadata["url"], format!("{}/", mock_server.uri()));
    assert_eq!(metadata["title"], "Hello: World?");
    assert!(metadata["fetched_at"].is_string());
}

#[tokio::test]
async fn test_foreign_host_not_followed() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    // Same machine, different host name
    let foreign = format!("{}/x", other_server.uri().replace("127.0.0.1", "localhost"));
    mount_page(&mock_server, "/", html_page("Home", &[foreign.as_str()])).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&other_server)
        .await;

    let config = create_test_config(output.path(), 2);
    let report = run_crawl(&mock_server, &config).await;

    assert_eq!(report.stats.total, 1);
}

#[tokio::test]
async fn test_sqlite_backend_records_run() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", html_page("Home", &["/a"])).await;
    mount_page(&mock_server, "/a", html_page("A", &[])).await;

    let mut config = create_test_config(output.path(), 1);
    config.output.backend = StoreBackend::Sqlite;
    let report = run_crawl(&mock_server, &config).await;
    assert_eq!(report.stats.success, 2);

    let store = SqliteStore::new(&config.output.database_path()).unwrap();
    assert_eq!(store.count_pages().unwrap(), 2);
    assert_eq!(
        store
            .text_for_url(&format!("{}/a", mock_server.uri()))
            .unwrap()
            .as_deref(),
        Some("A\nContent of A")
    );

    let (state, total, success, failed, _) = store.latest_run().unwrap().unwrap();
    assert_eq!(state, CrawlState::Finished);
    assert_eq!((total, success, failed), (2, 2, 0));
    assert!(files_with_extension(output.path(), "html").is_empty());
}

#[tokio::test]
async fn test_unreachable_seed_counts_as_failure() {
    let output = TempDir::new().unwrap();
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let config = create_test_config(output.path(), 2);
    let seed = NormalizedUrl::parse(&format!("http://127.0.0.1:{}/", port)).unwrap();
    let store = open_store(&config.output).unwrap();
    let report = build_crawler(seed, &config, store)
        .unwrap()
        .run()
        .await
        .unwrap();

    assert_eq!(report.final_state, CrawlState::Finished);
    assert_eq!(report.stats.total, 1);
    assert_eq!(report.stats.failed, 1);
}
