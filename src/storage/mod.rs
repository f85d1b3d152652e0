//! Storage module for persisting crawled pages
//!
//! This module handles everything written per visited page:
//! - Key derivation (sanitized title plus a short URL hash)
//! - The `ContentStore` capability the pipeline saves through
//! - A filesystem backend (`.html` / `.txt` / `.json` per page)
//! - A SQLite backend with per-run bookkeeping

mod file_store;
mod key;
mod schema;
mod sqlite;
mod traits;

pub use file_store::FileStore;
pub use key::{page_key, sanitize_filename, url_hash, UNTITLED};
pub use sqlite::SqliteStore;
pub use traits::{ContentStore, PageMetadata, PageRecord, RunInfo, StoreError, StoreResult};

use crate::config::{OutputConfig, StoreBackend};
use std::sync::Arc;

/// Opens the content store selected by the output configuration
///
/// # Returns
///
/// * `Ok(Arc<dyn ContentStore>)` - Ready-to-use store
/// * `Err(StoreError)` - The output location could not be prepared
pub fn open_store(config: &OutputConfig) -> StoreResult<Arc<dyn ContentStore>> {
    let store: Arc<dyn ContentStore> = match config.backend {
        StoreBackend::Files => Arc::new(FileStore::new(&config.directory)?),
        StoreBackend::Sqlite => Arc::new(SqliteStore::new(&config.database_path())?),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_open_file_store() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            directory: dir.path().join("out"),
            ..OutputConfig::default()
        };
        open_store(&config).unwrap();
        assert!(dir.path().join("out").is_dir());
    }

    #[test]
    fn test_open_sqlite_store() {
        let dir = TempDir::new().unwrap();
        let config = OutputConfig {
            directory: dir.path().to_path_buf(),
            backend: StoreBackend::Sqlite,
            database_file: "crawl.db".to_string(),
        };
        let store = open_store(&config).unwrap();
        assert!(store.describe().ends_with("crawl.db"));
        assert!(dir.path().join("crawl.db").exists());
    }
}
