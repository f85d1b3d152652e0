//! SQLite content store
//!
//! This module provides a SQLite-based implementation of the ContentStore trait.
//! All pages of all runs live in one database file; each run gets a row in
//! `runs` with its final counters.

use crate::output::CrawlReport;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{ContentStore, PageRecord, RunInfo, StoreError, StoreResult};
use crate::state::CrawlState;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

struct Inner {
    conn: Connection,
    run_id: Option<i64>,
}

/// SQLite content store backend
pub struct SqliteStore {
    inner: Mutex<Inner>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    /// Opens (or creates) the database at `path`
    ///
    /// The parent directory is created if it does not exist.
    pub fn new(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            inner: Mutex::new(Inner { conn, run_id: None }),
            path: Some(path.to_path_buf()),
        })
    }

    /// Creates an in-memory database (for testing)
    pub fn new_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self {
            inner: Mutex::new(Inner { conn, run_id: None }),
            path: None,
        })
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Database("connection lock poisoned".to_string()))
    }

    /// Counts stored pages
    pub fn count_pages(&self) -> StoreResult<u64> {
        let inner = self.lock()?;
        let count: i64 = inner
            .conn
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Loads the plain text stored for a URL
    pub fn text_for_url(&self, url: &str) -> StoreResult<Option<String>> {
        let inner = self.lock()?;
        let text = inner
            .conn
            .query_row(
                "SELECT plain_text FROM pages WHERE url = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }

    /// Returns the status and counters of the most recent run
    pub fn latest_run(&self) -> StoreResult<Option<(CrawlState, u64, u64, u64, u64)>> {
        let inner = self.lock()?;
        let run = inner
            .conn
            .query_row(
                "SELECT status, total, success, failed, skipped FROM runs ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    let status: String = row.get(0)?;
                    Ok((
                        CrawlState::from_db_string(&status).unwrap_or(CrawlState::Running),
                        row.get::<_, i64>(1)? as u64,
                        row.get::<_, i64>(2)? as u64,
                        row.get::<_, i64>(3)? as u64,
                        row.get::<_, i64>(4)? as u64,
                    ))
                },
            )
            .optional()?;
        Ok(run)
    }
}

impl ContentStore for SqliteStore {
    fn save(&self, key: &str, record: &PageRecord) -> StoreResult<()> {
        let inner = self.lock()?;
        inner.conn.execute(
            "INSERT INTO pages (key, url, title, raw_markup, plain_text, fetched_at, run_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(key) DO UPDATE SET
                url = excluded.url,
                title = excluded.title,
                raw_markup = excluded.raw_markup,
                plain_text = excluded.plain_text,
                fetched_at = excluded.fetched_at,
                run_id = excluded.run_id",
            params![
                key,
                record.url.as_str(),
                record.title,
                record.raw_markup,
                record.plain_text,
                record.fetched_at.to_rfc3339(),
                inner.run_id,
            ],
        )?;
        Ok(())
    }

    fn begin_run(&self, run: &RunInfo) -> StoreResult<()> {
        let mut inner = self.lock()?;
        inner.conn.execute(
            "INSERT INTO runs (seed_url, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                run.seed,
                run.started_at.to_rfc3339(),
                run.config_hash,
                CrawlState::Running.to_db_string()
            ],
        )?;
        inner.run_id = Some(inner.conn.last_insert_rowid());
        Ok(())
    }

    fn finish_run(&self, report: &CrawlReport) -> StoreResult<()> {
        let inner = self.lock()?;
        let Some(run_id) = inner.run_id else {
            return Ok(());
        };

        inner.conn.execute(
            "UPDATE runs SET finished_at = ?1, status = ?2, total = ?3, success = ?4, failed = ?5, skipped = ?6
             WHERE id = ?7",
            params![
                Utc::now().to_rfc3339(),
                report.final_state.to_db_string(),
                report.stats.total as i64,
                report.stats.success as i64,
                report.stats.failed as i64,
                report.stats.skipped as i64,
                run_id,
            ],
        )?;
        Ok(())
    }

    fn describe(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => ":memory:".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::CrawlStats;
    use crate::url::NormalizedUrl;
    use std::time::Duration;

    fn record(url: &str, text: &str) -> PageRecord {
        PageRecord {
            url: NormalizedUrl::parse(url).unwrap(),
            title: Some("Title".to_string()),
            raw_markup: b"<html></html>".to_vec(),
            plain_text: text.to_string(),
            fetched_at: Utc::now(),
        }
    }

    fn run_info() -> RunInfo {
        RunInfo {
            seed: "https://example.com/".to_string(),
            config_hash: Some("abc123".to_string()),
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_in_memory() {
        assert!(SqliteStore::new_in_memory().is_ok());
    }

    #[test]
    fn test_save_and_read_back() {
        let store = SqliteStore::new_in_memory().unwrap();
        store
            .save("Title_aaaa0000", &record("https://example.com/a", "alpha"))
            .unwrap();

        assert_eq!(store.count_pages().unwrap(), 1);
        assert_eq!(
            store.text_for_url("https://example.com/a").unwrap(),
            Some("alpha".to_string())
        );
        assert_eq!(store.text_for_url("https://example.com/b").unwrap(), None);
    }

    #[test]
    fn test_save_same_key_overwrites() {
        let store = SqliteStore::new_in_memory().unwrap();
        store.save("k", &record("https://example.com/a", "old")).unwrap();
        store.save("k", &record("https://example.com/a", "new")).unwrap();

        assert_eq!(store.count_pages().unwrap(), 1);
        assert_eq!(
            store.text_for_url("https://example.com/a").unwrap(),
            Some("new".to_string())
        );
    }

    #[test]
    fn test_run_bookkeeping() {
        let store = SqliteStore::new_in_memory().unwrap();
        store.begin_run(&run_info()).unwrap();

        let (state, ..) = store.latest_run().unwrap().unwrap();
        assert_eq!(state, CrawlState::Running);

        let mut stats = CrawlStats::new();
        stats.total = 4;
        stats.success = 3;
        stats.failed = 1;
        let report = CrawlReport {
            stats,
            elapsed: Duration::from_secs(2),
            final_state: CrawlState::Finished,
        };
        store.finish_run(&report).unwrap();

        let (state, total, success, failed, skipped) = store.latest_run().unwrap().unwrap();
        assert_eq!(state, CrawlState::Finished);
        assert_eq!((total, success, failed, skipped), (4, 3, 1, 0));
    }

    #[test]
    fn test_finish_without_begin_is_noop() {
        let store = SqliteStore::new_in_memory().unwrap();
        let report = CrawlReport {
            stats: CrawlStats::new(),
            elapsed: Duration::ZERO,
            final_state: CrawlState::Finished,
        };
        assert!(store.finish_run(&report).is_ok());
        assert!(store.latest_run().unwrap().is_none());
    }

    #[test]
    fn test_on_disk_database() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("pages.db");
        let store = SqliteStore::new(&path).unwrap();
        store.save("k", &record("https://example.com/", "x")).unwrap();
        assert!(path.exists());
        assert_eq!(store.describe(), path.display().to_string());
    }
}
