//! Filesystem content store
//!
//! Writes three files per page into the output directory:
//! `<key>.html` (raw markup), `<key>.txt` (plain text) and `<key>.json`
//! (metadata).

use crate::storage::traits::{ContentStore, PageRecord, StoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Content store that writes one file per artifact
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Opens a file store rooted at `root`, creating the directory if needed
    pub fn new(root: &Path) -> StoreResult<Self> {
        fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    fn path_for(&self, key: &str, extension: &str) -> PathBuf {
        self.root.join(format!("{}.{}", key, extension))
    }
}

impl ContentStore for FileStore {
    fn save(&self, key: &str, record: &PageRecord) -> StoreResult<()> {
        fs::write(self.path_for(key, "html"), &record.raw_markup)?;
        fs::write(self.path_for(key, "txt"), record.plain_text.as_bytes())?;

        let metadata = serde_json::to_string_pretty(&record.metadata())?;
        fs::write(self.path_for(key, "json"), metadata)?;

        tracing::debug!("Wrote {} to {}", key, self.root.display());
        Ok(())
    }

    fn describe(&self) -> String {
        fs::canonicalize(&self.root)
            .unwrap_or_else(|_| self.root.clone())
            .display()
            .to_string()
    }
}
