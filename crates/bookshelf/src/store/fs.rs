use super::book_store::BookStore;
use super::fs_backend::FsBackend;
use super::CatalogStore;
use crate::error::Result;
use crate::model::BookRecord;
use std::path::PathBuf;

pub type FileStore = BookStore<FsBackend>;

impl FileStore {
    /// Opens the catalog stored under `key` in `root`.
    pub fn open_dir(root: PathBuf, key: &str, seed: Vec<BookRecord>) -> Result<Self> {
        BookStore::open(FsBackend::new(root), key, seed)
    }

    /// Picks up writes made to the data directory by other processes.
    ///
    /// Returns true when the visible records changed. A change on disk that
    /// does not parse is ignored and reports false.
    pub fn sync_external(&self) -> Result<bool> {
        let before = self.snapshot();
        let changed = self.backend.poll_external_changes()?;
        let replaced = changed > 0 && self.snapshot() != before;
        tracing::debug!(changed, replaced, "polled data directory");
        Ok(replaced)
    }
}
