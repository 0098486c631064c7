use super::backend::{ChangeListener, StorageBackend, StorageEvent};
use crate::error::{CatalogError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Filesystem storage: one `<key>.json` file per key under `root`.
///
/// Other processes writing the same files are picked up by
/// [`FsBackend::poll_external_changes`], which compares each tracked key with the
/// value this handle last read or wrote.
pub struct FsBackend {
    root: PathBuf,
    known: RefCell<HashMap<String, Option<String>>>,
    listeners: RefCell<Vec<ChangeListener>>,
}

impl FsBackend {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            known: RefCell::new(HashMap::new()),
            listeners: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    /// Re-reads every key this handle has touched and notifies listeners of each
    /// one whose value changed on disk. Returns the number of changed keys.
    pub fn poll_external_changes(&self) -> Result<usize> {
        let keys: Vec<String> = self.known.borrow().keys().cloned().collect();
        let mut events = Vec::new();

        for key in keys {
            let current = self.read_from_disk(&key)?;
            let mut known = self.known.borrow_mut();
            if known.get(&key) != Some(&current) {
                known.insert(key.clone(), current.clone());
                events.push(StorageEvent {
                    key,
                    new_value: current,
                });
            }
        }

        if !events.is_empty() {
            let listeners: Vec<ChangeListener> = self.listeners.borrow().clone();
            for event in &events {
                tracing::debug!(key = %event.key, "external change on disk");
                for listener in &listeners {
                    listener(event);
                }
            }
        }
        Ok(events.len())
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(CatalogError::Io)?;
        }
        Ok(())
    }

    fn read_from_disk(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(CatalogError::Io)?;
        Ok(Some(content))
    }
}

impl StorageBackend for FsBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let value = self.read_from_disk(key)?;
        self.known
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;

        let target_path = self.path_for(key);

        // Atomic Write
        let tmp_path = self
            .root
            .join(format!(".{}-{}.tmp", sanitize_key(key), Uuid::new_v4()));
        fs::write(&tmp_path, value).map_err(CatalogError::Io)?;
        fs::rename(&tmp_path, target_path).map_err(CatalogError::Io)?;

        self.known
            .borrow_mut()
            .insert(key.to_string(), Some(value.to_string()));
        Ok(())
    }

    fn on_external_change(&self, listener: ChangeListener) {
        self.listeners.borrow_mut().push(listener);
    }
}

fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
