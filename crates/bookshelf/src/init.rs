//! # Initialization
//!
//! [`initialize`] wires the pieces together: it resolves the data directory, loads
//! the configuration, opens the file-backed store and wraps it in the API.
//!
//! ## Data Directory Resolution
//!
//! 1. If `data_override` is provided, it is used as the data directory.
//! 2. Otherwise `BOOKSHELF_DATA` is checked (primarily for testing).
//! 3. Otherwise the OS-appropriate data directory (via the `directories` crate).
//!
//! ## Configuration Search
//!
//! `bookshelf.toml` is looked up in the OS config directory and then in the data
//! directory, merged in that order, so a data directory can override user-wide
//! settings. A missing or unreadable config means the compiled defaults.
//!
//! ## Seeding
//!
//! With `seed_sample_books` on, a data directory without a stored catalog starts
//! from the sample books. They are only written once something changes.

use crate::api::CatalogApi;
use crate::config::CatalogConfig;
use crate::error::{CatalogError, Result};
use crate::seed::sample_books;
use crate::store::fs::FileStore;
use clapfig::{Clapfig, SearchMode, SearchPath};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

pub struct CatalogContext {
    pub api: CatalogApi<FileStore>,
    pub config: CatalogConfig,
    pub data_dir: PathBuf,
}

/// Resolves where the catalog lives, per the order documented above.
pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os("BOOKSHELF_DATA") {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "bookshelf", "bookshelf")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| CatalogError::Store("Could not determine data directory".to_string()))
}

/// Loads `bookshelf.toml` from the user config dir and `data_dir`, merged.
pub fn load_config(data_dir: &Path) -> CatalogConfig {
    let mut search_paths = Vec::new();
    if let Some(dirs) = ProjectDirs::from("com", "bookshelf", "bookshelf") {
        search_paths.push(SearchPath::Path(dirs.config_dir().to_path_buf()));
    }
    search_paths.push(SearchPath::Path(data_dir.to_path_buf()));

    Clapfig::builder()
        .app_name("bookshelf")
        .file_name("bookshelf.toml")
        .search_paths(search_paths)
        .search_mode(SearchMode::Merge)
        .load()
        .unwrap_or_default()
}

/// Initialize the catalog context.
///
/// # Arguments
///
/// * `data_override` - Optional explicit data directory. When absent the
///   directory is resolved from `BOOKSHELF_DATA` or the OS data directory.
pub fn initialize(data_override: Option<PathBuf>) -> Result<CatalogContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = load_config(&data_dir);

    let seed = if config.seed_sample_books {
        sample_books()
    } else {
        Vec::new()
    };
    let store = FileStore::open_dir(data_dir.clone(), &config.storage_key, seed)?;
    tracing::debug!(data_dir = %data_dir.display(), books = store.len(), "catalog initialized");

    let api = CatalogApi::new(store, config.clone());
    Ok(CatalogContext {
        api,
        config,
        data_dir,
    })
}
