//! # Configuration
//!
//! Catalog configuration is managed by [`clapfig`], which handles layered loading
//! from TOML files, environment variables, and programmatic overrides.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `BOOKSHELF__PAGE_SIZE`, `BOOKSHELF__DEFAULT_SORT`, etc.
//! 2. **Data Directory Config**: `<data dir>/bookshelf.toml`.
//! 3. **Global Config**: OS-appropriate config directory (via `directories` crate).
//! 4. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `page_size` | `12` | Records per page when browsing |
//! | `storage_key` | `book-library-data` | Storage key holding the catalog |
//! | `default_sort` | `dateAdded-desc` | Sort option used when none is given |
//! | `seed_sample_books` | `true` | Start an empty installation from the sample catalog |
//! | `recent_window_days` | `30` | Window for the "recently added" statistic |
//! | `featured_count` | `6` | Number of newest books in the featured selection |

use crate::query::SortKey;
use confique::Config;
use serde::{Deserialize, Serialize};

pub const DEFAULT_STORAGE_KEY: &str = "book-library-data";
pub const DEFAULT_PAGE_SIZE: usize = 12;

/// Configuration for the catalog, stored in `bookshelf.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// Records per page when browsing.
    #[config(default = 12)]
    pub page_size: usize,

    /// Storage key (file stem in the data directory) holding the catalog.
    #[config(default = "book-library-data")]
    pub storage_key: String,

    /// Sort option used when a browse request does not name one, e.g. "title-asc".
    #[config(default = "dateAdded-desc")]
    pub default_sort: String,

    /// Whether a catalog with nothing stored starts from the sample books.
    #[config(default = true)]
    pub seed_sample_books: bool,

    /// Days counted as "recently added" in statistics.
    #[config(default = 30)]
    pub recent_window_days: i64,

    /// How many of the newest books the featured selection shows.
    #[config(default = 6)]
    pub featured_count: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_sort: SortKey::default().to_string(),
            seed_sample_books: true,
            recent_window_days: 30,
            featured_count: 6,
        }
    }
}

impl CatalogConfig {
    /// The configured default sort, or `dateAdded-desc` if the setting is not a
    /// known sort option.
    pub fn default_sort(&self) -> SortKey {
        self.default_sort.parse().unwrap_or_else(|_| {
            tracing::warn!(value = %self.default_sort, "unknown default_sort, using dateAdded-desc");
            SortKey::default()
        })
    }

    /// Page size, never zero.
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
