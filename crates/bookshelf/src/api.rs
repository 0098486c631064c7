//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It serves as the single
//! entry point for all catalog operations, regardless of the UI being used.
//!
//! ## Role and Responsibilities
//!
//! The API facade:
//! - **Dispatches** to the appropriate command function
//! - **Normalizes inputs** (sort option strings, URL-style query parameters)
//! - **Applies configuration** (page size, default sort, statistics window)
//! - **Returns structured types** (`Result<CmdResult>` and friends)
//!
//! ## What the API Does NOT Do
//!
//! The API explicitly avoids:
//! - **Business logic**: That belongs in `commands/*.rs`
//! - **Rendering**: Returns data structures, not strings
//!
//! ## Query Parameters
//!
//! [`CatalogApi::browse_query`] accepts the library page's URL parameters:
//!
//! - `search`, `category`, `language`, `script`, `yearMin`, `yearMax`: see
//!   [`Criteria::from_query_pairs`]
//! - `sort`: a sort option such as `title-asc`; unknown values are an error
//! - `page`: 1-based page number; unparseable values mean page 1
//!
//! ## Generic Over CatalogStore
//!
//! `CatalogApi<S: CatalogStore>` is generic over the storage backend:
//! - Production: `CatalogApi<FileStore>`
//! - Testing: `CatalogApi<InMemoryStore>`

use crate::commands::browse::BrowseRequest;
use crate::commands::export::{ExportDocument, ExportFormat};
use crate::commands::import::ImportPolicy;
use crate::commands::stats::CatalogStats;
use crate::commands::{self, CmdResult};
use crate::config::CatalogConfig;
use crate::error::Result;
use crate::model::{BookDraft, BookId};
use crate::query::{Criteria, SortKey};
use crate::store::CatalogStore;
use crate::validation::StagedBatch;
use chrono::{DateTime, Utc};
use std::path::Path;

/// The main API facade for catalog operations.
pub struct CatalogApi<S: CatalogStore> {
    store: S,
    config: CatalogConfig,
}

impl<S: CatalogStore> CatalogApi<S> {
    pub fn new(store: S, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn add_book(&mut self, draft: BookDraft) -> Result<CmdResult> {
        commands::add::run(&mut self.store, draft)
    }

    pub fn update_book(&mut self, id: &BookId, patch: BookDraft) -> Result<CmdResult> {
        commands::update::run(&mut self.store, id, patch)
    }

    pub fn delete_book(&mut self, id: &BookId) -> Result<CmdResult> {
        commands::delete::run(&mut self.store, id)
    }

    pub fn get_book(&self, id: &BookId) -> Result<CmdResult> {
        commands::get::run(&self.store, id)
    }

    /// A request carrying the configured default sort.
    pub fn browse_request(&self, criteria: Criteria) -> BrowseRequest {
        BrowseRequest::new(criteria).with_sort(self.config.default_sort())
    }

    pub fn browse(&self, request: &BrowseRequest) -> Result<CmdResult> {
        commands::browse::run(&self.store, request, self.config.page_size())
    }

    pub fn browse_query<I, K, V>(&self, pairs: I) -> Result<CmdResult>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
            .collect();

        let mut request = self.browse_request(Criteria::from_query_pairs(pairs.iter().cloned()));
        for (key, value) in &pairs {
            match key.as_str() {
                "sort" => request.sort = value.parse::<SortKey>()?,
                "page" => request.page = value.trim().parse().unwrap_or(1),
                _ => {}
            }
        }
        self.browse(&request)
    }

    /// The newest books for the home page.
    pub fn featured(&self) -> Result<CmdResult> {
        commands::browse::featured(&self.store, self.config.featured_count)
    }

    pub fn import_json(&mut self, raw: &str, policy: ImportPolicy) -> Result<CmdResult> {
        commands::import::run(&mut self.store, raw, policy)
    }

    pub fn import_file(&mut self, path: &Path, policy: ImportPolicy) -> Result<CmdResult> {
        commands::import::run_file(&mut self.store, path, policy)
    }

    /// Validates an import document without committing anything.
    pub fn preview_import(&self, raw: &str) -> Result<StagedBatch> {
        let items = commands::import::parse_document(raw)?;
        Ok(commands::import::stage(&self.store, &items))
    }

    /// Exports the full result of `request`, every page of it, in `format`.
    pub fn export(&self, request: &BrowseRequest, format: ExportFormat) -> Result<ExportDocument> {
        commands::export::run(&self.store, &request.criteria, request.sort, format)
    }

    pub fn export_to_file(&self, request: &BrowseRequest, path: &Path) -> Result<CmdResult> {
        commands::export::run_to_file(&self.store, &request.criteria, request.sort, path)
    }

    pub fn stats_at(&self, now: DateTime<Utc>) -> Result<CatalogStats> {
        commands::stats::run(&self.store, now, self.config.recent_window_days)
    }

    pub fn stats(&self) -> Result<CatalogStats> {
        self.stats_at(Utc::now())
    }

    pub fn reload(&mut self) -> Result<()> {
        self.store.reload()
    }
}
