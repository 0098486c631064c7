//! # Bookshelf Architecture
//!
//! Bookshelf is a **UI-agnostic catalog library** for a personal collection of books:
//! free-text search, facet filtering, sorting and pagination over an in-memory list
//! that is persisted to local storage.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands                                │
//! │  - Normalizes inputs (sort strings, query parameters)       │
//! │  - Applies configuration                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Add, update, delete, import, export, browse, stats       │
//! │  - Returns structured CmdResult values                      │
//! └─────────────────────────────────────────────────────────────┘
//!                 │                             │
//!                 ▼                             ▼
//! ┌───────────────────────────────┐ ┌───────────────────────────┐
//! │  Query Engine (query/)        │ │  Storage Layer (store/)   │
//! │  Pagination (paginate.rs)     │ │  - CatalogStore trait     │
//! │  - Pure functions over a      │ │  - BookStore over a       │
//! │    snapshot of records        │ │    StorageBackend         │
//! └───────────────────────────────┘ └───────────────────────────┘
//! ```
//!
//! ## Key Principle: The Engine Is Pure
//!
//! The query engine and pagination hold no state. Every call takes the current
//! snapshot, the [`query::Criteria`] and the [`query::SortKey`] as arguments and
//! returns a fresh list. The "current search" of a UI is just a value the UI keeps
//! and passes back in.
//!
//! The store is the only component with side effects. It persists before it updates
//! its snapshot, and it replaces the snapshot wholesale when another writer changes
//! the stored catalog.
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! Code in this crate:
//! - Takes regular Rust function arguments
//! - Returns regular Rust types (`Result<CmdResult>`)
//! - **Never** writes to stdout/stderr (diagnostics go through `tracing`)
//! - **Never** installs a tracing subscriber
//!
//! ## Testing Strategy
//!
//! 1. **Engine** (`query/`, `paginate.rs`, `validation.rs`): unit tests plus the
//!    property suite in `tests/properties.rs`.
//! 2. **Commands** (`commands/*.rs`): thorough unit tests over `InMemoryStore`.
//! 3. **API** (`api.rs`): dispatch and input normalization.
//! 4. **Storage**: backend unit tests, plus filesystem and multi-handle tests in
//!    `tests/`.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each operation
//! - [`query`]: Filtering, sorting and search
//! - [`paginate`]: Page slicing
//! - [`validation`]: Field rules and batch validation
//! - [`store`]: Storage abstraction and implementations
//! - [`model`]: Core data types (`BookRecord`, `BookDraft`, `BookId`)
//! - [`seed`]: The sample catalog
//! - [`config`]: Configuration management
//! - [`init`]: Context setup for embedding applications
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod error;
pub mod init;
pub mod model;
pub mod paginate;
pub mod query;
pub mod seed;
pub mod store;
pub mod validation;

pub use error::{CatalogError, Result};
