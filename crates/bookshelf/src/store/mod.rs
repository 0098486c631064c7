//! # Storage Layer
//!
//! This module owns the catalog's records. The [`CatalogStore`] trait is the only way
//! the rest of the crate reads or mutates them; the query engine and pagination work
//! on the [`CatalogStore::snapshot`] it hands out.
//!
//! ## Layering
//!
//! - [`backend::StorageBackend`]: keyed string storage with change notification. It
//!   knows nothing about books.
//! - [`book_store::BookStore`]: keeps the whole catalog as one JSON array under a
//!   single key, plus an in-memory snapshot of it.
//!
//! ## Write Ordering
//!
//! Every mutation builds the next list, writes it to the backend, and only then swaps
//! it into the snapshot. A failed write leaves the snapshot exactly as it was. There
//! are no automatic retries.
//!
//! ## Loading
//!
//! - Key absent: the store starts from the seed list. The seed is *not* written until
//!   the first mutation, so an untouched catalog keeps picking up seed changes.
//! - Key present but unreadable JSON: a warning is logged and the seed is used.
//! - Backend I/O failure: returned as an error.
//!
//! ## External Changes
//!
//! Another writer (a second handle on the same [`mem_backend::MemBackend`], or
//! another process rewriting the file behind a [`fs_backend::FsBackend`]) can change
//! the stored list. When the backend reports it, the snapshot is replaced wholesale
//! with the new list. Nothing is merged. An update that does not parse is logged and
//! ignored, and removal of the key keeps the current snapshot.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: `BookStore` over the filesystem, one `<key>.json` per key.
//! - [`memory::InMemoryStore`]: `BookStore` over memory, for tests and embedding.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── bookshelf.toml          # Configuration
//! └── book-library-data.json  # The catalog: a JSON array of book records
//! ```

use crate::error::Result;
use crate::model::{BookId, BookRecord};

pub mod backend;
pub mod book_store;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

pub use fs::FileStore;
#[cfg(any(test, feature = "test_utils"))]
pub use memory::fixtures;
pub use memory::InMemoryStore;

/// Abstract interface for record storage.
///
/// Mutations are all-or-nothing: on error the visible records are unchanged.
pub trait CatalogStore {
    /// Current records in insertion order.
    fn snapshot(&self) -> Vec<BookRecord>;

    fn get_book(&self, id: &BookId) -> Result<BookRecord>;

    /// Appends `books`. Fails if any id is already present or repeated.
    fn insert_books(&mut self, books: Vec<BookRecord>) -> Result<()>;

    /// Replaces the record with the same id in place.
    fn replace_book(&mut self, book: BookRecord) -> Result<()>;

    fn remove_book(&mut self, id: &BookId) -> Result<BookRecord>;

    /// Discards the snapshot and loads again from the backend.
    fn reload(&mut self) -> Result<()>;
}
