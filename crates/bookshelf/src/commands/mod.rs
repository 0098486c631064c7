//! # Command Layer
//!
//! This module contains the **business logic** of the catalog. Each command lives in
//! its own submodule and is a plain function over a [`CatalogStore`](crate::store::CatalogStore).
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Validate input before anything reaches the store
//! - Drive the query engine and pagination over the store's snapshot
//! - Return structured `CmdResult` with affected books and messages
//! - Are completely UI-agnostic
//!
//! ## What Commands Do NOT Do
//!
//! Commands explicitly avoid:
//! - **Rendering**: No formatting of pages, cards or tables
//! - **Argument parsing**: Callers hand in typed `BookDraft`, `Criteria`, `SortKey`
//! - **User interaction**: No prompts or confirmations (return data, UI decides)
//!
//! ## Structured Returns
//!
//! Commands return [`CmdResult`], not strings. This struct carries:
//! - `affected_books`: Books that were created, changed or removed
//! - `listed_books`: Books to display (for `get`)
//! - `page`: One page of a browse query
//! - `invalid_entries`: Rejected import elements with their field errors
//! - `messages`: Structured messages with levels (info, success, warning, error)
//!
//! Export and statistics return their own documents ([`export::ExportDocument`],
//! [`stats::CatalogStats`]) since they are data, not a list of books.
//!
//! ## Testing Strategy
//!
//! Command tests use `InMemoryStore` and cover every branch: validation failures,
//! unknown ids, write failures and the import policies.
//!
//! ## Command Modules
//!
//! - [`add`]: Validate and append one book
//! - [`update`]: Patch an existing book
//! - [`delete`]: Remove a book
//! - [`get`]: Fetch one book by id
//! - [`browse`]: Search, sort and paginate
//! - [`import`]: Bulk import from JSON
//! - [`export`]: JSON / CSV export
//! - [`stats`]: Collection statistics

use crate::model::BookRecord;
use crate::paginate::Page;
use crate::validation::InvalidEntry;
use serde::Serialize;

pub mod add;
pub mod browse;
pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod stats;
pub mod update;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CmdResult {
    pub affected_books: Vec<BookRecord>,
    pub listed_books: Vec<BookRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<Page<BookRecord>>,
    pub invalid_entries: Vec<InvalidEntry>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_books(mut self, books: Vec<BookRecord>) -> Self {
        self.affected_books = books;
        self
    }

    pub fn with_listed_books(mut self, books: Vec<BookRecord>) -> Self {
        self.listed_books = books;
        self
    }

    pub fn with_page(mut self, page: Page<BookRecord>) -> Self {
        self.page = Some(page);
        self
    }

    /// True when any message is an error.
    pub fn has_errors(&self) -> bool {
        self.messages
            .iter()
            .any(|m| m.level == MessageLevel::Error)
    }
}
