//! The sample catalog a fresh installation starts with.

use crate::model::BookRecord;

const SAMPLE_BOOKS_JSON: &str = include_str!("../data/sample_books.json");

/// The six sample books, in their stored order.
pub fn sample_books() -> Vec<BookRecord> {
    serde_json::from_str(SAMPLE_BOOKS_JSON).unwrap_or_else(|e| {
        tracing::error!(error = %e, "bundled sample catalog is unreadable");
        Vec::new()
    })
}
