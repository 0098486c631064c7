use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::model::{BookDraft, BookId};
use crate::store::CatalogStore;
use crate::validation::accept;

/// Applies `patch` to the book with `id`.
///
/// Fields absent from the patch keep their current value. The merged book is
/// validated as a whole; `id` and `dateAdded` never change.
pub fn run<S: CatalogStore>(store: &mut S, id: &BookId, patch: BookDraft) -> Result<CmdResult> {
    let existing = store.get_book(id)?;
    let merged = patch.apply_to(&existing);
    let mut book = accept(merged).map_err(CatalogError::Validation)?;
    // `accept` fills a missing date; a stored book keeps whatever it had.
    book.id = existing.id;
    book.date_added = existing.date_added;

    store.replace_book(book.clone())?;
    tracing::info!(id = %book.id, "book updated");

    let mut result = CmdResult::default().with_affected_books(vec![book]);
    result.add_message(CmdMessage::success("Book updated successfully"));
    Ok(result)
}
