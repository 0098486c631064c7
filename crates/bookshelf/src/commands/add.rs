use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::model::{now_timestamp, BookDraft, BookId};
use crate::store::CatalogStore;
use crate::validation::accept;

/// Validates `draft` and appends it as a new book.
///
/// The new book always gets a fresh id and the current time as `dateAdded`, whatever
/// the draft carried.
pub fn run<S: CatalogStore>(store: &mut S, draft: BookDraft) -> Result<CmdResult> {
    let mut draft = draft;
    draft.id = Some(BookId::generate());
    draft.date_added = Some(now_timestamp());

    let book = accept(draft).map_err(CatalogError::Validation)?;
    store.insert_books(vec![book.clone()])?;
    tracing::info!(id = %book.id, title = %book.title, "book added");

    let mut result = CmdResult::default().with_affected_books(vec![book]);
    result.add_message(CmdMessage::success("Book added successfully"));
    Ok(result)
}
