//! Bulk import from a JSON document.
//!
//! The document is either one book object or an array of them. Every element is
//! validated on its own. An element is rejected when it fails validation or when its
//! `id` is already taken, by the store or by an earlier element of the same batch.
//!
//! What happens to the valid elements when some are rejected is the caller's
//! [`ImportPolicy`].

use crate::commands::{CmdMessage, CmdResult};
use crate::error::{CatalogError, Result};
use crate::model::{BookDraft, BookId};
use crate::store::CatalogStore;
use crate::validation::{accept, Field, InvalidEntry, StagedBatch, ValidationErrors};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

pub const DUPLICATE_ID_MESSAGE: &str = "A book with this id already exists";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImportPolicy {
    /// Commit the valid elements, report the rest.
    Partial,
    /// Commit nothing unless every element is valid.
    #[default]
    AllOrNothing,
}

/// Parses an import document into its elements.
pub fn parse_document(raw: &str) -> Result<Vec<Value>> {
    let document: Value = serde_json::from_str(raw)
        .map_err(|e| CatalogError::MalformedInput(format!("Invalid JSON format: {}", e)))?;

    match document {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![document]),
        _ => Err(CatalogError::MalformedInput(
            "Invalid JSON format: expected a book object or an array of books".to_string(),
        )),
    }
}

/// Validates `items` against the rules and against the ids already in `store`.
pub fn stage<S: CatalogStore>(store: &S, items: &[Value]) -> StagedBatch {
    let mut taken: HashSet<BookId> = store.snapshot().into_iter().map(|b| b.id).collect();
    let mut batch = StagedBatch::default();

    for (position, item) in items.iter().enumerate() {
        let draft = BookDraft::from_value(item);
        let duplicate = draft.id.as_ref().is_some_and(|id| taken.contains(id));

        let outcome = match accept(draft) {
            Ok(record) if !duplicate => Ok(record),
            Ok(_) => Err(ValidationErrors::default()),
            Err(errors) => Err(errors),
        };

        match outcome {
            Ok(record) => {
                taken.insert(record.id.clone());
                batch.valid.push(record);
            }
            Err(mut errors) => {
                if duplicate {
                    errors.insert(Field::Id, DUPLICATE_ID_MESSAGE);
                }
                batch.invalid.push(InvalidEntry {
                    position,
                    payload: item.clone(),
                    errors,
                });
            }
        }
    }

    batch
}

pub fn run<S: CatalogStore>(store: &mut S, raw: &str, policy: ImportPolicy) -> Result<CmdResult> {
    let items = parse_document(raw)?;
    let batch = stage(store, &items);
    let mut result = CmdResult::default();

    if !batch.is_clean() {
        tracing::warn!(
            invalid = batch.invalid.len(),
            total = batch.total(),
            "import contains invalid books"
        );
        result.add_message(CmdMessage::warning(format!(
            "{} books failed validation",
            batch.invalid.len()
        )));
    }

    let StagedBatch { valid, invalid } = batch;
    result.invalid_entries = invalid;

    if policy == ImportPolicy::AllOrNothing && !result.invalid_entries.is_empty() {
        result.add_message(CmdMessage::error(
            "Import cancelled: no books were imported",
        ));
        return Ok(result);
    }

    let imported = valid.len();
    store.insert_books(valid.clone())?;
    tracing::info!(imported, "import committed");

    result.affected_books = valid;
    result.add_message(CmdMessage::success(format!(
        "Successfully imported {} books",
        imported
    )));
    Ok(result)
}

/// Reads the import document from `path`.
pub fn run_file<S: CatalogStore>(
    store: &mut S,
    path: &Path,
    policy: ImportPolicy,
) -> Result<CmdResult> {
    let raw = fs::read_to_string(path).map_err(CatalogError::Io)?;
    run(store, &raw, policy)
}
