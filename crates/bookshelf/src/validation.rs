//! Book validation.
//!
//! Validation runs on [`BookDraft`]s before anything enters the store. It always
//! returns the complete set of problems, one message per field, so a form or an
//! import report can show everything at once.
//!
//! Required:
//! - non-blank `title` and `author`
//! - an integer `year` (negative and zero are fine)
//! - `language`, `script`, `category` from [`LANGUAGES`], [`SCRIPTS`], [`CATEGORIES`]
//!
//! Checked only when present:
//! - `isbn`: 10 or 13 digits once hyphens are removed
//! - `description`: at most [`MAX_DESCRIPTION_CHARS`] characters
//!
//! Records already in the store are never re-validated on load.

use crate::model::{now_timestamp, BookDraft, BookId, BookRecord, CATEGORIES, LANGUAGES, SCRIPTS};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

pub const MAX_DESCRIPTION_CHARS: usize = 1000;

static ISBN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{10}|[0-9]{13})$").expect("valid ISBN pattern"));

/// A book field that can fail validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    Id,
    Title,
    Author,
    Year,
    Language,
    Script,
    Category,
    Isbn,
    Description,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Title => "title",
            Field::Author => "author",
            Field::Year => "year",
            Field::Language => "language",
            Field::Script => "script",
            Field::Category => "category",
            Field::Isbn => "isbn",
            Field::Description => "description",
        }
    }
}

/// Field-level validation failures, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    pub(crate) fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{}: {}", field.as_str(), message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: ValidationErrors,
}

/// Checks a draft, collecting every failing field.
pub fn validate(draft: &BookDraft) -> ValidationReport {
    let mut errors = ValidationErrors::default();

    if is_blank(draft.title.as_deref()) {
        errors.insert(Field::Title, "Title is required");
    }

    if is_blank(draft.author.as_deref()) {
        errors.insert(Field::Author, "Author is required");
    }

    if draft.parsed_year().is_none() {
        errors.insert(Field::Year, "Year must be a valid number");
    }

    if !is_member(draft.language.as_deref(), LANGUAGES) {
        errors.insert(Field::Language, "Please select a valid language");
    }

    if !is_member(draft.script.as_deref(), SCRIPTS) {
        errors.insert(Field::Script, "Please select a valid script");
    }

    if !is_member(draft.category.as_deref(), CATEGORIES) {
        errors.insert(Field::Category, "Please select a valid category");
    }

    if let Some(isbn) = draft.isbn.as_deref().filter(|isbn| !isbn.is_empty()) {
        if !ISBN_PATTERN.is_match(&isbn.replace('-', "")) {
            errors.insert(Field::Isbn, "ISBN must be 10 or 13 digits");
        }
    }

    if let Some(description) = draft.description.as_deref() {
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            errors.insert(
                Field::Description,
                "Description should be less than 1000 characters",
            );
        }
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
    }
}

/// Re-checks a stored record against the current rules.
pub fn validate_record(record: &BookRecord) -> ValidationReport {
    validate(&BookDraft::from(record))
}

/// Validates a draft and turns it into a record.
///
/// A missing `id` is synthesized, as is a missing `dateAdded` (set to now).
pub fn accept(draft: BookDraft) -> Result<BookRecord, ValidationErrors> {
    let report = validate(&draft);
    if !report.valid {
        return Err(report.errors);
    }

    let year = draft.parsed_year();
    let date_added = draft
        .date_added
        .filter(|ts| !ts.trim().is_empty())
        .unwrap_or_else(now_timestamp);

    Ok(BookRecord {
        id: draft.id.unwrap_or_else(BookId::generate),
        title: draft.title.unwrap_or_default(),
        author: draft.author.unwrap_or_default(),
        year,
        language: draft.language.unwrap_or_default(),
        script: draft.script.unwrap_or_default(),
        category: draft.category.unwrap_or_default(),
        description: draft.description,
        isbn: draft.isbn,
        cover_image: draft.cover_image,
        file_path: draft.file_path,
        date_added: Some(date_added),
        extra: draft.extra,
    })
}

/// One element of a batch that failed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvalidEntry {
    /// Zero-based position in the submitted batch.
    pub position: usize,
    /// The element as submitted.
    pub payload: Value,
    pub errors: ValidationErrors,
}

/// Outcome of validating a batch: staged records plus the rejects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StagedBatch {
    pub valid: Vec<BookRecord>,
    pub invalid: Vec<InvalidEntry>,
}

impl StagedBatch {
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len()
    }

    pub fn is_clean(&self) -> bool {
        self.invalid.is_empty()
    }
}

/// Validates every element independently.
///
/// Valid elements are staged as records. Committing them is up to the caller.
pub fn validate_batch(items: &[Value]) -> StagedBatch {
    let mut batch = StagedBatch::default();

    for (position, item) in items.iter().enumerate() {
        match accept(BookDraft::from_value(item)) {
            Ok(record) => batch.valid.push(record),
            Err(errors) => batch.invalid.push(InvalidEntry {
                position,
                payload: item.clone(),
                errors,
            }),
        }
    }

    batch
}

fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

fn is_member(value: Option<&str>, allowed: &[&str]) -> bool {
    value.is_some_and(|v| allowed.contains(&v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gita() -> BookDraft {
        BookDraft::new(
            "Bhagavad Gita",
            "Vyasa",
            -400,
            "sanskrit",
            "devanagari",
            "Philosophy",
        )
    }

    #[test]
    fn test_valid_draft() {
        let report = validate(&gita().with_isbn("978-0-14-044918-1"));
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_empty_draft_reports_every_required_field() {
        let report = validate(&BookDraft::default());
        assert!(!report.valid);
        assert_eq!(report.errors.len(), 6);
        assert_eq!(report.errors.get(Field::Title), Some("Title is required"));
        assert_eq!(report.errors.get(Field::Author), Some("Author is required"));
        assert_eq!(
            report.errors.get(Field::Year),
            Some("Year must be a valid number")
        );
        assert_eq!(
            report.errors.get(Field::Language),
            Some("Please select a valid language")
        );
        assert_eq!(
            report.errors.get(Field::Script),
            Some("Please select a valid script")
        );
        assert_eq!(
            report.errors.get(Field::Category),
            Some("Please select a valid category")
        );
    }

    #[test]
    fn test_blank_title_is_missing() {
        let mut draft = gita();
        draft.title = Some("   ".into());
        let report = validate(&draft);
        assert_eq!(report.errors.get(Field::Title), Some("Title is required"));
        assert_eq!(report.errors.len(), 1);
    }

    #[test]
    fn test_year_accepts_zero_and_negative() {
        for year in [0, -1500, 2019] {
            let mut draft = gita();
            draft.year = Some(json!(year));
            assert!(validate(&draft).valid, "year {} should be valid", year);
        }
    }

    #[test]
    fn test_year_rejects_non_numbers() {
        for raw in [json!("soon"), json!(null), json!(12.5), json!([1])] {
            let mut draft = gita();
            draft.year = Some(raw.clone());
            assert!(
                validate(&draft).errors.contains(Field::Year),
                "{} should be rejected",
                raw
            );
        }
    }

    #[test]
    fn test_enumerations_are_case_sensitive() {
        let mut draft = gita();
        draft.language = Some("Sanskrit".into());
        draft.category = Some("philosophy".into());
        let report = validate(&draft);
        assert!(report.errors.contains(Field::Language));
        assert!(report.errors.contains(Field::Category));
        assert!(!report.errors.contains(Field::Script));
    }

    #[test]
    fn test_isbn_rules() {
        assert!(validate(&gita().with_isbn("0140449183")).valid);
        assert!(validate(&gita().with_isbn("978-0140449181")).valid);
        assert!(validate(&gita().with_isbn("")).valid);

        for bad in ["12345", "97801404491812", "014044918X", "٠١٢٣٤٥٦٧٨٩"] {
            let report = validate(&gita().with_isbn(bad));
            assert_eq!(
                report.errors.get(Field::Isbn),
                Some("ISBN must be 10 or 13 digits"),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_description_length_counts_characters() {
        let at_limit = "अ".repeat(MAX_DESCRIPTION_CHARS);
        assert!(validate(&gita().with_description(at_limit)).valid);

        let over = "a".repeat(MAX_DESCRIPTION_CHARS + 1);
        let report = validate(&gita().with_description(over));
        assert_eq!(
            report.errors.get(Field::Description),
            Some("Description should be less than 1000 characters")
        );
    }

    #[test]
    fn test_validate_does_not_mutate() {
        let draft = gita();
        let before = draft.clone();
        let _ = validate(&draft);
        assert_eq!(draft, before);
    }

    #[test]
    fn test_accept_synthesizes_identity() {
        let record = accept(gita()).unwrap();
        assert!(matches!(record.id, BookId::Text(_)));
        assert!(record.added_at().is_some());
        assert_eq!(record.year, Some(-400));
    }

    #[test]
    fn test_accept_keeps_supplied_identity() {
        let record = accept(
            gita()
                .with_id(6i64)
                .with_date_added("2025-09-06T08:30:00.000Z"),
        )
        .unwrap();
        assert_eq!(record.id, BookId::Numeric(6));
        assert_eq!(record.date_added.as_deref(), Some("2025-09-06T08:30:00.000Z"));
    }

    #[test]
    fn test_accepted_record_revalidates() {
        let record = accept(gita().with_description("Dialogue")).unwrap();
        assert!(validate_record(&record).valid);
    }

    #[test]
    fn test_batch_reports_rejects_individually() {
        let items = vec![
            json!({"title": "Rig Veda", "author": "Unknown", "year": -1500,
                   "language": "sanskrit", "script": "devanagari", "category": "Veda"}),
            json!({"author": "Unknown", "year": 400,
                   "language": "sanskrit", "script": "devanagari", "category": "Purana"}),
            json!({"title": "Upanishads", "author": "Various", "year": -800,
                   "language": "sanskrit", "script": "devanagari", "category": "Upanishad"}),
        ];

        let batch = validate_batch(&items);
        assert_eq!(batch.total(), 3);
        assert_eq!(batch.valid.len(), 2);
        assert_eq!(batch.invalid.len(), 1);
        assert!(!batch.is_clean());

        let rejected = &batch.invalid[0];
        assert_eq!(rejected.position, 1);
        assert_eq!(rejected.payload, items[1]);
        assert_eq!(rejected.errors.get(Field::Title), Some("Title is required"));
        assert_eq!(rejected.errors.len(), 1);
    }

    #[test]
    fn test_errors_serialize_as_field_map() {
        let report = validate(&BookDraft::default());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["valid"], json!(false));
        assert_eq!(value["errors"]["title"], json!("Title is required"));
    }

    #[test]
    fn test_errors_display() {
        let mut draft = gita();
        draft.title = None;
        draft.author = None;
        let report = validate(&draft);
        assert_eq!(
            report.errors.to_string(),
            "title: Title is required; author: Author is required"
        );
    }
}
