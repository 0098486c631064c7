//! Criteria matching.
//!
//! All active predicates must hold (AND across facets). Each predicate only reads
//! the record, so evaluation order never changes the outcome. A missing field never
//! errors: it simply fails the predicate that looks at it.

use super::Criteria;
use crate::model::BookRecord;

/// Returns the records matching `criteria`, in input order.
pub fn filter(records: &[BookRecord], criteria: &Criteria) -> Vec<BookRecord> {
    let needle = normalize_search(&criteria.search);

    let matched: Vec<BookRecord> = records
        .iter()
        .filter(|record| matches_normalized(record, criteria, &needle))
        .cloned()
        .collect();

    tracing::debug!(
        total = records.len(),
        matched = matched.len(),
        "filtered catalog"
    );
    matched
}

/// Whether one record satisfies `criteria`.
pub fn matches(record: &BookRecord, criteria: &Criteria) -> bool {
    matches_normalized(record, criteria, &normalize_search(&criteria.search))
}

fn normalize_search(search: &str) -> String {
    search.trim().to_lowercase()
}

fn matches_normalized(record: &BookRecord, criteria: &Criteria, needle: &str) -> bool {
    matches_search(record, needle)
        && criteria.language.admits(&record.language)
        && criteria.category.admits(&record.category)
        && criteria.script.admits(&record.script)
        && criteria.year_range.contains(record.year)
}

/// `needle` must already be trimmed and lower-cased. Empty matches everything.
fn matches_search(record: &BookRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }

    let text_fields = [
        Some(record.title.as_str()),
        Some(record.author.as_str()),
        record.description.as_deref(),
        Some(record.category.as_str()),
        Some(record.language.as_str()),
        Some(record.script.as_str()),
    ];

    text_fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(needle))
        || record
            .year
            .is_some_and(|year| year.to_string().contains(needle))
}
