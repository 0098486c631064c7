//! Result ordering.
//!
//! Keys per field:
//!
//! - `title`, `author`: [`CollationKey`] of the field.
//! - `year`: the year; a missing year is lower than any present one.
//! - `dateAdded`: the parsed timestamp; a missing or unparseable value is lower than
//!   any parsed one.
//!
//! Descending order is the ascending comparison reversed. The underlying sort is
//! stable, so ties keep input order in both directions.

use super::collate::CollationKey;
use super::{SortField, SortKey};
use crate::model::BookRecord;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Text(CollationKey),
    Year(Option<i64>),
    Added(Option<DateTime<Utc>>),
}

impl SortValue {
    fn of(record: &BookRecord, field: SortField) -> Self {
        match field {
            SortField::Title => SortValue::Text(CollationKey::new(&record.title)),
            SortField::Author => SortValue::Text(CollationKey::new(&record.author)),
            SortField::Year => SortValue::Year(record.year),
            SortField::DateAdded => SortValue::Added(record.added_at()),
        }
    }
}

/// Returns a sorted copy of `records`.
pub fn sort(records: &[BookRecord], key: SortKey) -> Vec<BookRecord> {
    sort_owned(records.to_vec(), key)
}

/// Compares two records under `key`, direction included.
pub fn compare(a: &BookRecord, b: &BookRecord, key: SortKey) -> Ordering {
    key.direction
        .apply(SortValue::of(a, key.field).cmp(&SortValue::of(b, key.field)))
}

pub(crate) fn sort_owned(records: Vec<BookRecord>, key: SortKey) -> Vec<BookRecord> {
    let mut keyed: Vec<(SortValue, BookRecord)> = records
        .into_iter()
        .map(|record| (SortValue::of(&record, key.field), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| key.direction.apply(a.cmp(b)));

    tracing::debug!(sort = %key, count = keyed.len(), "sorted catalog");
    keyed.into_iter().map(|(_, record)| record).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::BookId;
    use crate::query::Direction;
    use serde_json::Map;

    /// Minimal record for query tests.
    pub(crate) fn book(id: i64, title: &str, year: i64) -> BookRecord {
        BookRecord {
            id: BookId::Numeric(id),
            title: title.to_string(),
            author: "Unknown".to_string(),
            year: Some(year),
            language: "sanskrit".to_string(),
            script: "devanagari".to_string(),
            category: "Literature".to_string(),
            description: None,
            isbn: None,
            cover_image: None,
            file_path: None,
            date_added: Some("2025-09-01T10:30:00.000Z".to_string()),
            extra: Map::new(),
        }
    }

    fn titles(records: &[BookRecord]) -> Vec<&str> {
        records.iter().map(|r| r.title.as_str()).collect()
    }

    fn key(field: SortField, direction: Direction) -> SortKey {
        SortKey::new(field, direction)
    }

    #[test]
    fn test_title_sort_is_case_insensitive() {
        let records = vec![
            book(1, "upanishads", 0),
            book(2, "Bhagavad Gita", 0),
            book(3, "atharva Veda", 0),
        ];
        let asc = sort(&records, key(SortField::Title, Direction::Asc));
        assert_eq!(
            titles(&asc),
            vec!["atharva Veda", "Bhagavad Gita", "upanishads"]
        );

        let desc = sort(&records, key(SortField::Title, Direction::Desc));
        assert_eq!(
            titles(&desc),
            vec!["upanishads", "Bhagavad Gita", "atharva Veda"]
        );
    }

    #[test]
    fn test_author_sort() {
        let mut a = book(1, "One", 0);
        a.author = "Vyasa".into();
        let mut b = book(2, "Two", 0);
        b.author = "Patanjali".into();
        let mut c = book(3, "Three", 0);
        c.author = "Badarayana".into();

        let sorted = sort(&[a, b, c], key(SortField::Author, Direction::Asc));
        assert_eq!(titles(&sorted), vec!["Three", "Two", "One"]);
    }

    #[test]
    fn test_year_sort_handles_negative_years() {
        let records = vec![
            book(1, "Gita", -400),
            book(2, "Rig", -1500),
            book(3, "Purana", 400),
        ];
        let asc = sort(&records, key(SortField::Year, Direction::Asc));
        assert_eq!(titles(&asc), vec!["Rig", "Gita", "Purana"]);
    }

    #[test]
    fn test_missing_year_sorts_lowest() {
        let mut undated = book(1, "Undated", 0);
        undated.year = None;
        let records = vec![book(2, "Old", -800), undated];

        let asc = sort(&records, key(SortField::Year, Direction::Asc));
        assert_eq!(titles(&asc), vec!["Undated", "Old"]);

        let desc = sort(&records, key(SortField::Year, Direction::Desc));
        assert_eq!(titles(&desc), vec!["Old", "Undated"]);
    }

    #[test]
    fn test_date_added_sort_treats_garbage_as_oldest() {
        let mut first = book(1, "First", 0);
        first.date_added = Some("2025-09-01T10:30:00.000Z".into());
        let mut second = book(2, "Second", 0);
        second.date_added = Some("2025-09-02T10:30:00.000Z".into());
        let mut broken = book(3, "Broken", 0);
        broken.date_added = Some("yesterday".into());

        let desc = sort(
            &[first, broken, second],
            key(SortField::DateAdded, Direction::Desc),
        );
        assert_eq!(titles(&desc), vec!["Second", "First", "Broken"]);
    }

    #[test]
    fn test_stable_in_both_directions() {
        let records = vec![
            book(1, "A", 5),
            book(2, "B", 1),
            book(3, "C", 5),
            book(4, "D", 5),
        ];

        let asc = sort(&records, key(SortField::Year, Direction::Asc));
        assert_eq!(titles(&asc), vec!["B", "A", "C", "D"]);

        let desc = sort(&records, key(SortField::Year, Direction::Desc));
        assert_eq!(titles(&desc), vec!["A", "C", "D", "B"]);
    }

    #[test]
    fn test_compare_respects_direction() {
        let early = book(1, "Early", -100);
        let late = book(2, "Late", 100);
        assert_eq!(
            compare(&early, &late, key(SortField::Year, Direction::Asc)),
            Ordering::Less
        );
        assert_eq!(
            compare(&early, &late, key(SortField::Year, Direction::Desc)),
            Ordering::Greater
        );
    }
}
