use crate::error::Result;
use crate::model::BookRecord;
use crate::store::CatalogStore;
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_RECENT_WINDOW_DAYS: i64 = 30;

/// Collection overview for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub total: usize,
    pub categories: BTreeMap<String, usize>,
    pub languages: BTreeMap<String, usize>,
    /// Books whose `dateAdded` falls within the window ending at `now`.
    pub recently_added: usize,
}

/// Counts per facet plus the books added on or after `now - window_days`.
///
/// A window too large to represent covers every dated book, or none of them when
/// it is negative.
pub fn compute(records: &[BookRecord], now: DateTime<Utc>, window_days: i64) -> CatalogStats {
    let cutoff = TimeDelta::try_days(window_days).and_then(|window| now.checked_sub_signed(window));
    let mut stats = CatalogStats {
        total: records.len(),
        ..Default::default()
    };

    for book in records {
        *stats.categories.entry(book.category.clone()).or_default() += 1;
        *stats.languages.entry(book.language.clone()).or_default() += 1;
        let recent = match (book.added_at(), cutoff) {
            (Some(at), Some(cutoff)) => at >= cutoff,
            (Some(_), None) => window_days >= 0,
            (None, _) => false,
        };
        if recent {
            stats.recently_added += 1;
        }
    }

    stats
}

pub fn run<S: CatalogStore>(store: &S, now: DateTime<Utc>, window_days: i64) -> Result<CatalogStats> {
    Ok(compute(&store.snapshot(), now, window_days))
}
