//! # Query Engine
//!
//! The query engine turns a snapshot of records plus a query into an ordered result
//! list. It is a set of pure functions:
//!
//! - [`filter`]: keeps the records that satisfy every active predicate of a
//!   [`Criteria`], in input order.
//! - [`sort`]: orders records by a [`SortKey`]. The sort is stable, so records that
//!   tie on the key keep their relative input order in both directions.
//! - [`search`]: `sort(filter(records, criteria), key)`.
//!
//! None of these functions hold state, mutate their input or depend on when they are
//! called. The same snapshot, criteria and key always produce the same list, which is
//! what keeps pagination stable across repeated queries.
//!
//! ## Criteria
//!
//! A [`Criteria`] is the whole query as one value: search text, three facets and an
//! inclusive year range. The default value constrains nothing, and is also what a
//! "reset filters" action goes back to.
//!
//! ```
//! use bookshelf::query::{Criteria, Facet, YearRange};
//!
//! let criteria = Criteria::default()
//!     .with_search("veda")
//!     .with_language(Facet::is("sanskrit"))
//!     .with_year_range(YearRange::between(Some(-2000), Some(0)));
//! assert!(!criteria.is_unconstrained());
//! ```
//!
//! ## Sort Keys
//!
//! Sort keys use the `"<field>-<direction>"` strings of the catalog's sort menu:
//!
//! ```
//! use bookshelf::query::{Direction, SortField, SortKey};
//!
//! let key: SortKey = "year-asc".parse().unwrap();
//! assert_eq!(key.field, SortField::Year);
//! assert_eq!(key.direction, Direction::Asc);
//! assert_eq!(SortKey::default().to_string(), "dateAdded-desc");
//! ```

use crate::error::CatalogError;
use crate::model::BookRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

pub mod collate;
pub mod filter;
pub mod sort;

pub use filter::{filter, matches};
pub use sort::{compare, sort};

/// One facet constraint: either everything, or exactly one value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Facet {
    #[default]
    All,
    Is(String),
}

impl Facet {
    pub fn is(value: impl Into<String>) -> Self {
        Facet::from(value.into())
    }

    /// Whether a record's field value passes this facet.
    ///
    /// Comparison is exact and case-sensitive.
    pub fn admits(&self, value: &str) -> bool {
        match self {
            Facet::All => true,
            Facet::Is(expected) => expected == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Facet::All)
    }
}

impl From<String> for Facet {
    fn from(value: String) -> Self {
        if value.is_empty() || value == "all" {
            Facet::All
        } else {
            Facet::Is(value)
        }
    }
}

impl From<&str> for Facet {
    fn from(value: &str) -> Self {
        Facet::from(value.to_string())
    }
}

impl From<Facet> for String {
    fn from(facet: Facet) -> Self {
        match facet {
            Facet::All => "all".to_string(),
            Facet::Is(value) => value,
        }
    }
}

/// Inclusive year bounds. `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct YearRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl YearRange {
    pub fn between(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// A missing year is outside every bounded range.
    pub fn contains(&self, year: Option<i64>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(year) = year else {
            return false;
        };
        self.min.map_or(true, |min| year >= min) && self.max.map_or(true, |max| year <= max)
    }
}

/// The complete search and filter configuration for one query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Criteria {
    pub search: String,
    pub language: Facet,
    pub category: Facet,
    pub script: Facet,
    pub year_range: YearRange,
}

impl Criteria {
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_language(mut self, language: impl Into<Facet>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<Facet>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_script(mut self, script: impl Into<Facet>) -> Self {
        self.script = script.into();
        self
    }

    pub fn with_year_range(mut self, year_range: YearRange) -> Self {
        self.year_range = year_range;
        self
    }

    /// True when every record passes.
    pub fn is_unconstrained(&self) -> bool {
        self.search.trim().is_empty()
            && self.language.is_all()
            && self.category.is_all()
            && self.script.is_all()
            && self.year_range.is_unbounded()
    }

    /// Builds criteria from URL-style query parameters.
    ///
    /// Recognized keys: `search`, `language`, `category`, `script`, `yearMin`,
    /// `yearMax`. Unknown keys and unparseable years are ignored.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut criteria = Criteria::default();
        for (key, value) in pairs {
            let value = value.as_ref();
            match key.as_ref() {
                "search" => criteria.search = value.to_string(),
                "language" => criteria.language = Facet::from(value),
                "category" => criteria.category = Facet::from(value),
                "script" => criteria.script = Facet::from(value),
                "yearMin" => criteria.year_range.min = value.trim().parse().ok(),
                "yearMax" => criteria.year_range.max = value.trim().parse().ok(),
                _ => {}
            }
        }
        criteria
    }
}

/// Field a result list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Title,
    Author,
    Year,
    DateAdded,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Title => "title",
            SortField::Author => "author",
            SortField::Year => "year",
            SortField::DateAdded => "dateAdded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    /// Applies the direction to an ascending comparison.
    pub fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Asc => ordering,
            Direction::Desc => ordering.reverse(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SortKey {
    pub field: SortField,
    pub direction: Direction,
}

impl SortKey {
    /// The options offered by the catalog's sort menu.
    pub const OPTIONS: [(SortKey, &'static str); 6] = [
        (SortKey::new(SortField::Title, Direction::Asc), "Title (A-Z)"),
        (SortKey::new(SortField::Title, Direction::Desc), "Title (Z-A)"),
        (SortKey::new(SortField::Author, Direction::Asc), "Author (A-Z)"),
        (SortKey::new(SortField::Author, Direction::Desc), "Author (Z-A)"),
        (SortKey::new(SortField::Year, Direction::Asc), "Year (Oldest first)"),
        (SortKey::new(SortField::Year, Direction::Desc), "Year (Newest first)"),
    ];

    pub const fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        SortKey::new(SortField::DateAdded, Direction::Desc)
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.field.as_str(), self.direction.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CatalogError::InvalidSortKey(s.to_string());
        let (field, direction) = s.trim().split_once('-').ok_or_else(invalid)?;

        let field = match field {
            "title" => SortField::Title,
            "author" => SortField::Author,
            "year" => SortField::Year,
            "dateAdded" => SortField::DateAdded,
            _ => return Err(invalid()),
        };
        let direction = match direction {
            "asc" => Direction::Asc,
            "desc" => Direction::Desc,
            _ => return Err(invalid()),
        };

        Ok(SortKey::new(field, direction))
    }
}

impl TryFrom<String> for SortKey {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

/// Filters, then sorts.
pub fn search(records: &[BookRecord], criteria: &Criteria, key: SortKey) -> Vec<BookRecord> {
    let matched = filter(records, criteria);
    sort::sort_owned(matched, key)
}

/// The `count` most recently added records, newest first.
pub fn recent(records: &[BookRecord], count: usize) -> Vec<BookRecord> {
    let mut newest = search(records, &Criteria::default(), SortKey::default());
    newest.truncate(count);
    newest
}
