//! # Domain Model: Book Records and Drafts
//!
//! This module defines the two shapes a book takes in bookshelf:
//!
//! - [`BookRecord`]: an entry the store owns. Every record has an [`BookId`] and
//!   (almost always) a `dateAdded` timestamp. Records are what the query engine
//!   filters, sorts and pages over.
//! - [`BookDraft`]: loosely typed input. Forms, update patches and import payloads
//!   all arrive as drafts, where any field may be missing or carry the wrong type.
//!   A draft only becomes a record after passing [`crate::validation::validate`].
//!
//! ## Leniency on the Way In
//!
//! Stored data is not re-validated when it is loaded. A record written by an older
//! version may lack a year, carry a language that is no longer in [`LANGUAGES`], or
//! hold extra keys nobody knows about. Loading must not fail on any of that:
//!
//! - Missing strings load as empty strings, which never match a search.
//! - `year` is read from integers, integral floats or numeric strings. Anything else
//!   loads as `None`.
//! - Unknown keys are kept in `extra` and written back untouched.
//!
//! ## Wire Names
//!
//! Field names follow the persisted JSON format (`coverImage`, `filePath`,
//! `dateAdded`), so existing catalogs and exports load without translation.
//!
//! ## Timestamps
//!
//! `dateAdded` is kept as the raw string the record arrived with. Imports may carry
//! externally supplied timestamps in whatever shape, and the sort order treats an
//! unparseable one as the oldest possible value rather than rejecting the record.
//! Timestamps generated here use RFC 3339 with milliseconds and a `Z` suffix.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Languages a book may be catalogued under.
pub const LANGUAGES: &[&str] = &["sanskrit", "english", "hindi", "kannada", "marathi"];

/// Scripts a book may be written in.
pub const SCRIPTS: &[&str] = &["devanagari", "roman", "brahmi"];

/// Catalog categories.
pub const CATEGORIES: &[&str] = &[
    "Philosophy",
    "Bhashya",
    "Upanishad",
    "Tantra",
    "Purana",
    "Veda",
    "Yoga",
];

/// Identifier of a book record.
///
/// Older catalogs use integer ids, ids synthesized here are UUID strings. The two
/// forms never compare equal to each other, even when they print the same.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Numeric(i64),
    Text(String),
}

impl BookId {
    pub fn generate() -> Self {
        BookId::Text(Uuid::new_v4().to_string())
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(BookId::Numeric),
            Value::String(s) if !s.trim().is_empty() => Some(BookId::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Numeric(n) => write!(f, "{}", n),
            BookId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for BookId {
    fn from(n: i64) -> Self {
        BookId::Numeric(n)
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        BookId::Text(s.to_string())
    }
}

impl From<String> for BookId {
    fn from(s: String) -> Self {
        BookId::Text(s)
    }
}

/// A catalogued book, as owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecord {
    pub id: BookId,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub author: String,
    #[serde(
        default,
        deserialize_with = "lenient_year",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub language: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub script: String,
    #[serde(default, deserialize_with = "string_or_empty")]
    pub category: String,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_path: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_added: Option<String>,
    /// Keys this version does not model, kept verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookRecord {
    /// Parsed `dateAdded`, or `None` when absent or unparseable.
    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        self.date_added.as_deref().and_then(parse_timestamp)
    }
}

/// Unvalidated book input: a form submission, an update patch or one element of an
/// import payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDraft {
    #[serde(
        default,
        deserialize_with = "lenient_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<BookId>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub author: Option<String>,
    /// Kept raw: validation decides whether it is a number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub language: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub script: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub isbn: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub cover_image: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_path: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_added: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookDraft {
    /// A draft carrying every required field.
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i64,
        language: impl Into<String>,
        script: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            author: Some(author.into()),
            year: Some(Value::from(year)),
            language: Some(language.into()),
            script: Some(script.into()),
            category: Some(category.into()),
            ..Default::default()
        }
    }

    /// Reads a draft out of an arbitrary JSON value.
    ///
    /// Non-object values yield an empty draft, which then fails validation on
    /// every required field.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(_) => serde_json::from_value(value.clone()).unwrap_or_else(|err| {
                tracing::warn!("Unreadable book object, treating as empty: {}", err);
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn with_id(mut self, id: impl Into<BookId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_isbn(mut self, isbn: impl Into<String>) -> Self {
        self.isbn = Some(isbn.into());
        self
    }

    pub fn with_cover_image(mut self, reference: impl Into<String>) -> Self {
        self.cover_image = Some(reference.into());
        self
    }

    pub fn with_file_path(mut self, reference: impl Into<String>) -> Self {
        self.file_path = Some(reference.into());
        self
    }

    pub fn with_date_added(mut self, timestamp: impl Into<String>) -> Self {
        self.date_added = Some(timestamp.into());
        self
    }

    /// The year as an integer, if the raw value holds one.
    pub fn parsed_year(&self) -> Option<i64> {
        self.year.as_ref().and_then(year_from_value)
    }

    /// Overlays this draft, used as a patch, onto an existing record.
    ///
    /// `id` and `dateAdded` always come from `base`.
    pub fn apply_to(&self, base: &BookRecord) -> BookDraft {
        let mut merged = BookDraft::from(base);
        let patch = self.clone();

        merged.title = patch.title.or(merged.title);
        merged.author = patch.author.or(merged.author);
        merged.year = patch.year.or(merged.year);
        merged.language = patch.language.or(merged.language);
        merged.script = patch.script.or(merged.script);
        merged.category = patch.category.or(merged.category);
        merged.description = patch.description.or(merged.description);
        merged.isbn = patch.isbn.or(merged.isbn);
        merged.cover_image = patch.cover_image.or(merged.cover_image);
        merged.file_path = patch.file_path.or(merged.file_path);
        for (key, value) in patch.extra {
            merged.extra.insert(key, value);
        }
        merged
    }
}

impl From<&BookRecord> for BookDraft {
    fn from(record: &BookRecord) -> Self {
        Self {
            id: Some(record.id.clone()),
            title: Some(record.title.clone()),
            author: Some(record.author.clone()),
            year: record.year.map(Value::from),
            language: Some(record.language.clone()),
            script: Some(record.script.clone()),
            category: Some(record.category.clone()),
            description: record.description.clone(),
            isbn: record.isbn.clone(),
            cover_image: record.cover_image.clone(),
            file_path: record.file_path.clone(),
            date_added: record.date_added.clone(),
            extra: record.extra.clone(),
        }
    }
}

/// Current time in the format used for `dateAdded`.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parses a stored timestamp.
///
/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.fff]` (read as UTC) and a bare
/// `YYYY-MM-DD` date (midnight UTC).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Reads an integer year from a JSON value.
pub(crate) fn year_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(scalar_to_string))
}

fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_default())
}

fn lenient_year<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(year_from_value))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<BookId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(BookId::from_value))
}
