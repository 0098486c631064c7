//! Locale-aware string ordering for titles and authors.
//!
//! Strings are compared level by level, the way a collation table does it:
//!
//! 1. base letters, with accents and case removed
//! 2. accents (unaccented before accented)
//! 3. case (lowercase before uppercase)
//!
//! Strings equal at all three levels fall back to plain code point order, so the
//! ordering is total and `compare(a, b) == Equal` only when `a == b`.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Precomputed sort key for one string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct CollationKey {
    primary: String,
    secondary: String,
    tertiary: Vec<bool>,
    raw: String,
}

impl CollationKey {
    pub fn new(s: &str) -> Self {
        let decomposed: String = s.nfkd().collect();

        let primary = decomposed
            .chars()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .collect();
        let secondary = decomposed.chars().flat_map(char::to_lowercase).collect();
        let tertiary = decomposed
            .chars()
            .filter(|c| !is_combining_mark(*c))
            .map(char::is_uppercase)
            .collect();

        Self {
            primary,
            secondary,
            tertiary,
            raw: s.to_string(),
        }
    }
}

pub fn compare(a: &str, b: &str) -> Ordering {
    CollationKey::new(a).cmp(&CollationKey::new(b))
}
