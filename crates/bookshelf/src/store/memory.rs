use super::book_store::BookStore;
use super::mem_backend::MemBackend;
use crate::config::DEFAULT_STORAGE_KEY;

pub type InMemoryStore = BookStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// An empty store on a fresh in-memory backend, under the default key.
    pub fn new() -> Self {
        BookStore::empty(MemBackend::new(), DEFAULT_STORAGE_KEY)
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{BookId, BookRecord};
    use crate::store::CatalogStore;
    use serde_json::Map;

    /// A record that passes validation.
    pub fn record(id: i64, title: &str) -> BookRecord {
        BookRecord {
            id: BookId::Numeric(id),
            title: title.to_string(),
            author: "Vyasa".to_string(),
            year: Some(-400),
            language: "sanskrit".to_string(),
            script: "devanagari".to_string(),
            category: "Philosophy".to_string(),
            description: None,
            isbn: None,
            cover_image: None,
            file_path: None,
            date_added: Some(format!("2025-09-{:02}T10:30:00.000Z", (id.rem_euclid(28)) + 1)),
            extra: Map::new(),
        }
    }

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_books(mut self, books: &[(i64, &str)]) -> Self {
            let records = books.iter().map(|(id, title)| record(*id, title)).collect();
            self.store.insert_books(records).unwrap();
            self
        }

        pub fn with_records(mut self, records: Vec<BookRecord>) -> Self {
            self.store.insert_books(records).unwrap();
            self
        }

        pub fn with_sample_catalog(self) -> Self {
            self.with_records(crate::seed::sample_books())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::StoreFixture;
    use super::*;
    use crate::store::CatalogStore;

    #[test]
    fn test_new_store_is_empty() {
        let store = InMemoryStore::new();
        assert!(store.is_empty());
        assert_eq!(store.key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn test_fixtures_coverage() {
        let fixture = StoreFixture::new()
            .with_books(&[(101, "One"), (102, "Two")])
            .with_sample_catalog();
        assert_eq!(fixture.store.snapshot().len(), 2 + crate::seed::sample_books().len());
    }
}
