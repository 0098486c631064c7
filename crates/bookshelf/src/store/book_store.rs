use super::backend::{StorageBackend, StorageEvent};
use super::CatalogStore;
use crate::error::{CatalogError, Result};
use crate::model::{BookId, BookRecord};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

/// Record store persisted as one JSON array under a single storage key.
pub struct BookStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    key: String,
    seed: Vec<BookRecord>,
    records: Rc<RefCell<Vec<BookRecord>>>,
}

impl<B: StorageBackend> BookStore<B> {
    /// Loads the records stored under `key`, or `seed` when there are none.
    ///
    /// The seed is not written back; the key stays absent until the first mutation.
    pub fn open(backend: B, key: impl Into<String>, seed: Vec<BookRecord>) -> Result<Self> {
        let key = key.into();
        let records = load_records(&backend, &key, &seed)?;
        tracing::debug!(key = %key, count = records.len(), "opened book store");

        let store = Self {
            backend,
            key,
            seed,
            records: Rc::new(RefCell::new(records)),
        };
        store.subscribe();
        Ok(store)
    }

    /// A store over a backend known to hold nothing under `key`.
    pub(crate) fn empty(backend: B, key: impl Into<String>) -> Self {
        let store = Self {
            backend,
            key: key.into(),
            seed: Vec::new(),
            records: Rc::new(RefCell::new(Vec::new())),
        };
        store.subscribe();
        store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    /// Replaces the snapshot wholesale whenever another writer updates our key.
    fn subscribe(&self) {
        let key = self.key.clone();
        let records: Weak<RefCell<Vec<BookRecord>>> = Rc::downgrade(&self.records);

        self.backend
            .on_external_change(Rc::new(move |event: &StorageEvent| {
                if event.key != key {
                    return;
                }
                let Some(records) = records.upgrade() else {
                    return;
                };
                let Some(raw) = event.new_value.as_deref() else {
                    tracing::debug!(key = %key, "storage key removed externally, keeping snapshot");
                    return;
                };
                match parse_records(raw) {
                    Ok(incoming) => {
                        tracing::info!(key = %key, count = incoming.len(), "reloaded after external change");
                        *records.borrow_mut() = incoming;
                    }
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "ignoring unreadable external update");
                    }
                }
            }));
    }

    /// Writes `next` to the backend, then makes it the snapshot.
    fn commit(&self, next: Vec<BookRecord>) -> Result<()> {
        let raw = serde_json::to_string(&next).map_err(CatalogError::Serialization)?;
        self.backend.write(&self.key, &raw)?;
        *self.records.borrow_mut() = next;
        Ok(())
    }
}

impl<B: StorageBackend> CatalogStore for BookStore<B> {
    fn snapshot(&self) -> Vec<BookRecord> {
        self.records.borrow().clone()
    }

    fn get_book(&self, id: &BookId) -> Result<BookRecord> {
        self.records
            .borrow()
            .iter()
            .find(|book| &book.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.clone()))
    }

    fn insert_books(&mut self, books: Vec<BookRecord>) -> Result<()> {
        if books.is_empty() {
            return Ok(());
        }

        let mut next = self.snapshot();
        let mut seen: HashSet<BookId> = next.iter().map(|book| book.id.clone()).collect();
        for book in &books {
            if !seen.insert(book.id.clone()) {
                return Err(CatalogError::Store(format!(
                    "Duplicate book id: {}",
                    book.id
                )));
            }
        }

        let added = books.len();
        next.extend(books);
        self.commit(next)?;
        tracing::info!(key = %self.key, added, "inserted books");
        Ok(())
    }

    fn replace_book(&mut self, book: BookRecord) -> Result<()> {
        let mut next = self.snapshot();
        let slot = next
            .iter_mut()
            .find(|existing| existing.id == book.id)
            .ok_or_else(|| CatalogError::NotFound(book.id.clone()))?;
        let id = book.id.clone();
        *slot = book;

        self.commit(next)?;
        tracing::info!(key = %self.key, id = %id, "replaced book");
        Ok(())
    }

    fn remove_book(&mut self, id: &BookId) -> Result<BookRecord> {
        let mut next = self.snapshot();
        let position = next
            .iter()
            .position(|book| &book.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.clone()))?;
        let removed = next.remove(position);

        self.commit(next)?;
        tracing::info!(key = %self.key, id = %id, "removed book");
        Ok(removed)
    }

    fn reload(&mut self) -> Result<()> {
        let records = load_records(&self.backend, &self.key, &self.seed)?;
        *self.records.borrow_mut() = records;
        Ok(())
    }
}

fn load_records<B: StorageBackend>(
    backend: &B,
    key: &str,
    seed: &[BookRecord],
) -> Result<Vec<BookRecord>> {
    let Some(raw) = backend.read(key)? else {
        return Ok(seed.to_vec());
    };

    match parse_records(&raw) {
        Ok(records) => Ok(records),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "stored catalog is unreadable, using seed data");
            Ok(seed.to_vec())
        }
    }
}

fn parse_records(raw: &str) -> Result<Vec<BookRecord>> {
    serde_json::from_str(raw).map_err(CatalogError::Serialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{record, StoreFixture};
    use crate::store::mem_backend::MemBackend;
    use crate::store::InMemoryStore;

    const KEY: &str = "book-library-data";

    fn titles(store: &impl CatalogStore) -> Vec<String> {
        store.snapshot().into_iter().map(|b| b.title).collect()
    }

    #[test]
    fn test_absent_key_uses_seed_without_writing() {
        let store = BookStore::open(MemBackend::new(), KEY, vec![record(1, "Seeded")]).unwrap();
        assert_eq!(titles(&store), vec!["Seeded"]);
        assert_eq!(store.backend().read(KEY).unwrap(), None);
    }

    #[test]
    fn test_stored_empty_list_is_not_reseeded() {
        let backend = MemBackend::new();
        backend.write(KEY, "[]").unwrap();
        let store = BookStore::open(backend, KEY, vec![record(1, "Seeded")]).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_corrupt_storage_falls_back_to_seed() {
        let backend = MemBackend::new();
        backend.write(KEY, "{not json").unwrap();
        let store = BookStore::open(backend, KEY, vec![record(1, "Seeded")]).unwrap();
        assert_eq!(titles(&store), vec!["Seeded"]);
    }

    #[test]
    fn test_insert_persists() {
        let mut fixture = StoreFixture::new();
        fixture
            .store
            .insert_books(vec![record(1, "One"), record(2, "Two")])
            .unwrap();

        let raw = fixture.store.backend().read(KEY).unwrap().unwrap();
        let stored: Vec<BookRecord> = serde_json::from_str(&raw).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].title, "Two");
    }

    #[test]
    fn test_insert_rejects_duplicate_ids() {
        let mut fixture = StoreFixture::new().with_books(&[(1, "One")]);
        let err = fixture
            .store
            .insert_books(vec![record(2, "Two"), record(1, "Again")])
            .unwrap_err();
        assert!(matches!(err, CatalogError::Store(_)));
        assert_eq!(titles(&fixture.store), vec!["One"]);
    }

    #[test]
    fn test_replace_and_remove() {
        let mut fixture = StoreFixture::new().with_books(&[(1, "One"), (2, "Two")]);

        fixture.store.replace_book(record(2, "Deux")).unwrap();
        assert_eq!(titles(&fixture.store), vec!["One", "Deux"]);

        let removed = fixture.store.remove_book(&BookId::Numeric(1)).unwrap();
        assert_eq!(removed.title, "One");
        assert_eq!(titles(&fixture.store), vec!["Deux"]);
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let mut fixture = StoreFixture::new().with_books(&[(1, "One")]);
        let missing = BookId::Numeric(42);

        assert!(matches!(
            fixture.store.get_book(&missing),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            fixture.store.replace_book(record(42, "Nope")),
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            fixture.store.remove_book(&missing),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_failed_write_leaves_snapshot_unchanged() {
        let mut fixture = StoreFixture::new().with_books(&[(1, "One")]);
        fixture.store.backend().set_simulate_write_error(true);

        assert!(fixture.store.insert_books(vec![record(2, "Two")]).is_err());
        assert!(fixture.store.replace_book(record(1, "Uno")).is_err());
        assert!(fixture.store.remove_book(&BookId::Numeric(1)).is_err());
        assert_eq!(titles(&fixture.store), vec!["One"]);
    }

    #[test]
    fn test_external_write_replaces_snapshot() {
        let mut first = InMemoryStore::new();
        first.insert_books(vec![record(1, "One")]).unwrap();
        let second =
            BookStore::open(first.backend().connect(), KEY, Vec::new()).unwrap();
        assert_eq!(titles(&second), vec!["One"]);

        first.insert_books(vec![record(2, "Two")]).unwrap();
        assert_eq!(titles(&second), vec!["One", "Two"]);
    }

    #[test]
    fn test_unreadable_external_write_is_ignored() {
        let first = InMemoryStore::new();
        let mut second =
            BookStore::open(first.backend().connect(), KEY, Vec::new()).unwrap();
        second.insert_books(vec![record(1, "One")]).unwrap();

        first.backend().write(KEY, "garbage").unwrap();
        assert_eq!(titles(&second), vec!["One"]);

        first.backend().write("other-key", "[]").unwrap();
        assert_eq!(titles(&second), vec!["One"]);
    }

    #[test]
    fn test_reload_reads_backend() {
        let mut fixture = StoreFixture::new().with_books(&[(1, "One")]);
        fixture.store.backend().write(KEY, "[]").unwrap();
        assert_eq!(fixture.store.len(), 1);

        fixture.store.reload().unwrap();
        assert!(fixture.store.is_empty());
    }
}
