use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::BookId;
use crate::store::CatalogStore;

pub fn run<S: CatalogStore>(store: &mut S, id: &BookId) -> Result<CmdResult> {
    let removed = store.remove_book(id)?;
    tracing::info!(id = %removed.id, title = %removed.title, "book deleted");

    let mut result = CmdResult::default().with_affected_books(vec![removed]);
    result.add_message(CmdMessage::success("Book deleted successfully"));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::store::fixtures::StoreFixture;

    #[test]
    fn test_removes_book() {
        let mut fixture = StoreFixture::new().with_books(&[(1, "One"), (2, "Two")]);
        let result = run(&mut fixture.store, &BookId::Numeric(1)).unwrap();

        assert_eq!(result.affected_books[0].title, "One");
        assert_eq!(result.messages[0].content, "Book deleted successfully");
        let remaining: Vec<_> = fixture
            .store
            .snapshot()
            .into_iter()
            .map(|b| b.title)
            .collect();
        assert_eq!(remaining, vec!["Two"]);
    }

    #[test]
    fn test_unknown_id() {
        let mut fixture = StoreFixture::new().with_books(&[(1, "One")]);
        assert!(matches!(
            run(&mut fixture.store, &BookId::from("nope")),
            Err(CatalogError::NotFound(_))
        ));
        assert_eq!(fixture.store.len(), 1);
    }

    #[test]
    fn test_write_failure_keeps_book() {
        let mut fixture = StoreFixture::new().with_books(&[(1, "One")]);
        fixture.store.backend().set_simulate_write_error(true);
        assert!(run(&mut fixture.store, &BookId::Numeric(1)).is_err());
        assert_eq!(fixture.store.len(), 1);
    }
}
