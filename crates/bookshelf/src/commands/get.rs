use crate::commands::CmdResult;
use crate::error::Result;
use crate::model::BookId;
use crate::store::CatalogStore;

pub fn run<S: CatalogStore>(store: &S, id: &BookId) -> Result<CmdResult> {
    let book = store.get_book(id)?;
    Ok(CmdResult::default().with_listed_books(vec![book]))
}
