use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::paginate::paginate;
use crate::query::{recent, search, Criteria, SortKey};
use crate::store::CatalogStore;
use serde::{Deserialize, Serialize};

/// One library-page query: what to match, how to order it, which page to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BrowseRequest {
    pub criteria: Criteria,
    pub sort: SortKey,
    /// 1-based; clamped into range.
    pub page: usize,
}

impl Default for BrowseRequest {
    fn default() -> Self {
        Self {
            criteria: Criteria::default(),
            sort: SortKey::default(),
            page: 1,
        }
    }
}

impl BrowseRequest {
    pub fn new(criteria: Criteria) -> Self {
        Self {
            criteria,
            ..Default::default()
        }
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// A copy with different criteria, back on page 1.
    pub fn refine(&self, criteria: Criteria) -> Self {
        Self {
            criteria,
            sort: self.sort,
            page: 1,
        }
    }

    /// A copy with a different sort key, back on page 1.
    pub fn resort(&self, sort: SortKey) -> Self {
        Self {
            criteria: self.criteria.clone(),
            sort,
            page: 1,
        }
    }
}

pub fn run<S: CatalogStore>(
    store: &S,
    request: &BrowseRequest,
    page_size: usize,
) -> Result<CmdResult> {
    let ordered = search(&store.snapshot(), &request.criteria, request.sort);
    let page = paginate(&ordered, page_size, request.page);

    let mut result = CmdResult::default();
    if page.total_items == 0 {
        result.add_message(CmdMessage::info("No books found matching your criteria"));
    } else {
        result.add_message(CmdMessage::info(format!(
            "Showing {}-{} of {} books",
            page.first_item(),
            page.last_item(),
            page.total_items
        )));
    }
    Ok(result.with_page(page))
}

/// The `count` most recently added books, newest first.
pub fn featured<S: CatalogStore>(store: &S, count: usize) -> Result<CmdResult> {
    let books = recent(&store.snapshot(), count);
    Ok(CmdResult::default().with_listed_books(books))
}
