//! Slicing an ordered result list into pages.
//!
//! Pages are 1-based. An empty list still has one (empty) page, so `total_pages` is
//! never zero and page 1 is always a valid request. Out-of-range page numbers are
//! clamped rather than rejected.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page_number: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page_number > 1
    }

    pub fn has_next(&self) -> bool {
        self.page_number < self.total_pages
    }

    /// 1-based position of the first item on this page, 0 when the page is empty.
    pub fn first_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.page_number - 1) * self.page_size + 1
        }
    }

    /// 1-based position of the last item on this page, 0 when the page is empty.
    pub fn last_item(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.first_item() + self.items.len() - 1
        }
    }
}

pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    total_items.div_ceil(page_size.max(1)).max(1)
}

/// Returns page `page_number` of `ordered`.
///
/// A `page_size` of 0 is treated as 1; `page_number` is clamped into
/// `1..=total_pages`.
pub fn paginate<T: Clone>(ordered: &[T], page_size: usize, page_number: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(ordered.len(), page_size);
    let page_number = page_number.clamp(1, total_pages);

    let start = (page_number - 1) * page_size;
    let end = (start + page_size).min(ordered.len());
    let items = ordered.get(start..end).unwrap_or_default().to_vec();

    Page {
        items,
        page_number,
        page_size,
        total_items: ordered.len(),
        total_pages,
    }
}
