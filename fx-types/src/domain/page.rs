//! Paged views over ordered data.

use serde::{Deserialize, Serialize};

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: T,
    /// 1-based page index
    pub page_number: u32,
    pub page_size: u32,
    pub total_pages: u32,
    /// Link to the following page, `None` on the last page
    pub next_page_url: Option<String>,
}

impl<T> Page<T> {
    /// Transforms the items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Page<U> {
        Page {
            items: f(self.items),
            page_number: self.page_number,
            page_size: self.page_size,
            total_pages: self.total_pages,
            next_page_url: self.next_page_url,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page_url.is_some()
    }
}
