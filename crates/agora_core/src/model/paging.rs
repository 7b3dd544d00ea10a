//! One page of an ordered result set.

use serde::Serialize;

/// Page of `items` plus the totals needed to render pagination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PagedList<T> {
    pub items: Vec<T>,
    /// 1-based page number.
    pub page_index: u32,
    pub page_size: u32,
    pub total_count: u64,
}

impl<T> PagedList<T> {
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(u64::from(self.page_size))
    }

    pub fn has_next_page(&self) -> bool {
        u64::from(self.page_index) < self.total_pages()
    }

    pub fn has_previous_page(&self) -> bool {
        self.page_index > 1
    }

    /// Row offset of the first item on `page_index`.
    pub fn offset_for(page_index: u32, page_size: u32) -> u64 {
        u64::from(page_index.saturating_sub(1)) * u64::from(page_size)
    }
}

/// Normalizes a requested page number; missing or zero means the first page.
pub fn normalize_page_index(page: Option<u32>) -> u32 {
    match page {
        Some(0) | None => 1,
        Some(value) => value,
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_page_index, PagedList};

    #[test]
    fn page_index_defaults_to_first_page() {
        assert_eq!(normalize_page_index(None), 1);
        assert_eq!(normalize_page_index(Some(0)), 1);
        assert_eq!(normalize_page_index(Some(4)), 4);
    }

    #[test]
    fn totals_round_up_partial_pages() {
        let page = PagedList::<u8> {
            items: Vec::new(),
            page_index: 2,
            page_size: 20,
            total_count: 41,
        };
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next_page());
        assert!(page.has_previous_page());
        assert_eq!(PagedList::<u8>::offset_for(3, 20), 40);
    }
}
