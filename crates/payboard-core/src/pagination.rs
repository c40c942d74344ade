//! Page arithmetic for the transactions table. Pages are 1-indexed.

use serde::{Deserialize, Serialize};

/// Rows per page unless configured otherwise
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Number of pages needed for `total` rows; zero rows still make one (empty) page
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    total.div_ceil(page_size).max(1)
}

/// Clamp `page` into `[1, page_count]`
pub fn clamp_page(page: usize, total: usize, page_size: usize) -> usize {
    page.clamp(1, page_count(total, page_size))
}

/// The rows `[(page-1)*size, page*size)` of `items`, cut at the end of the slice.
/// Page 0 or a page past the end yields an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// "Showing first-last of total" for the table footer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    /// 1-based index of the first row on the page (0 when empty)
    pub first: usize,
    /// 1-based index of the last row on the page (0 when empty)
    pub last: usize,
    pub total: usize,
}

impl PageRange {
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        let start = page.saturating_sub(1).saturating_mul(page_size);
        if total == 0 || start >= total {
            return Self { first: 0, last: 0, total };
        }
        Self {
            first: start + 1,
            last: (start + page_size).min(total),
            total,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.first == 0
    }
}

impl std::fmt::Display for PageRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Showing {}-{} of {} transactions", self.first, self.last, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 1);
        assert_eq!(page_count(1, 10), 1);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(25, 10), 3);
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(0, 25, 10), 1);
        assert_eq!(clamp_page(2, 25, 10), 2);
        assert_eq!(clamp_page(9, 25, 10), 3);
        assert_eq!(clamp_page(4, 0, 10), 1);
    }

    #[test]
    fn test_paginate_bounds() {
        let items: Vec<u32> = (1..=25).collect();
        assert_eq!(paginate(&items, 1, 10), &items[0..10]);
        assert_eq!(paginate(&items, 3, 10), &[21, 22, 23, 24, 25]);
        assert!(paginate(&items, 4, 10).is_empty());
        assert!(paginate(&items, 0, 10).is_empty());
        assert!(paginate(&items, usize::MAX, 10).is_empty());
    }

    #[test]
    fn test_first_page_of_empty_is_empty() {
        let items: Vec<u32> = vec![];
        assert!(paginate(&items, 1, 10).is_empty());
    }

    #[test]
    fn test_pages_cover_every_row_once() {
        for total in [0usize, 1, 9, 10, 11, 37, 100] {
            let items: Vec<usize> = (0..total).collect();
            let pages = page_count(total, 10);
            let mut seen = Vec::new();
            for page in 1..=pages {
                let slice = paginate(&items, page, 10);
                assert!(slice.len() <= 10);
                seen.extend_from_slice(slice);
            }
            assert_eq!(seen, items);
        }
    }

    #[test]
    fn test_page_range() {
        let range = PageRange::new(3, 10, 25);
        assert_eq!((range.first, range.last, range.total), (21, 25, 25));
        assert_eq!(range.to_string(), "Showing 21-25 of 25 transactions");

        assert!(PageRange::new(1, 10, 0).is_empty());
        assert!(PageRange::new(5, 10, 25).is_empty());
    }
}
