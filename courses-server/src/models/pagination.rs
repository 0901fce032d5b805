//! Pagination types
//!
//! Course listings use a fixed page size; only the page number comes
//! from the client.

use serde::Serialize;

/// Items per page
pub const PAGE_SIZE: u32 = 10;

/// Pagination parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl Pagination {
    /// Create pagination for a 1-indexed page, clamped to a minimum of 1.
    pub fn new(page: u32) -> Self {
        Self::with_per_page(page, PAGE_SIZE)
    }

    pub fn with_per_page(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Calculate SQL OFFSET value.
    pub fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.per_page as u64
    }

    /// Get LIMIT value.
    pub fn limit(&self) -> u32 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Paginated result wrapper
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    /// Items for current page
    pub items: Vec<T>,
    /// Total count across all pages
    pub total: i64,
    /// Current page number
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl<T> Paginated<T> {
    /// Slice an in-memory result set.
    pub fn from_vec(all: Vec<T>, page: Pagination) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .collect();

        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        }
    }

    /// Total number of pages, `ceil(total / per_page)`; 0 for an empty result.
    pub fn num_pages(&self) -> u32 {
        if self.total <= 0 {
            0
        } else {
            ((self.total as u64 + self.per_page as u64 - 1) / self.per_page as u64) as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_calculation() {
        assert_eq!(Pagination::with_per_page(1, 10).offset(), 0);
        assert_eq!(Pagination::with_per_page(2, 10).offset(), 10);
        assert_eq!(Pagination::with_per_page(3, 25).offset(), 50);
    }

    #[test]
    fn clamps_page() {
        let p = Pagination::new(0);
        assert_eq!(p.page, 1);
        assert_eq!(p.per_page, PAGE_SIZE);
    }

    #[test]
    fn num_pages() {
        let empty: Paginated<()> = Paginated::from_vec(vec![], Pagination::new(1));
        assert_eq!(empty.num_pages(), 0);

        let p = Paginated::from_vec(vec![(); 25], Pagination::with_per_page(1, 10));
        assert_eq!(p.num_pages(), 3);

        let p = Paginated::from_vec(vec![(); 100], Pagination::with_per_page(1, 10));
        assert_eq!(p.num_pages(), 10);
    }

    #[test]
    fn from_vec_slices_page() {
        let all: Vec<u32> = (0..23).collect();

        let last = Paginated::from_vec(all.clone(), Pagination::with_per_page(3, 10));
        assert_eq!(last.items, vec![20, 21, 22]);
        assert_eq!(last.total, 23);

        let beyond = Paginated::from_vec(all, Pagination::with_per_page(9, 10));
        assert!(beyond.items.is_empty());
        assert_eq!(beyond.num_pages(), 3);
    }
}
