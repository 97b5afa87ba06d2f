//! Page window used by list queries.

use crate::constants::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};

/// 1-indexed page request. Page is capped at `MAX_PAGE_NUMBER`, size at `MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE_NUMBER),
            limit: limit.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based page index for `Paginator::fetch_page`
    pub fn index(&self) -> u64 {
        self.page - 1
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamps_and_offsets() {
        let page = PageRequest::new(0, 1_000);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(3, 20).index(), 2);
    }

    #[test]
    fn huge_page_number_is_capped() {
        let page = PageRequest::new(u64::MAX, MAX_PAGE_SIZE);
        assert_eq!(page.page, MAX_PAGE_NUMBER);
        assert!(page.index().checked_mul(page.limit).is_some());
    }
}
