//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use domain::{PageRequest, DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

/// Pagination query parameters (`?page=&limit=`)
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE_NUMBER
}

fn default_limit() -> u64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE_NUMBER,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<PaginationParams> for PageRequest {
    fn from(params: PaginationParams) -> Self {
        PageRequest::new(params.page, params.limit)
    }
}

/// Paginated response wrapper
#[derive(Debug, Serialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: u64,
    pub limit: u64,
    pub total: u64,
    pub total_pages: u64,
}

impl<T> Paginated<T> {
    /// Create new paginated response
    pub fn new(data: Vec<T>, page: PageRequest, total: u64) -> Self {
        Self {
            data,
            meta: PaginationMeta {
                page: page.page,
                limit: page.limit,
                total,
                total_pages: total.div_ceil(page.limit),
            },
        }
    }
}
