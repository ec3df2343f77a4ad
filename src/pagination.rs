//! This modules defines the common functionality for paging data.

use serde::{Deserialize, Serialize};

/// The config for pagination
#[derive(Debug, Clone)]
pub struct PaginationConfig {
    /// The page number to default to when not specified in a request.
    pub default_page: u64,
    /// The number of items per page when not specified in a request.
    pub default_page_size: u64,
    /// The largest page size a client may request.
    pub max_page_size: u64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// The query parameters for requesting a page of items.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The maximum number of items on the page.
    pub page_size: Option<u64>,
}

/// A page request with defaults filled in and values clamped to valid ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of items on the page.
    pub page_size: u64,
}

impl PageRequest {
    /// Fill in missing values from `config`.
    ///
    /// A page of zero is treated as the first page and the page size is kept
    /// between one and the configured maximum.
    pub fn new(query: &PageQuery, config: &PaginationConfig) -> Self {
        let page = query.page.unwrap_or(config.default_page).max(1);
        let page_size = query
            .page_size
            .unwrap_or(config.default_page_size)
            .clamp(1, config.max_page_size.max(1));

        Self { page, page_size }
    }

    /// The number of items to skip to get to this page.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// A page of items along with the information needed to fetch the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// The 1-based page number.
    pub page: u64,
    /// The maximum number of items on a page.
    pub page_size: u64,
    /// The number of items across all pages.
    pub total_items: u64,
    /// The number of pages.
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Create a page from the items fetched for `request`.
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages: total_items.div_ceil(request.page_size),
        }
    }
}
