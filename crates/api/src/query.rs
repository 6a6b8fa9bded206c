//! Shared query parameter types for API handlers.

use serde::Deserialize;
use watches_core::pagination::Pagination;

/// `?page=&limit=` as raw strings.
///
/// Kept as strings so that garbage such as `?page=abc` falls back to the
/// defaults instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    pub fn pagination(&self, max_limit: Option<i64>) -> Pagination {
        Pagination::from_raw(self.page.as_deref(), self.limit.as_deref()).capped(max_limit)
    }
}
