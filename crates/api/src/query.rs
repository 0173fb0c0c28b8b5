//! Shared query parameter types for API handlers.

use backlog_core::pagination::PageRequest;
use serde::Deserialize;

/// Pagination parameters (`?page=&size=`), 0-based.
///
/// Clamped by [`PageRequest::new`].
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PaginationParams {
    pub fn to_request(&self) -> PageRequest {
        PageRequest::new(self.page, self.size)
    }
}

/// Admin project listing: pagination plus an optional title filter.
#[derive(Debug, Default, Deserialize)]
pub struct AdminProjectParams {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub title: Option<String>,
}
