// ABOUTME: Page-number pagination for list endpoints with clamped page size
// ABOUTME: Converts 1-based page/limit query values to offsets and wraps results in a Page envelope
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};

use crate::constants::pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT};

/// Normalized 1-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Page number, starting at 1
    pub page: u32,
    /// Page size
    pub limit: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Build from optional query values; page < 1 clamps to 1, limit to `1..=MAX_LIMIT`
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    /// Rows to skip: `(page - 1) * limit`
    #[must_use]
    pub const fn offset(&self) -> u32 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// SQL `LIMIT` bind value
    #[must_use]
    pub fn sql_limit(&self) -> i64 {
        i64::from(self.limit)
    }

    /// SQL `OFFSET` bind value
    #[must_use]
    pub fn sql_offset(&self) -> i64 {
        i64::from(self.offset())
    }
}

/// One page of results plus paging metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    /// Items on this page
    pub data: Vec<T>,
    /// Total rows matching the filter
    pub total: u64,
    /// Page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Number of pages for `total`
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Wrap a slice of results
    #[must_use]
    pub fn new(data: Vec<T>, total: u64, pagination: Pagination) -> Self {
        let limit = u64::from(pagination.limit.max(1));
        Self {
            data,
            total,
            page: pagination.page,
            limit: pagination.limit,
            total_pages: total.div_ceil(limit),
        }
    }

    /// Empty page, used when the actor can see no restaurants
    #[must_use]
    pub fn empty(pagination: Pagination) -> Self {
        Self::new(Vec::new(), 0, pagination)
    }

    /// Transform the items, keeping the metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            data: self.data.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
        }
    }
}
