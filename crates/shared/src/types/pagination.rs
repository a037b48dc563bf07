//! Cursor pagination types for ledger drill-downs.
//!
//! The general ledger can be arbitrarily deep, so listing uses opaque
//! cursors rather than page offsets: a full page implies a cursor pointing
//! at the last row, a partial page implies there is nothing further.

use serde::{Deserialize, Serialize};

/// Default number of rows per page.
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

/// Upper bound on rows per page.
pub const MAX_PAGE_LIMIT: u32 = 500;

/// Request parameters for a cursor-paginated query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest<C> {
    /// Resume after this cursor; `None` starts from the beginning.
    pub cursor: Option<C>,
    /// Number of items per page; `None` uses the caller's configured default.
    #[serde(default)]
    pub limit: Option<u32>,
}

impl<C> Default for PageRequest<C> {
    fn default() -> Self {
        Self {
            cursor: None,
            limit: None,
        }
    }
}

impl<C> PageRequest<C> {
    /// Creates a request for the first page.
    #[must_use]
    pub fn first(limit: u32) -> Self {
        Self {
            cursor: None,
            limit: Some(limit),
        }
    }

    /// Resolves the effective page size: the requested limit, or `default`
    /// when absent, clamped to `1..=MAX_PAGE_LIMIT`.
    #[must_use]
    pub fn limit_or(&self, default: u32) -> u32 {
        self.limit.unwrap_or(default).clamp(1, MAX_PAGE_LIMIT)
    }
}

/// One page of results with the cursor for the next page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CursorPage<T, C> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Cursor to resume from; `None` means no further pages.
    pub next_cursor: Option<C>,
}

impl<T, C: Copy> CursorPage<T, C> {
    /// Builds a page from fetched rows.
    ///
    /// A full page (`items.len() == limit`) yields a cursor equal to the last
    /// row's id; a partial page yields no cursor.
    #[must_use]
    pub fn from_rows(items: Vec<T>, limit: u32, id_of: impl Fn(&T) -> C) -> Self {
        let next_cursor = if items.len() as u32 == limit {
            items.last().map(&id_of)
        } else {
            None
        };
        Self { items, next_cursor }
    }
}

#[cfg(test)]
#[path = "pagination_tests.rs"]
mod tests;
