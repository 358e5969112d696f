//! Keyset pagination: page-size clamping and page assembly.

use serde::Serialize;

use crate::cursor::{decode_cursor, encode_cursor, CursorError, DecodedCursor};

/// Default page size when the client does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Largest page a client may request.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Clamp a requested page size to `1..=MAX_PAGE_SIZE`.
pub fn clamp_limit(limit: Option<i64>) -> u32 {
    match limit {
        None => DEFAULT_PAGE_SIZE,
        Some(n) => n.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32,
    }
}

/// A validated page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: u32,
    pub after: Option<DecodedCursor>,
}

impl PageRequest {
    /// Build from raw query values. An empty cursor string means "first page".
    pub fn parse(limit: Option<i64>, cursor: Option<&str>) -> Result<Self, CursorError> {
        let after = match cursor.map(str::trim).filter(|c| !c.is_empty()) {
            Some(c) => Some(decode_cursor(c)?),
            None => None,
        };
        Ok(Self {
            limit: clamp_limit(limit),
            after,
        })
    }

    /// Rows to fetch: one extra to learn whether another page exists.
    pub fn fetch_limit(&self) -> u32 {
        self.limit + 1
    }
}

/// One page of results plus the cursor for the next one.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T: Serialize> {
    pub data: Vec<T>,
    pub next_cursor: Option<String>,
    pub has_more: bool,
}

impl<T: Serialize> Page<T> {
    /// Assemble a page from a `limit + 1` overfetch.
    ///
    /// `watermark` returns the `(created_at, id)` text of a row; the last
    /// kept row's watermark becomes `next_cursor` when more rows exist.
    pub fn from_overfetch<F>(mut rows: Vec<T>, limit: u32, watermark: F) -> Self
    where
        F: Fn(&T) -> (String, String),
    {
        let limit = limit as usize;
        let has_more = rows.len() > limit;
        rows.truncate(limit);

        let next_cursor = if has_more {
            rows.last().map(|row| {
                let (created_at, id) = watermark(row);
                encode_cursor(&created_at, &id)
            })
        } else {
            None
        };

        Self {
            data: rows,
            next_cursor,
            has_more,
        }
    }
}
