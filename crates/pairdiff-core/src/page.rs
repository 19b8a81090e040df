//! Fixed-size pagination of column pairs

use crate::columns::ColumnPair;
use serde::Serialize;
use std::num::NonZeroUsize;

/// Header row carried by every page
pub const PAGE_HEADER: [&str; 2] = ["OLD VERSION", "NEW VERSION"];

/// One independently renderable table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page {
    /// 1-based page number within its file
    pub number: usize,
    pub header: [&'static str; 2],
    pub rows: Vec<ColumnPair>,
}

impl Page {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Split rows into pages of at most `max_rows` rows.
///
/// Concatenating the pages' rows gives back `rows` in order. No pages are
/// produced for empty input.
pub fn paginate(rows: Vec<ColumnPair>, max_rows: NonZeroUsize) -> Vec<Page> {
    let max_rows = max_rows.get();
    let mut pages = Vec::with_capacity(rows.len().div_ceil(max_rows));
    let mut rows = rows.into_iter().peekable();

    while rows.peek().is_some() {
        let chunk: Vec<ColumnPair> = rows.by_ref().take(max_rows).collect();
        pages.push(Page {
            number: pages.len() + 1,
            header: PAGE_HEADER,
            rows: chunk,
        });
    }
    pages
}
