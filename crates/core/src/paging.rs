//! Page window arithmetic and the lookahead page result.
//!
//! Page numbers are 1-based. A page size of zero or less means "no
//! pagination" and yields the unbounded result set.

use serde::Serialize;

/// Default number of rows per page for list screens.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// A requested page: 1-based number plus size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page_no: i64,
    pub page_size: i64,
}

/// The row window a [`PageRequest`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// Every matching row.
    All,
    /// No rows at all; the request points before the first page.
    Empty,
    /// `limit` rows starting at `offset`.
    Slice { limit: i64, offset: i64 },
}

impl PageRequest {
    pub fn new(page_no: i64, page_size: i64) -> Self {
        Self { page_no, page_size }
    }

    /// The first page with [`DEFAULT_PAGE_SIZE`] rows.
    pub fn first() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }

    /// No pagination: every matching row.
    pub fn unbounded() -> Self {
        Self::new(0, 0)
    }

    /// The page after this one, same size. Used for the lookahead query.
    pub fn next(self) -> Self {
        Self::new(self.page_no.saturating_add(1), self.page_size)
    }

    /// Resolve the request into a row window.
    pub fn window(self) -> Window {
        if self.page_size <= 0 {
            return Window::All;
        }
        if self.page_no < 1 {
            return Window::Empty;
        }
        match (self.page_no - 1).checked_mul(self.page_size) {
            Some(offset) => Window::Slice {
                limit: self.page_size,
                offset,
            },
            // Past anything a table can hold.
            None => Window::Empty,
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// One page of rows plus the size of the page that follows it.
///
/// `next_page_size` is only used to decide whether a "next" control is shown;
/// the rows of the following page are never exposed.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_size: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_size: usize) -> Self {
        Self {
            items,
            next_page_size,
        }
    }

    pub fn has_next(&self) -> bool {
        self.next_page_size > 0
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}
