// src/page.rs
//! Paged slices of a remote record set.

/// A request for one page of records.
///
/// Pages are 1-indexed; the paginator never produces a request for page 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Which page to fetch (1-indexed).
    pub number: u32,
    /// How many records the page holds.
    pub size: u32,
}

/// What the source returned for one page: its belief about the full remote
/// size, plus the page's records in server order. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    /// The source's belief about the total remote record count.
    pub total_count: usize,
    /// The page's records, in server order.
    pub items: Vec<T>,
}

impl<T> PageResult<T> {
    pub fn new(total_count: usize, items: Vec<T>) -> Self {
        Self { total_count, items }
    }

    /// The empty result — the observer's placeholder before completion.
    pub fn empty() -> Self {
        Self {
            total_count: 0,
            items: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}
