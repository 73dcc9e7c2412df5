// src/scroll.rs
//! Scroll-driven prefetch policy.
//!
//! A lookahead heuristic, not a hard boundary: the next page is requested
//! while the user is still a quarter page away from the end of loaded
//! content, so the fetch latency hides behind the remaining scroll.

use crate::constants::PREFETCH_LOOKAHEAD_DIVISOR;

/// The load progress the policy needs to make its call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollSnapshot {
    pub loaded_count: usize,
    pub page_size: u32,
    pub pages_loaded: u32,
    pub is_full: bool,
    pub is_load_pending: bool,
}

/// Decides whether the viewport position warrants fetching the next page.
///
/// Returns the page to request, or `None` when the index is negative, the
/// list is exhausted, or a load is already in flight (no overlapping
/// prefetch).
pub fn next_page_to_request(max_visible_index: i64, progress: &ScrollSnapshot) -> Option<u32> {
    if max_visible_index < 0 {
        return None;
    }
    if progress.is_full {
        return None;
    }
    if progress.is_load_pending {
        return None;
    }

    let lookahead = i64::from(progress.page_size / PREFETCH_LOOKAHEAD_DIVISOR);
    if max_visible_index > progress.loaded_count as i64 - lookahead {
        Some(progress.pages_loaded + 1)
    } else {
        None
    }
}
