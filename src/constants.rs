// src/constants.rs
//! Operational boundaries of the engine.
//!
//! Each constant is named for the domain concept it constrains. Reading them
//! should tell you how the engine paces itself: how small a page may be, how
//! small the item cap may be, and how early the prefetch policy fires.

/// Smallest page size a paginator accepts (exclusive bound).
///
/// Pages of ten records or fewer make the prefetch lookahead degenerate
/// (a quarter page rounds down to nothing) and hammer the source with
/// round-trips. Construction rejects anything at or below this.
pub const MIN_PAGE_SIZE: u32 = 10;

/// Smallest apparent-total cap a paginator accepts (exclusive bound).
///
/// The cap bounds how large the growing collection may appear regardless of
/// what the remote source reports.
pub const MIN_ITEM_CAP: usize = 10;

/// Divisor applied to the page size to compute the prefetch lookahead.
///
/// Scrolling within the last `page_size / PREFETCH_LOOKAHEAD_DIVISOR` items
/// of loaded content triggers the next page load. Eager on purpose: the
/// fetch latency hides behind the remaining scroll distance.
pub const PREFETCH_LOOKAHEAD_DIVISOR: u32 = 4;
