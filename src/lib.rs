// src/lib.rs
//! pagefeed — UI-agnostic infinite-list engine.
//!
//! Loads a logically unbounded, remotely-sourced list of records in discrete
//! pages, exposes the aggregate as an ever-growing ordered collection, and
//! derives a small discrete display state a presentation layer uses to decide
//! what to show (spinner, list, error panel, refresh indicator).
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Fetch contract** — [`PageSource`], [`PageRequest`], [`PageResult`]
//! - **Async observation** — [`TaskObserver`], [`TaskObserverBuilder`],
//!   [`TaskStatus`]
//! - **Pagination** — [`Paginator`], [`PaginatorConfig`],
//!   [`PaginatorSnapshot`]
//! - **Display state** — [`resolve`], [`DisplayState`], [`DisplayPhase`]
//! - **Prefetch policy** — [`next_page_to_request`], [`ScrollSnapshot`]
//! - **Error handling** — [`FetchError`], [`ErrorKind`], [`ConfigError`]
//!
//! The engine is a library with a purely in-process boundary: the data
//! source is an opaque asynchronous operation supplied at construction, the
//! completion callback is a plain owned function, and the scroll signal is a
//! method call. There is no network stack, no persistence and no UI here.

mod constants;
mod error;
mod observer;
mod page;
mod paginator;
mod resolver;
mod scroll;
mod source;

// --- Error handling ---
pub use crate::error::{ConfigError, ErrorKind, FetchError};

// --- Fetch contract ---
pub use crate::page::{PageRequest, PageResult};
pub use crate::source::PageSource;

// --- Async observation ---
pub use crate::observer::{TaskObserver, TaskObserverBuilder, TaskStatus};

// --- Pagination ---
pub use crate::paginator::{Paginator, PaginatorConfig, PaginatorSnapshot};

// --- Display state ---
pub use crate::resolver::{resolve, DisplayPhase, DisplayState};

// --- Prefetch policy ---
pub use crate::scroll::{next_page_to_request, ScrollSnapshot};

// --- Operational boundaries ---
pub use crate::constants::{MIN_ITEM_CAP, MIN_PAGE_SIZE, PREFETCH_LOOKAHEAD_DIVISOR};
