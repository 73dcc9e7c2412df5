// src/paginator.rs
//! Sequential page loading into an ever-growing item collection.
//!
//! The paginator owns all mutable pagination state behind one mutex: the
//! collection, the capped total, the loaded-page count, the refresh flag and
//! the current observer. `load_page` returns immediately after starting the
//! fetch; all mutation happens when the observer settles.

use crate::constants::{MIN_ITEM_CAP, MIN_PAGE_SIZE};
use crate::error::{ConfigError, ErrorKind};
use crate::observer::{TaskObserver, TaskStatus};
use crate::page::{PageRequest, PageResult};
use crate::resolver::{resolve, DisplayState};
use crate::scroll::{next_page_to_request, ScrollSnapshot};
use crate::source::PageSource;
use parking_lot::Mutex;
use std::sync::{Arc, Weak};

/// Validated construction parameters for a [`Paginator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginatorConfig {
    page_size: u32,
    max_item_count: usize,
}

impl PaginatorConfig {
    /// Both bounds are exclusive: a page size or item cap of 10 or less is
    /// rejected.
    pub fn new(page_size: u32, max_item_count: usize) -> Result<Self, ConfigError> {
        if page_size <= MIN_PAGE_SIZE {
            return Err(ConfigError::PageSizeTooSmall {
                given: page_size,
                min: MIN_PAGE_SIZE,
            });
        }
        if max_item_count <= MIN_ITEM_CAP {
            return Err(ConfigError::MaxItemCountTooSmall {
                given: max_item_count,
                min: MIN_ITEM_CAP,
            });
        }
        Ok(Self {
            page_size,
            max_item_count,
        })
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn max_item_count(&self) -> usize {
        self.max_item_count
    }
}

/// A consistent point-in-time view of pagination state, read under the guard.
///
/// This is what the display-state resolver consumes; it can also serve a
/// presentation layer that wants raw progress numbers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginatorSnapshot {
    /// Whether any load has ever been started.
    pub has_started: bool,
    /// Status of the current (or last settled) load, if any.
    pub task_status: Option<TaskStatus>,
    /// Classification of the recorded failure, for a faulted load.
    pub error_kind: Option<ErrorKind>,
    /// Items accumulated so far.
    pub loaded_count: usize,
    /// Whether the most recently started load was a refresh.
    pub has_refreshed: bool,
}

/// Everything `load_page` and the settlement callbacks mutate, guarded by
/// one mutex.
struct LoadState<T> {
    items: Vec<T>,
    total_count: usize,
    pages_loaded: u32,
    refresh_requested: bool,
    observer: Option<Arc<TaskObserver<PageResult<T>>>>,
    in_flight_page: Option<u32>,
    /// Monotonic id of the most recently started load, so a superseded
    /// load's settlement cannot clobber its successor's bookkeeping.
    load_seq: u64,
}

struct Shared<T> {
    config: PaginatorConfig,
    source: Arc<dyn PageSource<T>>,
    on_task_completed: Box<dyn Fn() + Send + Sync>,
    state: Mutex<LoadState<T>>,
}

impl<T: Clone + Send + Sync + 'static> Shared<T> {
    /// Success-path mutation, run under the guard when a page arrives.
    ///
    /// Only the currently tracked load may mutate: a superseded load's
    /// settlement is discarded, whatever its outcome.
    fn apply_page(&self, page: &PageResult<T>, seq: u64) {
        let mut state = self.state.lock();
        if state.load_seq != seq {
            log::debug!("superseded load settled with a page, discarding it");
            return;
        }
        log::info!(
            "page retrieved: {} items, remote total {}",
            page.items.len(),
            page.total_count
        );

        if state.refresh_requested {
            log::info!("refresh requested, rebuilding collection from page 1");
            state.items.clear();
            state.pages_loaded = 0;
        }

        state.total_count = page.total_count.min(self.config.max_item_count);
        state.pages_loaded += 1;
        state.items.extend_from_slice(&page.items);
        if state.items.len() > state.total_count {
            log::debug!(
                "final page overshot the apparent total, truncating {} -> {}",
                state.items.len(),
                state.total_count
            );
            let total = state.total_count;
            state.items.truncate(total);
        }

        log::info!(
            "{} items in collection, {} pages loaded",
            state.items.len(),
            state.pages_loaded
        );
    }
}

fn state_is_full<T>(state: &LoadState<T>) -> bool {
    // total_count starts at 0, so fullness is meaningless before the first
    // page has settled.
    state.pages_loaded > 0 && state.items.len() >= state.total_count
}

/// Orchestrates sequential page fetches and tracks the growing collection.
///
/// Cloning yields another handle to the same paginator; the settlement
/// callbacks hold only weak references back to it, so dropping every handle
/// tears the engine down even with a fetch still in flight.
pub struct Paginator<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Paginator<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Paginator<T> {
    /// Builds a paginator over the given source.
    ///
    /// `on_task_completed` fires once per settled load, after any internal
    /// mutation, on the settlement task's execution context — marshaling to
    /// a UI thread is the caller's concern.
    pub fn new(
        config: PaginatorConfig,
        source: Arc<dyn PageSource<T>>,
        on_task_completed: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        log::info!(
            "building paginator with page_size: {}, max_item_count: {}",
            config.page_size(),
            config.max_item_count()
        );
        Self {
            shared: Arc::new(Shared {
                config,
                source,
                on_task_completed: Box::new(on_task_completed),
                state: Mutex::new(LoadState {
                    items: Vec::new(),
                    total_count: 0,
                    pages_loaded: 0,
                    refresh_requested: false,
                    observer: None,
                    in_flight_page: None,
                    load_seq: 0,
                }),
            }),
        }
    }

    /// Starts loading the given page (1-indexed) and returns immediately.
    ///
    /// A duplicate of the page currently in flight is rejected; a full
    /// paginator ignores requests beyond what is loaded; requesting page 1
    /// after at least one page has loaded is a refresh and rebuilds the
    /// collection from that page's result.
    ///
    /// # Panics
    ///
    /// Panics if `page_number` is 0; pages are 1-indexed.
    pub fn load_page(&self, page_number: u32) {
        assert!(page_number >= 1, "pages are 1-indexed, got page 0");

        let observer = {
            let mut state = self.shared.state.lock();
            log::info!(
                "loading page {page_number}, {} pages loaded so far",
                state.pages_loaded
            );

            if state.in_flight_page == Some(page_number) {
                log::info!("page {page_number} is already being fetched, ignoring");
                return;
            }

            if page_number > state.pages_loaded && state_is_full(&state) {
                log::info!(
                    "nothing further to load, apparent total {} already reached",
                    state.total_count
                );
                return;
            }

            state.refresh_requested = page_number == 1 && state.pages_loaded > 0;
            if state.refresh_requested {
                log::info!("refresh detected");
            }

            state.load_seq += 1;
            let seq = state.load_seq;
            let request = PageRequest {
                number: page_number,
                size: self.shared.config.page_size(),
            };

            let source = Arc::clone(&self.shared.source);
            let on_success = Arc::downgrade(&self.shared);
            let on_fault = Arc::downgrade(&self.shared);
            let on_cancel = Arc::downgrade(&self.shared);
            let on_settle = Arc::downgrade(&self.shared);

            let observer = Arc::new(
                TaskObserver::builder(
                    move || async move { source.fetch_page(request).await },
                    PageResult::empty(),
                )
                .on_succeeded(move |page: &PageResult<T>| {
                    if let Some(shared) = on_success.upgrade() {
                        shared.apply_page(page, seq);
                    }
                })
                .on_faulted(move |error| {
                    log::warn!("loading page {page_number} failed: {error}");
                    clear_refresh_flag(&on_fault, seq);
                })
                .on_canceled(move || {
                    log::info!("loading page {page_number} was canceled");
                    clear_refresh_flag(&on_cancel, seq);
                })
                .on_settled(move || {
                    if let Some(shared) = on_settle.upgrade() {
                        {
                            let mut state = shared.state.lock();
                            if state.load_seq == seq {
                                state.in_flight_page = None;
                            }
                        }
                        (shared.on_task_completed)();
                    }
                })
                .build(),
            );

            state.observer = Some(Arc::clone(&observer));
            state.in_flight_page = Some(page_number);
            observer
        };

        observer.start();
    }

    /// Scroll-position entry point: may start the next page load.
    ///
    /// `last_visible_index` is the highest item index currently visible;
    /// negative values are ignored.
    pub fn on_scroll(&self, last_visible_index: i64) {
        let decision = {
            let state = self.shared.state.lock();
            let progress = ScrollSnapshot {
                loaded_count: state.items.len(),
                page_size: self.shared.config.page_size(),
                pages_loaded: state.pages_loaded,
                is_full: state_is_full(&state),
                is_load_pending: state
                    .observer
                    .as_ref()
                    .is_some_and(|observer| observer.is_pending()),
            };
            next_page_to_request(last_visible_index, &progress)
        };

        if let Some(page) = decision {
            log::info!(
                "scrolled near the end (visible index {last_visible_index}), prefetching page {page}"
            );
            self.load_page(page);
        }
    }

    /// Clears the collection and the loaded-page count.
    ///
    /// The apparent total and the current observer are deliberately kept;
    /// a refresh load rebuilds from here.
    pub fn reset(&self) {
        log::info!("resetting paginator");
        let mut state = self.shared.state.lock();
        state.items.clear();
        state.pages_loaded = 0;
    }

    pub fn page_size(&self) -> u32 {
        self.shared.config.page_size()
    }

    pub fn max_item_count(&self) -> usize {
        self.shared.config.max_item_count()
    }

    /// How many items have been accumulated.
    pub fn loaded_count(&self) -> usize {
        self.shared.state.lock().items.len()
    }

    /// The capped apparent total; 0 until the first load settles.
    pub fn total_count(&self) -> usize {
        self.shared.state.lock().total_count
    }

    pub fn pages_loaded(&self) -> u32 {
        self.shared.state.lock().pages_loaded
    }

    /// Whether everything the source claims to have has been loaded.
    pub fn is_full(&self) -> bool {
        state_is_full(&self.shared.state.lock())
    }

    /// Whether any load has ever been started.
    pub fn has_started(&self) -> bool {
        self.shared.state.lock().observer.is_some()
    }

    /// Whether the most recently started load was a refresh.
    pub fn has_refreshed(&self) -> bool {
        self.shared.state.lock().refresh_requested
    }

    /// Whether a load is currently in flight.
    pub fn is_load_pending(&self) -> bool {
        self.shared
            .state
            .lock()
            .observer
            .as_ref()
            .is_some_and(|observer| observer.is_pending())
    }

    /// A clone of the accumulated items, in load order.
    pub fn items(&self) -> Vec<T> {
        self.shared.state.lock().items.clone()
    }

    /// A consistent snapshot of everything display-state derivation needs.
    pub fn snapshot(&self) -> PaginatorSnapshot {
        let state = self.shared.state.lock();
        PaginatorSnapshot {
            has_started: state.observer.is_some(),
            task_status: state.observer.as_ref().map(|observer| observer.status()),
            error_kind: state
                .observer
                .as_ref()
                .and_then(|observer| observer.error())
                .map(|error| error.kind()),
            loaded_count: state.items.len(),
            has_refreshed: state.refresh_requested,
        }
    }

    /// Derives the current display state; side-effect free.
    pub fn display_state(&self) -> DisplayState {
        resolve(&self.snapshot())
    }
}

/// Fault and cancel leave the collection alone but invalidate the refresh
/// flag: a refresh only counts once its page 1 actually lands.
///
/// A superseded load's settlement must not touch the flag — it belongs to
/// the load that is currently tracked.
fn clear_refresh_flag<T>(shared: &Weak<Shared<T>>, seq: u64) {
    if let Some(shared) = shared.upgrade() {
        let mut state = shared.state.lock();
        if state.load_seq == seq {
            state.refresh_requested = false;
        } else {
            log::debug!("superseded load settled with a failure, discarding it");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn config_rejects_small_page_sizes() {
        assert_eq!(
            PaginatorConfig::new(10, 300),
            Err(ConfigError::PageSizeTooSmall { given: 10, min: 10 })
        );
        assert!(PaginatorConfig::new(11, 300).is_ok());
    }

    #[test]
    fn config_rejects_small_item_caps() {
        assert_eq!(
            PaginatorConfig::new(50, 10),
            Err(ConfigError::MaxItemCountTooSmall { given: 10, min: 10 })
        );
        assert!(PaginatorConfig::new(50, 11).is_ok());
    }

    #[test]
    fn config_exposes_its_bounds() {
        let config = PaginatorConfig::new(50, 300).unwrap();
        assert_eq!(config.page_size(), 50);
        assert_eq!(config.max_item_count(), 300);
    }
}
