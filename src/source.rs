// src/source.rs
//! Capability trait for the caller-supplied page source.

use crate::error::FetchError;
use crate::page::{PageRequest, PageResult};

/// Retrieves one page of records from wherever the records live.
///
/// This is the engine's only outward dependency. Implementations own
/// whatever transport, retry, or timeout behavior they want; the engine
/// itself enforces none. A cancellation-capable source reports a torn-down
/// fetch as [`FetchError::Canceled`].
#[async_trait::async_trait]
pub trait PageSource<T>: Send + Sync {
    async fn fetch_page(&self, request: PageRequest) -> Result<PageResult<T>, FetchError>;
}
