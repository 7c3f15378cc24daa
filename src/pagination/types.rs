//! Pagination types and traits
//!
//! Defines the page request/result values, the per-fetch state and the
//! `PageSource` seam the fetcher drives.

use crate::error::{Error, Result};
use async_trait::async_trait;

/// A single page request handed to a [`PageSource`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageRequest {
    /// Continuation token from the previous page (absent for the first page)
    pub continuation_token: Option<String>,
    /// Requested page size (`MaxResults`)
    pub page_size_hint: Option<u32>,
}

impl PageRequest {
    /// Create a page request
    pub fn new(continuation_token: Option<String>, page_size_hint: Option<u32>) -> Self {
        Self {
            continuation_token,
            page_size_hint,
        }
    }
}

/// One page returned by a [`PageSource`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageResult<T> {
    /// Items in service order
    pub items: Vec<T>,
    /// Token for the next page; absent iff iteration is complete
    pub next_token: Option<String>,
}

impl<T> PageResult<T> {
    /// Create a page result. An empty token is treated as absent.
    pub fn new(items: Vec<T>, next_token: Option<String>) -> Self {
        Self {
            items,
            next_token: next_token.filter(|t| !t.is_empty()),
        }
    }

    /// Create the final page of a sequence
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, None)
    }

    /// Check if more pages follow this one
    pub fn has_more(&self) -> bool {
        self.next_token.is_some()
    }
}

/// A batch emitted by the fetcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// 1-based page number within this fetch
    pub number: usize,
    /// Items returned by this page
    pub items: Vec<T>,
    /// Token this page was requested with
    pub request_token: Option<String>,
    /// Token for the following page, if any
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    /// Number of items in this page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the page carried no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Inclusive service bounds for `MaxResults`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSizeBounds {
    /// Smallest accepted page size
    pub min: u32,
    /// Largest accepted page size
    pub max: u32,
}

impl PageSizeBounds {
    /// Create bounds
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Check a caller-supplied page size
    pub fn check(&self, param: &str, value: u32) -> Result<u32> {
        if value < self.min || value > self.max {
            return Err(Error::PageSizeOutOfRange {
                param: param.to_string(),
                value,
                min: self.min,
                max: self.max,
            });
        }
        Ok(value)
    }

    /// Clamp a derived page size into range
    pub fn clamp(&self, value: usize) -> u32 {
        let value = u32::try_from(value).unwrap_or(u32::MAX);
        value.clamp(self.min, self.max)
    }
}

impl Default for PageSizeBounds {
    fn default() -> Self {
        Self::new(1, 1000)
    }
}

/// Caller-facing knobs for one fetch
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Token to start from; supplying one switches to manual paging
    pub start_token: Option<String>,
    /// Stop once this many items have been emitted
    pub emit_limit: Option<usize>,
    /// Explicit page size
    pub page_size: Option<u32>,
    /// Fetch a single page even without a start token
    pub no_auto_iteration: bool,
    /// Service bounds for the page size
    pub bounds: PageSizeBounds,
    /// The start token came from a saved checkpoint, not the caller
    pub resumed: bool,
}

impl FetchOptions {
    /// Create options with the given page size bounds
    pub fn new(bounds: PageSizeBounds) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Start from a continuation token
    #[must_use]
    pub fn with_start_token(mut self, token: Option<String>) -> Self {
        self.start_token = token.filter(|t| !t.is_empty());
        self
    }

    /// Continue an earlier fetch from a saved token, still auto-iterating
    #[must_use]
    pub fn with_resume_token(mut self, token: Option<String>) -> Self {
        self.start_token = token.filter(|t| !t.is_empty());
        self.resumed = self.start_token.is_some();
        self
    }

    /// Cap the number of emitted items
    #[must_use]
    pub fn with_emit_limit(mut self, limit: Option<usize>) -> Self {
        self.emit_limit = limit;
        self
    }

    /// Set an explicit page size
    #[must_use]
    pub fn with_page_size(mut self, size: Option<u32>) -> Self {
        self.page_size = size;
        self
    }

    /// Disable auto-iteration
    #[must_use]
    pub fn with_no_auto_iteration(mut self, value: bool) -> Self {
        self.no_auto_iteration = value;
        self
    }

    /// Whether the caller is driving pagination by hand
    pub fn user_controls_paging(&self) -> bool {
        self.no_auto_iteration || (self.start_token.is_some() && !self.resumed)
    }

    /// Reject inputs the service would reject, before any call is made
    pub fn validate(&self) -> Result<()> {
        if let Some(size) = self.page_size {
            self.bounds.check("MaxResults", size)?;
        }
        if self.emit_limit == Some(0) {
            return Err(Error::validation("emit limit must be at least 1"));
        }
        Ok(())
    }
}

/// Lifecycle phase of a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// More pages may be requested
    #[default]
    Fetching,
    /// Terminal; no further calls are issued
    Done,
}

/// Loop state owned by one fetch
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    /// Token for the next request
    pub current_token: Option<String>,
    /// Items emitted so far
    pub total_emitted: usize,
    /// Caller-supplied cap
    pub emit_limit: Option<usize>,
    /// Manual paging: one page per invocation
    pub user_controls_paging: bool,
    /// Pages requested so far (including a failed one)
    pub pages_fetched: usize,
    /// Current phase
    pub phase: FetchPhase,
}

impl FetchState {
    /// Create the initial state for a fetch
    pub fn new(options: &FetchOptions) -> Self {
        Self {
            current_token: options.start_token.clone(),
            emit_limit: options.emit_limit,
            user_controls_paging: options.user_controls_paging(),
            ..Default::default()
        }
    }

    /// Check if the fetch has terminated
    pub fn is_done(&self) -> bool {
        self.phase == FetchPhase::Done
    }

    /// Mark the fetch as terminated
    pub fn mark_done(&mut self) {
        self.phase = FetchPhase::Done;
    }

    /// Items still wanted under the emit limit
    pub fn remaining(&self) -> Option<usize> {
        self.emit_limit
            .map(|limit| limit.saturating_sub(self.total_emitted))
    }

    /// Record a received page and decide whether the loop goes on.
    ///
    /// Returns `true` when another page should be requested.
    pub fn advance(&mut self, received: usize, next_token: Option<String>) -> bool {
        self.total_emitted += received;
        self.current_token = next_token;

        let exhausted = self.current_token.is_none();
        let limit_reached = match self.emit_limit {
            // Nothing retrieved yet under a limit stops the loop
            Some(limit) => self.total_emitted == 0 || self.total_emitted >= limit,
            None => false,
        };

        if exhausted || limit_reached || self.user_controls_paging {
            self.mark_done();
            false
        } else {
            true
        }
    }
}

/// Remote paged operation driven by the fetcher
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Item type produced by each page
    type Item: Send;

    /// Fetch one page
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<Self::Item>>;
}

#[async_trait]
impl<S: PageSource + ?Sized> PageSource for &S {
    type Item = S::Item;

    async fn fetch_page(&self, request: &PageRequest) -> Result<PageResult<Self::Item>> {
        (**self).fetch_page(request).await
    }
}
