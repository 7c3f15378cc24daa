//! Paginated list fetcher
//!
//! Drives a [`PageSource`] through its continuation tokens, one page at a
//! time, until the token stream ends, the emit limit is met, or a page fails.

use super::types::{FetchOptions, FetchState, Page, PageRequest, PageSource};
use crate::error::{Error, Result};
use futures::stream::{self, Stream};
use tracing::debug;

/// Sequential page fetcher for one logical fetch
pub struct PaginatedFetcher<S> {
    source: S,
    options: FetchOptions,
    state: FetchState,
}

impl<S: PageSource> PaginatedFetcher<S> {
    /// Create a fetcher, validating caller input before any call is made
    pub fn new(source: S, options: FetchOptions) -> Result<Self> {
        options.validate()?;
        let state = FetchState::new(&options);
        Ok(Self {
            source,
            options,
            state,
        })
    }

    /// Current loop state
    pub fn state(&self) -> &FetchState {
        &self.state
    }

    /// Token the next request would use
    pub fn next_token(&self) -> Option<&str> {
        self.state.current_token.as_deref()
    }

    /// Page size sent with the next request
    fn page_size_hint(&self) -> Option<u32> {
        if self.options.page_size.is_some() {
            return self.options.page_size;
        }
        self.state
            .remaining()
            .map(|remaining| self.options.bounds.clamp(remaining))
    }

    /// Fetch the next page.
    ///
    /// Returns `None` once the fetch is done. A failed page is returned once
    /// as `Some(Err(_))` and ends the fetch.
    pub async fn next_page(&mut self) -> Option<Result<Page<S::Item>>> {
        if self.state.is_done() {
            return None;
        }

        let request = PageRequest::new(self.state.current_token.clone(), self.page_size_hint());
        self.state.pages_fetched += 1;
        let number = self.state.pages_fetched;

        debug!(
            page = number,
            token = ?request.continuation_token,
            page_size = ?request.page_size_hint,
            "Fetching page"
        );

        let result = match self.source.fetch_page(&request).await {
            Ok(result) => result,
            Err(e) => {
                self.state.mark_done();
                debug!(page = number, error = %e, "Page fetch failed");
                return Some(Err(e));
            }
        };

        let received = result.items.len();
        let next_token = result.next_token.clone();
        let more = self.state.advance(received, result.next_token);

        debug!(
            page = number,
            received,
            total = self.state.total_emitted,
            more,
            "Page received"
        );

        if self.state.user_controls_paging {
            debug!(
                "Retrieved {} records starting from marker '{}'",
                self.state.total_emitted,
                request.continuation_token.as_deref().unwrap_or("")
            );
        }

        Some(Ok(Page {
            number,
            items: result.items,
            request_token: request.continuation_token,
            next_token,
        }))
    }

    /// Turn the fetcher into a lazy stream of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Page<S::Item>>> {
        stream::unfold(self, |mut fetcher| async move {
            fetcher.next_page().await.map(|page| (page, fetcher))
        })
    }

    /// Drain the fetcher into an outcome
    pub async fn collect(mut self) -> FetchOutcome<S::Item> {
        let mut pages = Vec::new();
        while let Some(page) = self.next_page().await {
            match page {
                Ok(page) => pages.push(page),
                Err(error) => {
                    return FetchOutcome::Failed {
                        failed_page: self.state.pages_fetched,
                        pages,
                        error,
                    };
                }
            }
        }
        FetchOutcome::Complete {
            pages,
            next_token: self.state.current_token,
        }
    }
}

/// Final result of a fetch
#[derive(Debug)]
pub enum FetchOutcome<T> {
    /// Every requested page arrived
    Complete {
        /// Emitted pages in order
        pages: Vec<Page<T>>,
        /// Token to resume from when the fetch stopped early
        next_token: Option<String>,
    },
    /// Some pages arrived, then one failed
    Failed {
        /// Pages emitted before the failure
        pages: Vec<Page<T>>,
        /// Number of the page that failed
        failed_page: usize,
        /// The failure
        error: Error,
    },
    /// Input was rejected before any call
    Rejected(Error),
}

impl<T> FetchOutcome<T> {
    /// Pages emitted (empty when rejected)
    pub fn pages(&self) -> &[Page<T>] {
        match self {
            Self::Complete { pages, .. } | Self::Failed { pages, .. } => pages,
            Self::Rejected(_) => &[],
        }
    }

    /// All emitted items, flattened in order
    pub fn items(&self) -> impl Iterator<Item = &T> {
        self.pages().iter().flat_map(|p| p.items.iter())
    }

    /// Terminal error, if any
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed { error, .. } | Self::Rejected(error) => Some(error),
            Self::Complete { .. } => None,
        }
    }

    /// Check if the fetch completed without error
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete { .. })
    }

    /// Convert into the emitted items, or the terminal error
    pub fn into_result(self) -> Result<Vec<T>> {
        match self {
            Self::Complete { pages, .. } => {
                Ok(pages.into_iter().flat_map(|p| p.items).collect())
            }
            Self::Failed { error, .. } | Self::Rejected(error) => Err(error),
        }
    }
}

/// Run a whole fetch, folding validation failures into the outcome
pub async fn fetch_all<S: PageSource>(source: S, options: FetchOptions) -> FetchOutcome<S::Item> {
    match PaginatedFetcher::new(source, options) {
        Ok(fetcher) => fetcher.collect().await,
        Err(e) => FetchOutcome::Rejected(e),
    }
}
