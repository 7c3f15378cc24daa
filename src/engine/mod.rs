//! Execution engine module
//!
//! Runs one operation and turns its results into messages.
//!
//! # Overview
//!
//! The engine module provides:
//! - `OperationEngine` - Drives paged and single-call operations
//! - `PagingConfig` - Caller paging choices (token, page size, item cap)
//! - Message types for output (Record, Page, State, Log, Error)
//!
//! Pages are emitted as they arrive. When a page fails, everything before it
//! has already been written and the error follows as an `Error` message.

mod types;

pub use types::{LogLevel, Message, MessageSink, PagingConfig, RunStats};

use crate::error::Result;
use crate::http::Ec2Client;
use crate::operations::{invoke, Operation, OperationPager, PagedOperation};
use crate::pagination::PaginatedFetcher;
use crate::state::StateManager;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Runs operations against one EC2 client
pub struct OperationEngine {
    /// EC2 client
    client: Ec2Client,
    /// Continuation token store
    state: StateManager,
    /// Statistics of the last run
    stats: RunStats,
}

impl OperationEngine {
    /// Create a new engine
    pub fn new(client: Ec2Client, state: StateManager) -> Self {
        Self {
            client,
            state,
            stats: RunStats::default(),
        }
    }

    /// Get the EC2 client
    pub fn client(&self) -> &Ec2Client {
        &self.client
    }

    /// Get the state manager
    pub fn state(&self) -> &StateManager {
        &self.state
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Run a paged operation, emitting records page by page.
    ///
    /// Caller input is rejected before any request. A failed page ends the
    /// run with an `Error` message and the error is returned.
    pub async fn run_paged<O: PagedOperation>(
        &mut self,
        operation: &O,
        paging: &PagingConfig,
        sink: &mut dyn MessageSink,
    ) -> Result<()> {
        let start = Instant::now();
        self.stats = RunStats::new();

        let saved = if paging.resume && paging.next_token.is_none() {
            let saved = self.state.get_token(O::ACTION).await;
            if saved.is_none() {
                sink.emit(Message::info(format!(
                    "No saved token for {}, starting from the first page",
                    O::ACTION
                )))?;
            }
            saved
        } else {
            None
        };

        let options = paging.fetch_options(O::BOUNDS, saved);
        operation.check_paging(&options)?;
        let pager = OperationPager::new(&self.client, operation)?;
        let mut fetcher = PaginatedFetcher::new(pager, options)?;

        info!("Running {}", O::ACTION);

        while let Some(result) = fetcher.next_page().await {
            let page = match result {
                Ok(page) => page,
                Err(e) => {
                    let failed_page = fetcher.state().pages_fetched;
                    warn!("{} failed on page {}: {}", O::ACTION, failed_page, e);
                    self.stats.add_error();
                    sink.emit(Message::error(O::ACTION, Some(failed_page), &e))?;

                    // Keep the failed page's token so --resume retries it
                    let retry_token = fetcher.state().current_token.clone();
                    if let Err(save_err) = self.state.set_token(O::ACTION, retry_token).await {
                        warn!("Failed to save continuation token: {}", save_err);
                    }

                    finish(&mut self.stats, start, sink)?;
                    return Err(e);
                }
            };

            let count = page.items.len();
            for item in page.items {
                sink.emit(Message::record(O::ACTION, Some(page.number), item))?;
            }
            self.stats.add_page();
            self.stats.add_records(count);

            sink.emit(Message::Page {
                operation: O::ACTION.to_string(),
                number: page.number,
                records: count,
                request_token: page.request_token.clone(),
                next_token: page.next_token.clone(),
            })?;

            if fetcher.state().user_controls_paging {
                sink.emit(Message::info(format!(
                    "Retrieved {} records starting from marker '{}'",
                    fetcher.state().total_emitted,
                    page.request_token.as_deref().unwrap_or("")
                )))?;
            }
        }

        let next_token = fetcher.state().current_token.clone();
        debug!(
            "{} finished: pages={}, records={}, next_token={:?}",
            O::ACTION,
            self.stats.pages_fetched,
            self.stats.records_emitted,
            next_token
        );

        if let Some(token) = &next_token {
            sink.emit(Message::state(O::ACTION, token.clone()))?;
        }
        if let Err(e) = self.state.set_token(O::ACTION, next_token).await {
            warn!("Failed to save continuation token: {}", e);
            sink.emit(Message::warn(format!("Failed to save continuation token: {e}")))?;
            finish(&mut self.stats, start, sink)?;
            return Err(e);
        }

        finish(&mut self.stats, start, sink)
    }

    /// Run a single-call operation and emit its result as one record.
    ///
    /// A `DryRunOperation` answer counts as success.
    pub async fn run_single<O: Operation>(
        &mut self,
        operation: &O,
        sink: &mut dyn MessageSink,
    ) -> Result<()> {
        let start = Instant::now();
        self.stats = RunStats::new();

        operation.validate()?;
        info!("Running {}", O::ACTION);

        match invoke(&self.client, operation).await {
            Ok(value) => {
                self.stats.add_records(1);
                sink.emit(Message::record(O::ACTION, None, value))?;
            }
            Err(e) if e.is_dry_run_success() => {
                sink.emit(Message::info(format!(
                    "{}: request would have succeeded, but DryRun flag is set",
                    O::ACTION
                )))?;
            }
            Err(e) => {
                self.stats.add_error();
                sink.emit(Message::error(O::ACTION, None, &e))?;
                finish(&mut self.stats, start, sink)?;
                return Err(e);
            }
        }

        finish(&mut self.stats, start, sink)
    }
}

fn finish(stats: &mut RunStats, start: Instant, sink: &mut dyn MessageSink) -> Result<()> {
    stats.set_duration(start.elapsed().as_millis() as u64);
    sink.emit(Message::Summary(stats.clone()))
}

impl std::fmt::Debug for OperationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperationEngine")
            .field("client", &self.client)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
