//! Pagination module
//!
//! Generic continuation-token paging shared by every describe operation.
//!
//! # Overview
//!
//! A [`PageSource`] knows how to fetch one page for a token. The
//! [`PaginatedFetcher`] owns the loop: it threads the token from page to page,
//! counts emitted items against an optional emit limit, and stops on the
//! first absent token, the limit, or the first error. When the caller supplies
//! an explicit token (or disables auto-iteration) exactly one page is fetched
//! and the next token is handed back.

mod fetcher;
mod types;

pub use fetcher::{fetch_all, FetchOutcome, PaginatedFetcher};
pub use types::{
    FetchOptions, FetchPhase, FetchState, Page, PageRequest, PageResult, PageSizeBounds,
    PageSource,
};
