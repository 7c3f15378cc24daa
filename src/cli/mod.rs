//! CLI module
//!
//! Command-line interface for calling EC2 actions.
//!
//! # Commands
//!
//! - `describe-instances`, `describe-instance-status`,
//!   `describe-capacity-reservations`, `describe-spot-price-history`,
//!   `describe-volumes` - paged listings
//! - `create-capacity-reservation`, `modify-instance-attribute` - single calls
//!
//! Paged commands accept `--next-token`, `--max-results`, `--max-items`,
//! `--no-auto-iteration` and `--resume`.

mod commands;
mod runner;

pub use commands::{Cli, Commands, Invocation, PagingArgs};
pub use runner::Runner;

#[cfg(test)]
mod tests;
