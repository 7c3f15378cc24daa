//! Continuation token store
//!
//! Remembers the last continuation token of each operation so a later run
//! can pick up where an interrupted or capped one stopped (`--resume`).
//!
//! # Overview
//!
//! - `State` - Saved tokens keyed by action name
//! - `StateManager` - File-based persistence with atomic writes

mod manager;
mod types;

pub use manager::StateManager;
pub use types::{OperationState, State};

#[cfg(test)]
mod manager_tests;
