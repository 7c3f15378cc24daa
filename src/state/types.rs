//! Continuation token store types
//!
//! Serialized to JSON and persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Saved tokens for every operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    /// Per-operation state, keyed by action name
    #[serde(default)]
    pub operations: HashMap<String, OperationState>,
}

impl State {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Get state for an operation
    pub fn get_operation(&self, operation: &str) -> Option<&OperationState> {
        self.operations.get(operation)
    }

    /// Saved token for an operation
    pub fn get_token(&self, operation: &str) -> Option<&str> {
        self.operations.get(operation)?.next_token.as_deref()
    }

    /// Record where an operation stopped; `None` marks it finished
    pub fn set_token(&mut self, operation: &str, token: Option<String>) {
        let entry = self.operations.entry(operation.to_string()).or_default();
        entry.next_token = token;
        entry.updated_at = Some(Utc::now());
    }
}

/// Saved position of one operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationState {
    /// Token of the next page to fetch
    #[serde(default)]
    pub next_token: Option<String>,

    /// When the token was last written
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl OperationState {
    /// Check if the operation ran to completion
    pub fn is_finished(&self) -> bool {
        self.next_token.is_none()
    }
}
