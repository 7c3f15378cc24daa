//! State manager implementation
//!
//! Provides file-based token persistence with atomic writes.

use super::types::State;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

/// Loads, updates and saves the token store
#[derive(Debug)]
pub struct StateManager {
    /// Path to the state file
    path: PathBuf,
    /// Current state (cached)
    state: Arc<RwLock<State>>,
    /// Whether to save on every update
    auto_save: bool,
}

impl StateManager {
    /// Create a state manager for a file that may not exist yet
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            state: Arc::new(RwLock::new(State::new())),
            auto_save: true,
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
            state: Arc::new(RwLock::new(State::new())),
            auto_save: false,
        }
    }

    /// Create a state manager from a file, loading existing state if present
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let state = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
            serde_json::from_str(&contents)
                .map_err(|e| Error::state(format!("Failed to parse state file: {e}")))?
        } else {
            State::new()
        };

        debug!("Loaded token store from {}", path.display());

        Ok(Self {
            path,
            state: Arc::new(RwLock::new(state)),
            auto_save: true,
        })
    }

    /// Reload state from file
    pub async fn load(&self) -> Result<()> {
        if self.is_in_memory() || !self.path.exists() {
            return Ok(());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;
        let loaded: State = serde_json::from_str(&contents)
            .map_err(|e| Error::state(format!("Failed to parse state file: {e}")))?;

        *self.state.write().await = loaded;
        Ok(())
    }

    /// Save current state to file
    pub async fn save(&self) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = self.to_json_pretty().await?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Error::state(format!("Failed to create state directory: {e}")))?;
        }

        // Write to temp file first, then rename
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

        debug!("Saved token store to {}", self.path.display());
        Ok(())
    }

    /// Get a read lock on the current state
    pub async fn state(&self) -> tokio::sync::RwLockReadGuard<'_, State> {
        self.state.read().await
    }

    /// Export state as pretty-printed JSON string
    pub async fn to_json_pretty(&self) -> Result<String> {
        let state = self.state.read().await;
        serde_json::to_string_pretty(&*state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))
    }

    /// Saved token for an operation
    pub async fn get_token(&self, operation: &str) -> Option<String> {
        let state = self.state.read().await;
        state.get_token(operation).map(ToString::to_string)
    }

    /// Record where an operation stopped; `None` marks it finished
    pub async fn set_token(&self, operation: &str, token: Option<String>) -> Result<()> {
        self.state.write().await.set_token(operation, token);

        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }

    /// Forget an operation entirely
    pub async fn clear_operation(&self, operation: &str) -> Result<()> {
        self.state.write().await.operations.remove(operation);

        if self.auto_save {
            self.save().await?;
        }
        Ok(())
    }

    /// Get the state file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if using in-memory mode
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str().is_empty()
    }
}

impl Clone for StateManager {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            state: Arc::clone(&self.state),
            auto_save: self.auto_save,
        }
    }
}
