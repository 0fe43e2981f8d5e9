//! State file persistence
//!
//! Loads and saves [`SyncState`] as JSON with atomic writes.

use super::types::SyncState;
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Reads and writes the state file used by the CLI
#[derive(Debug, Clone)]
pub struct StateManager {
    /// Path to the state file (empty for in-memory mode)
    path: PathBuf,
}

impl StateManager {
    /// Create a state manager backed by the given file
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Create an in-memory state manager (no file persistence)
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::new(),
        }
    }

    /// Parse state from an inline JSON string
    pub fn parse(json: &str) -> Result<SyncState> {
        if json.trim().is_empty() {
            return Ok(SyncState::new());
        }
        serde_json::from_str(json).map_err(|e| Error::state(format!("Failed to parse state JSON: {e}")))
    }

    /// Load state from file; a missing file yields an empty state
    pub async fn load(&self) -> Result<SyncState> {
        if self.is_in_memory() || !self.path.exists() {
            return Ok(SyncState::new());
        }

        let contents = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to read state file: {e}")))?;

        Self::parse(&contents)
    }

    /// Save state to file
    pub async fn save(&self, state: &SyncState) -> Result<()> {
        if self.is_in_memory() {
            return Ok(());
        }

        let contents = serde_json::to_string_pretty(state)
            .map_err(|e| Error::state(format!("Failed to serialize state: {e}")))?;

        // Write to temp file first, then rename for atomicity
        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::state(format!("Failed to write state file: {e}")))?;

        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| Error::state(format!("Failed to rename state file: {e}")))?;

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
