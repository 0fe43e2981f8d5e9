//! Sync outcome types

use crate::state::SyncState;
use serde::Serialize;
use std::collections::BTreeSet;

/// An input item whose request failed without aborting the sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFailure {
    /// The URL, query or dataset id
    pub item: String,
    /// Why it failed
    pub error: String,
}

/// Summary of a completed sync
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncReport {
    /// Destination table
    pub table: String,
    /// Rows upserted
    pub rows_written: usize,
    /// Items that produced no rows because of an error
    pub failures: Vec<ItemFailure>,
    /// Every column observed across the written rows
    pub fields: BTreeSet<String>,
    /// State checkpointed at the end of the sync
    pub state: SyncState,
}

impl SyncReport {
    /// Check if every item succeeded
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}
