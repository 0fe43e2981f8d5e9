//! Sync pipeline
//!
//! Ties dispatch, polling, flattening and the destination together into a
//! single sync run.

mod engine;
mod types;

pub use engine::{SyncEngine, LAST_FAILED_ITEMS_KEY, LAST_SYNCED_AT_KEY};
pub use types::{ItemFailure, SyncReport};

#[cfg(test)]
mod tests;
