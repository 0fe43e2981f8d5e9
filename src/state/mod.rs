//! State management module
//!
//! The sync state is an opaque value read once at the start of a sync and
//! returned, updated, at the end. It is threaded explicitly through the
//! pipeline.
//!
//! # Overview
//!
//! - `SyncState` - the opaque state object
//! - `StateManager` - JSON file persistence for CLI use

mod manager;
mod types;

pub use manager::StateManager;
pub use types::SyncState;

#[cfg(test)]
mod manager_tests;
