// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # brightsync
//!
//! Connectors that pull Bright Data results into tabular destinations.
//!
//! Four connectors share one pipeline:
//!
//! - **Web Unlocker**: fetch each URL through the unblocking proxy
//! - **Web Scraper**: scrape URLs directly or through a snapshot job
//! - **SERP API**: run search queries and keep result positions
//! - **Marketplace Dataset**: filter a dataset and download the snapshot
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use brightsync::config::{ConnectorConfig, ConnectorKind};
//! use brightsync::output::MemoryDestination;
//! use brightsync::pipeline::SyncEngine;
//! use brightsync::state::SyncState;
//!
//! #[tokio::main]
//! async fn main() -> brightsync::Result<()> {
//!     let config = ConnectorConfig::parse(
//!         ConnectorKind::Unlocker,
//!         &serde_json::json!({
//!             "api_token": "...",
//!             "unlocker_url": "https://a.com,https://b.com"
//!         }),
//!     )?;
//!
//!     let mut destination = MemoryDestination::new();
//!     let report = SyncEngine::from_config(&config)?
//!         .run(SyncState::new(), &mut destination)
//!         .await?;
//!     println!("{} rows", report.rows_written);
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │        config string map → ConnectorConfig → Variant         │
//! └──────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬───────────┐
//! │  Input   │ Dispatch  │     Poll      │  Flatten  │  Output   │
//! ├──────────┼───────────┼───────────────┼───────────┼───────────┤
//! │ JSON     │ /request  │ Snapshot      │ a_b_0     │ Memory    │
//! │ Comma    │ Trigger   │ Bounded wait  │ PK columns│ JSON lines│
//! │ Newline  │ Retry     │ Ready/Failed  │ Null fill │ Parquet   │
//! └──────────┴───────────┴───────────────┴───────────┴───────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Input list normalization
pub mod input;

/// Typed connector configuration
pub mod config;

/// HTTP client with retry and backoff
pub mod http;

/// Response decoders (JSON, JSONL)
pub mod decode;

/// Request dispatch per connector
pub mod dispatch;

/// Async job polling
pub mod job;

/// JSON flattening into rows
pub mod flatten;

/// State management and checkpointing
pub mod state;

/// Destinations, table schemas and Parquet output
pub mod output;

/// Sync orchestration
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use config::{ConnectorConfig, ConnectorKind};
pub use pipeline::{SyncEngine, SyncReport};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
