//! CLI module
//!
//! Command-line interface for running connectors.
//!
//! # Commands
//!
//! - `list` - List built-in connectors
//! - `schema` - Show a connector's table and primary key
//! - `check` - Validate configuration
//! - `sync` - Fetch results and emit rows and state

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
