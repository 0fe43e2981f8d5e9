//! CLI commands and argument parsing

use crate::config::ConnectorKind;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Bright Data connector CLI
#[derive(Parser, Debug)]
#[command(name = "brightsync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connector to run
    #[arg(short, long, global = true, value_enum)]
    pub connector: Option<ConnectorKind>,

    /// Configuration file (JSON or YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Inline config JSON
    #[arg(long, global = true)]
    pub config_json: Option<String>,

    /// State file (JSON)
    #[arg(short, long, global = true)]
    pub state: Option<PathBuf>,

    /// Inline state JSON
    #[arg(long, global = true)]
    pub state_json: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List built-in connectors
    List,

    /// Show the destination table of a connector
    Schema,

    /// Validate configuration without calling the API
    Check,

    /// Run a sync and emit rows and state
    Sync {
        /// Output destination: a file for json, a directory for parquet
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "json")]
        format: OutputFormat,

        /// Fields catalog to update with the columns seen
        #[arg(long)]
        fields_file: Option<PathBuf>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Parquet files, one per table
    Parquet,
}
