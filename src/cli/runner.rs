//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::{ConnectorConfig, ConnectorKind};
use crate::error::{Error, Result};
use crate::output::{Destination, FieldsCatalog, JsonLinesDestination, ParquetDestination};
use crate::pipeline::{SyncEngine, SyncReport};
use crate::state::{StateManager, SyncState};
use serde_json::{json, Value};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Default directory for Parquet output
const DEFAULT_PARQUET_DIR: &str = "output";

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::List => self.list_connectors(),
            Commands::Schema => self.schema(),
            Commands::Check => self.check(),
            Commands::Sync {
                output,
                format,
                fields_file,
            } => {
                self.sync(output.as_deref(), *format, fields_file.as_deref())
                    .await
            }
        }
    }

    /// Selected connector
    fn connector(&self) -> Result<ConnectorKind> {
        self.cli
            .connector
            .ok_or_else(|| Error::config("Connector not specified (use -c flag)"))
    }

    /// Load configuration; inline JSON takes precedence over the file
    fn load_config(&self) -> Result<ConnectorConfig> {
        let kind = self.connector()?;

        if let Some(json_str) = &self.cli.config_json {
            return ConnectorConfig::from_json_str(kind, json_str);
        }
        if let Some(path) = &self.cli.config {
            return ConnectorConfig::from_file(kind, path);
        }

        Err(Error::config(
            "Configuration not specified (use --config or --config-json)",
        ))
    }

    /// Load state; inline state takes precedence over the state file
    async fn load_state(&self) -> Result<SyncState> {
        if let Some(state_json) = &self.cli.state_json {
            StateManager::parse(state_json)
        } else if let Some(path) = &self.cli.state {
            StateManager::new(path).load().await
        } else {
            Ok(SyncState::new())
        }
    }

    fn list_connectors(&self) -> Result<()> {
        let connectors: Vec<Value> = ConnectorKind::all()
            .into_iter()
            .map(|kind| {
                let schema = kind.table_schema();
                json!({
                    "name": kind.name(),
                    "description": kind.description(),
                    "table": schema.table,
                    "primary_key": schema.primary_key
                })
            })
            .collect();

        self.output_message(&json!({
            "type": "CONNECTORS",
            "connectors": connectors
        }));
        Ok(())
    }

    fn schema(&self) -> Result<()> {
        let kind = self.connector()?;
        let schema = kind.table_schema();

        self.output_message(&json!({
            "type": "SCHEMA",
            "schema": {
                "connector": kind.name(),
                "table": schema.table,
                "primary_key": schema.primary_key
            }
        }));
        Ok(())
    }

    /// Validate configuration; no request is sent
    fn check(&self) -> Result<()> {
        let status = match self.load_config() {
            Ok(config) => json!({
                "status": "SUCCEEDED",
                "message": format!("{} configuration is valid", config.kind)
            }),
            Err(e) => json!({
                "status": "FAILED",
                "message": format!("Invalid configuration: {e}")
            }),
        };

        self.output_message(&json!({
            "type": "CONNECTION_STATUS",
            "connectionStatus": status
        }));
        Ok(())
    }

    async fn sync(
        &self,
        output: Option<&Path>,
        format: OutputFormat,
        fields_file: Option<&Path>,
    ) -> Result<()> {
        let config = self.load_config()?;
        let state = self.load_state().await?;
        let engine = SyncEngine::from_config(&config)?;

        let mut destination = Self::build_destination(&config, output, format)?;
        let report = engine.run(state, destination.as_mut()).await?;

        if let Some(path) = fields_file {
            let mut catalog = FieldsCatalog::load(path)?;
            catalog.merge(&report.table, report.fields.iter().cloned());
            catalog.save(path)?;
            info!("Updated fields catalog {}", path.display());
        }

        if let Some(path) = &self.cli.state {
            StateManager::new(path).save(&report.state).await?;
            info!("Saved state to {}", path.display());
        }

        self.log_report(&report, format, output);
        Ok(())
    }

    fn build_destination(
        config: &ConnectorConfig,
        output: Option<&Path>,
        format: OutputFormat,
    ) -> Result<Box<dyn Destination>> {
        match format {
            OutputFormat::Json => {
                let writer: Box<dyn Write> = match output {
                    Some(path) => {
                        let file = File::create(path).map_err(|e| {
                            Error::output(format!("Failed to create {}: {e}", path.display()))
                        })?;
                        Box::new(BufWriter::new(file))
                    }
                    None => Box::new(BufWriter::new(io::stdout())),
                };
                Ok(Box::new(JsonLinesDestination::new(writer)))
            }
            OutputFormat::Parquet => {
                let dir = output.unwrap_or_else(|| Path::new(DEFAULT_PARQUET_DIR));
                Ok(Box::new(
                    ParquetDestination::new(dir).with_table(&config.kind.table_schema()),
                ))
            }
        }
    }

    /// Summarize the sync; stdout stays reserved for records in JSON mode
    fn log_report(&self, report: &SyncReport, format: OutputFormat, output: Option<&Path>) {
        let message = json!({
            "type": "LOG",
            "log": {
                "level": if report.is_complete() { "INFO" } else { "WARN" },
                "message": format!(
                    "Synced {} row(s) into {} with {} failed item(s)",
                    report.rows_written,
                    report.table,
                    report.failures.len()
                ),
                "failures": report.failures
            }
        });

        if format == OutputFormat::Json && output.is_none() {
            eprintln!("{}", serde_json::to_string(&message).unwrap_or_default());
        } else {
            self.output_message(&message);
        }
    }

    fn output_message(&self, msg: &Value) {
        if self.cli.verbose {
            println!("{}", serde_json::to_string_pretty(msg).unwrap_or_default());
        } else {
            println!("{}", serde_json::to_string(msg).unwrap_or_default());
        }
    }
}
