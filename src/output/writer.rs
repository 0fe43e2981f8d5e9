//! Parquet destination
//!
//! Buffers rows per table and writes one `<table>.parquet` file per table
//! when the sync finishes.

use super::batch::{infer_row_schema, rows_to_batch};
use super::destination::Destination;
use super::schema::TableSchema;
use crate::error::{Error, Result};
use crate::state::SyncState;
use crate::types::JsonObject;
use arrow::datatypes::Schema;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::info;

/// Configuration for Parquet output
#[derive(Debug, Clone)]
pub struct ParquetWriterConfig {
    compression: Compression,
    row_group_size: usize,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Use no compression
    #[must_use]
    pub fn uncompressed(mut self) -> Self {
        self.compression = Compression::UNCOMPRESSED;
        self
    }

    fn build_properties(&self) -> WriterProperties {
        WriterProperties::builder()
            .set_compression(self.compression)
            .set_max_row_group_size(self.row_group_size)
            .build()
    }
}

/// Write a single RecordBatch to a Parquet file, returning the row count
pub fn write_batch_to_parquet(
    path: impl AsRef<Path>,
    batch: &RecordBatch,
    config: &ParquetWriterConfig,
) -> Result<usize> {
    let file = File::create(path.as_ref()).map_err(|e| Error::Output {
        message: format!("Failed to create file: {e}"),
    })?;

    let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(config.build_properties()))
        .map_err(|e| Error::Output {
            message: format!("Failed to create Parquet writer: {e}"),
        })?;

    writer.write(batch).map_err(|e| Error::Output {
        message: format!("Failed to write batch: {e}"),
    })?;
    writer.close().map_err(|e| Error::Output {
        message: format!("Failed to close Parquet writer: {e}"),
    })?;

    Ok(batch.num_rows())
}

/// Buffers rows and writes them as Parquet files on `finish`
pub struct ParquetDestination {
    dir: PathBuf,
    config: ParquetWriterConfig,
    primary_keys: BTreeMap<String, [String; 2]>,
    tables: BTreeMap<String, Vec<JsonObject>>,
    state: Option<SyncState>,
}

impl ParquetDestination {
    /// Write tables into `dir`, creating it if needed
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            config: ParquetWriterConfig::default(),
            primary_keys: BTreeMap::new(),
            tables: BTreeMap::new(),
            state: None,
        }
    }

    /// Use a custom writer configuration
    #[must_use]
    pub fn with_config(mut self, config: ParquetWriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a table so its primary key columns lead the file schema
    #[must_use]
    pub fn with_table(mut self, schema: &TableSchema) -> Self {
        self.primary_keys
            .insert(schema.table.clone(), schema.primary_key.clone());
        self
    }

    /// Path of the file a table is written to
    pub fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{table}.parquet"))
    }

    /// Last checkpointed state
    pub fn state(&self) -> Option<&SyncState> {
        self.state.as_ref()
    }

    fn table_schema(&self, table: &str, rows: &[JsonObject]) -> Schema {
        let leading: Vec<&str> = self
            .primary_keys
            .get(table)
            .map(|pk| pk.iter().map(String::as_str).collect())
            .unwrap_or_default();
        infer_row_schema(rows, &leading)
    }
}

impl Destination for ParquetDestination {
    fn upsert(&mut self, table: &str, row: JsonObject) -> Result<()> {
        self.tables.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    fn checkpoint(&mut self, state: &SyncState) -> Result<()> {
        self.state = Some(state.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        if self.tables.is_empty() {
            return Ok(());
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            Error::output(format!("Failed to create {}: {e}", self.dir.display()))
        })?;

        for (table, rows) in &self.tables {
            let schema = self.table_schema(table, rows);
            let batch = rows_to_batch(rows, &schema)?;
            let path = self.table_path(table);
            let written = write_batch_to_parquet(&path, &batch, &self.config)?;
            info!("Wrote {} rows to {}", written, path.display());
        }

        self.tables.clear();
        Ok(())
    }
}

