//! Upsert/checkpoint boundary
//!
//! A [`Destination`] receives flat rows keyed by table and the state to
//! checkpoint once a sync has finished. The host runtime decides what an
//! upsert means; the implementations here cover embedding, line-delimited
//! JSON messages and Parquet files.

use crate::error::{Error, Result};
use crate::state::SyncState;
use crate::types::JsonObject;
use serde_json::json;
use std::io::Write;

/// Receiver of synced rows and state checkpoints
pub trait Destination {
    /// Upsert one row into a table
    fn upsert(&mut self, table: &str, row: JsonObject) -> Result<()>;

    /// Persist the state reached so far
    fn checkpoint(&mut self, state: &SyncState) -> Result<()>;

    /// Flush anything buffered
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Collects rows and checkpoints in memory
#[derive(Debug, Default)]
pub struct MemoryDestination {
    /// Upserted rows in arrival order
    pub rows: Vec<(String, JsonObject)>,
    /// Every checkpointed state
    pub checkpoints: Vec<SyncState>,
    /// Whether `finish` was called
    pub finished: bool,
}

impl MemoryDestination {
    /// Create an empty destination
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows written to a given table
    pub fn rows_for(&self, table: &str) -> Vec<&JsonObject> {
        self.rows
            .iter()
            .filter(|(t, _)| t == table)
            .map(|(_, row)| row)
            .collect()
    }

    /// Most recent checkpoint
    pub fn last_checkpoint(&self) -> Option<&SyncState> {
        self.checkpoints.last()
    }
}

impl Destination for MemoryDestination {
    fn upsert(&mut self, table: &str, row: JsonObject) -> Result<()> {
        self.rows.push((table.to_string(), row));
        Ok(())
    }

    fn checkpoint(&mut self, state: &SyncState) -> Result<()> {
        self.checkpoints.push(state.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// Writes RECORD and STATE messages, one JSON object per line
pub struct JsonLinesDestination<W: Write> {
    writer: W,
    records_written: usize,
}

impl<W: Write> JsonLinesDestination<W> {
    /// Wrap a writer (stdout, a file, a buffer)
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            records_written: 0,
        }
    }

    /// Number of RECORD messages written
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Recover the inner writer
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn emit(&mut self, message: &serde_json::Value) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }
}

impl<W: Write> Destination for JsonLinesDestination<W> {
    fn upsert(&mut self, table: &str, row: JsonObject) -> Result<()> {
        let emitted_at = chrono::Utc::now().timestamp_millis();
        self.emit(&json!({
            "type": "RECORD",
            "record": {
                "table": table,
                "data": row,
                "emitted_at": emitted_at
            }
        }))?;
        self.records_written += 1;
        Ok(())
    }

    fn checkpoint(&mut self, state: &SyncState) -> Result<()> {
        self.emit(&json!({
            "type": "STATE",
            "state": state
        }))
    }

    fn finish(&mut self) -> Result<()> {
        self.writer
            .flush()
            .map_err(|e| Error::output(format!("Failed to flush output: {e}")))
    }
}
