//! Variant strategy abstraction
//!
//! One pipeline drives all connectors; a [`Variant`] supplies everything that
//! differs between them.

use crate::config::ConnectorKind;
use crate::decode::DecodeMode;
use crate::error::{Error, Result};
use crate::http::Endpoint;
use crate::job::PollPolicy;
use crate::output::TableSchema;
use crate::types::{JsonObject, JsonValue};

/// How a connector talks to the vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    /// One synchronous request per input item
    PerItem,
    /// One job for all items, polled until ready
    Batch,
}

/// How batch results are mapped back to input items
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    /// Result `i` belongs to `items[i % items.len()]`
    Positional,
    /// Every result belongs to the same key
    Constant(String),
}

/// Connector-specific behaviour plugged into the shared pipeline
pub trait Variant: Send + Sync {
    /// Which connector this is
    fn kind(&self) -> ConnectorKind;

    /// Destination table
    fn table(&self) -> TableSchema {
        self.kind().table_schema()
    }

    /// Normalized input items
    fn items(&self) -> &[String];

    /// Per-item requests or one batch job
    fn mode(&self) -> DispatchMode;

    /// How response bodies that are not JSON are treated
    fn decode_mode(&self) -> DecodeMode {
        DecodeMode::Strict
    }

    /// Request for a single item
    fn item_endpoint(&self, _item: &str) -> Result<Endpoint> {
        Err(Error::dispatch(format!(
            "{} does not send per-item requests",
            self.kind()
        )))
    }

    /// Request that starts a batch job
    fn trigger_endpoint(&self) -> Result<Endpoint> {
        Err(Error::dispatch(format!(
            "{} does not start batch jobs",
            self.kind()
        )))
    }

    /// Field of the trigger response holding the job id
    fn job_id_field(&self) -> &str {
        "snapshot_id"
    }

    /// Status endpoint for a submitted job
    fn poll_endpoint(&self, job_id: &str) -> Endpoint {
        Endpoint::get(format!("datasets/v3/snapshot/{job_id}")).query("format", "json")
    }

    /// Polling interval and budget
    fn poll_policy(&self) -> PollPolicy {
        PollPolicy::SCRAPE
    }

    /// How batch results map back to items
    fn association(&self) -> Association {
        Association::Positional
    }

    /// Reshape a decoded record before it is flattened
    fn prepare(&self, record: JsonValue) -> JsonValue {
        record
    }

    /// Drop flattened fields that look like nested primary key columns
    fn strips_key_variants(&self) -> bool {
        false
    }

    /// Extra columns for the `position`-th result of an item (zero-based)
    fn extra_fields(&self, _position: usize) -> JsonObject {
        JsonObject::new()
    }

    /// State keys recorded after a sync that produced `row_count` rows
    fn state_update(&self, row_count: u64) -> JsonObject;
}
