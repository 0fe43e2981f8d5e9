//! Sync engine
//!
//! Orchestrates a sync: dispatch requests, poll jobs, flatten results, upsert
//! rows and checkpoint the updated state.

use super::types::{ItemFailure, SyncReport};
use crate::config::ConnectorConfig;
use crate::dispatch::{build_variant, Association, DispatchMode, Dispatcher, Variant};
use crate::error::{Error, Result};
use crate::flatten::ResultRecord;
use crate::http::HttpClient;
use crate::output::{Destination, TableSchema};
use crate::state::SyncState;
use crate::types::{JsonObject, JsonValue};
use serde_json::{json, Value};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// State key holding the time of the last completed sync
pub const LAST_SYNCED_AT_KEY: &str = "last_synced_at";

/// State key holding the items that failed in the last sync
pub const LAST_FAILED_ITEMS_KEY: &str = "last_failed_items";

/// Runs one connector sync
pub struct SyncEngine {
    client: HttpClient,
    variant: Box<dyn Variant>,
}

impl SyncEngine {
    /// Create an engine from a client and a variant
    pub fn new(client: HttpClient, variant: Box<dyn Variant>) -> Self {
        Self { client, variant }
    }

    /// Create an engine for a parsed configuration
    pub fn from_config(config: &ConnectorConfig) -> Result<Self> {
        let client = HttpClient::new(config.http_client_config())?;
        Ok(Self::new(client, build_variant(config)))
    }

    /// The variant being synced
    pub fn variant(&self) -> &dyn Variant {
        self.variant.as_ref()
    }

    /// Run the sync
    ///
    /// Per-item failures are recorded in the report and do not stop the sync;
    /// fatal errors (configuration, authentication) abort it. If every item
    /// failed, the last error is returned and nothing is checkpointed.
    pub async fn run(
        &self,
        mut state: SyncState,
        destination: &mut dyn Destination,
    ) -> Result<SyncReport> {
        let variant = self.variant.as_ref();
        let dispatcher = Dispatcher::new(&self.client);
        let items = variant.items();
        let mut rows = RowCollector::new(variant);
        let mut failures = Vec::new();

        info!(
            "Starting {} sync for {} item(s)",
            variant.kind(),
            items.len()
        );

        match variant.mode() {
            DispatchMode::PerItem => {
                let mut last_error = None;

                for item in items {
                    match dispatcher.send(variant, item).await {
                        Ok(records) => rows.push_all(item, records),
                        Err(e) if e.is_fatal() => return Err(e),
                        Err(e) => {
                            warn!("Request for {} failed: {}", item, e);
                            failures.push(ItemFailure {
                                item: item.clone(),
                                error: e.to_string(),
                            });
                            last_error = Some(e);
                        }
                    }
                }

                if failures.len() == items.len() {
                    if let Some(e) = last_error {
                        return Err(e);
                    }
                }
            }
            DispatchMode::Batch => {
                let mut job = dispatcher.submit(variant).await?;
                let records = dispatcher.collect(variant, &mut job).await?;
                failures = rows.associate(&job.items, records);
            }
        }

        let table = variant.table().table;
        let fields = rows.fields();
        let row_count = rows.len();
        for row in rows.into_rows(&fields) {
            destination.upsert(&table, row)?;
        }

        state.merge(variant.state_update(row_count as u64));
        state.insert(LAST_SYNCED_AT_KEY, chrono::Utc::now().to_rfc3339());
        state.insert(
            LAST_FAILED_ITEMS_KEY,
            Value::Array(failures.iter().map(|f| json!(f.item)).collect()),
        );
        destination.checkpoint(&state)?;
        destination.finish()?;

        info!(
            "{} sync complete: {} row(s), {} failed item(s)",
            variant.kind(),
            row_count,
            failures.len()
        );

        Ok(SyncReport {
            table,
            rows_written: row_count,
            failures,
            fields,
            state,
        })
    }
}

/// Accumulates flattened rows, assigning the sync-wide result index
struct RowCollector<'v> {
    variant: &'v dyn Variant,
    schema: TableSchema,
    records: Vec<ResultRecord>,
}

impl<'v> RowCollector<'v> {
    fn new(variant: &'v dyn Variant) -> Self {
        Self {
            variant,
            schema: variant.table(),
            records: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.records.len()
    }

    /// Add every result returned by one request; positions restart at zero
    fn push_all(&mut self, item: &str, results: Vec<JsonValue>) {
        let mut position = 0;
        for result in results {
            self.push(item, result, &mut position);
        }
    }

    /// Add one result; a list result yields one row per element
    fn push(&mut self, item: &str, result: JsonValue, position: &mut usize) {
        match result {
            Value::Array(elements) => {
                for element in elements.into_iter().filter(|v| !v.is_null()) {
                    self.push_one(item, &element, position);
                }
            }
            other => self.push_one(item, &other, position),
        }
    }

    fn push_one(&mut self, item: &str, result: &JsonValue, position: &mut usize) {
        let mut record = ResultRecord::new(&self.schema, item, self.records.len() as u64, result);
        if self.variant.strips_key_variants() {
            record = record.without_key_variants();
        }
        for (name, value) in self.variant.extra_fields(*position) {
            record = record.with_field(name, value);
        }
        *position += 1;
        self.records.push(record);
    }

    /// Map batch results back to items, returning items left without a result
    fn associate(&mut self, items: &[String], results: Vec<JsonValue>) -> Vec<ItemFailure> {
        match self.variant.association() {
            Association::Constant(key) => {
                self.push_all(&key, results);
                Vec::new()
            }
            Association::Positional => {
                if items.is_empty() {
                    return Vec::new();
                }
                if results.len() != items.len() {
                    warn!(
                        "Job returned {} result(s) for {} item(s); assigning by position",
                        results.len(),
                        items.len()
                    );
                }

                let answered = results.len();
                for (idx, result) in results.into_iter().enumerate() {
                    let item = &items[idx % items.len()];
                    self.push(item, result, &mut 0);
                }

                items
                    .iter()
                    .skip(answered)
                    .map(|item| ItemFailure {
                        item: item.clone(),
                        error: Error::dispatch("job returned no result for this item").to_string(),
                    })
                    .collect()
            }
        }
    }

    /// Union of every column across rows
    fn fields(&self) -> BTreeSet<String> {
        self.records
            .iter()
            .flat_map(|r| r.columns().map(String::from))
            .collect()
    }

    /// Render rows carrying every column, missing ones as null
    fn into_rows(self, fields: &BTreeSet<String>) -> Vec<JsonObject> {
        self.records
            .into_iter()
            .map(|record| {
                let mut row = record.to_row();
                for field in fields {
                    row.entry(field.clone()).or_insert(Value::Null);
                }
                row
            })
            .collect()
    }
}
