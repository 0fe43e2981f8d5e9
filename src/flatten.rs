//! JSON flattening
//!
//! Nested API results are turned into single-level rows whose keys join the
//! path with `_`, e.g. `{"a": {"b": [1]}}` becomes `{"a_b_0": 1}`.

use crate::output::TableSchema;
use crate::types::{JsonObject, JsonValue};
use serde_json::Value;

/// Separator between path segments in flattened keys
pub const SEPARATOR: char = '_';

/// Column holding non-object results verbatim
pub const RAW_RESPONSE_COLUMN: &str = "raw_response";

/// Flatten a JSON value into a single-level map of scalars.
///
/// Objects contribute `parent_key` segments and arrays contribute indices.
/// Empty nested containers are kept as `null` so the column is still seen.
/// A scalar root is returned as `{"value": scalar}`. Traversal uses an
/// explicit stack, so deeply nested payloads cannot overflow the call stack.
pub fn flatten(value: &JsonValue) -> JsonObject {
    let mut out = JsonObject::new();

    match value {
        Value::Object(_) | Value::Array(_) => {}
        scalar => {
            out.insert("value".to_string(), scalar.clone());
            return out;
        }
    }

    let mut stack: Vec<(Option<String>, &JsonValue)> = vec![(None, value)];

    while let Some((prefix, current)) = stack.pop() {
        match current {
            Value::Object(map) if !map.is_empty() => {
                for (key, child) in map {
                    stack.push((Some(join(prefix.as_deref(), key)), child));
                }
            }
            Value::Array(items) if !items.is_empty() => {
                for (idx, child) in items.iter().enumerate() {
                    stack.push((Some(join(prefix.as_deref(), &idx.to_string())), child));
                }
            }
            Value::Object(_) | Value::Array(_) => {
                if let Some(key) = prefix {
                    out.insert(key, Value::Null);
                }
            }
            scalar => {
                if let Some(key) = prefix {
                    out.insert(key, scalar.clone());
                }
            }
        }
    }

    out
}

fn join(prefix: Option<&str>, key: &str) -> String {
    match prefix {
        Some(parent) => format!("{parent}{SEPARATOR}{key}"),
        None => key.to_string(),
    }
}

/// One flattened output row, keyed by (input item, result index)
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    key_column: String,
    key: String,
    index_column: String,
    result_index: u64,
    fields: JsonObject,
}

impl ResultRecord {
    /// Build a record from a raw API result
    ///
    /// Non-object results are stored under [`RAW_RESPONSE_COLUMN`].
    pub fn new(
        schema: &TableSchema,
        key: impl Into<String>,
        result_index: u64,
        result: &JsonValue,
    ) -> Self {
        let fields = match result {
            Value::Object(_) => flatten(result),
            Value::String(text) => {
                let mut fields = JsonObject::new();
                fields.insert(RAW_RESPONSE_COLUMN.to_string(), Value::String(text.clone()));
                fields
            }
            other => {
                let mut fields = JsonObject::new();
                fields.insert(
                    RAW_RESPONSE_COLUMN.to_string(),
                    Value::String(other.to_string()),
                );
                fields
            }
        };

        Self {
            key_column: schema.key_column().to_string(),
            key: key.into(),
            index_column: schema.index_column().to_string(),
            result_index,
            fields,
        }
    }

    /// Add an extra column computed by the connector (e.g. SERP position)
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Remove fields named like a primary key column or nested under one
    ///
    /// Drops `query`, `input_query` and `query_text` alike for a `query` key.
    #[must_use]
    pub fn without_key_variants(mut self) -> Self {
        let columns = [self.key_column.as_str(), self.index_column.as_str()];
        self.fields.retain(|name, _| {
            !columns.iter().any(|column| {
                name == column
                    || name
                        .strip_suffix(column)
                        .is_some_and(|rest| rest.ends_with(SEPARATOR))
                    || name
                        .strip_prefix(column)
                        .is_some_and(|rest| rest.starts_with(SEPARATOR))
            })
        });
        self
    }

    /// The originating input item
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Zero-based index of this result within the sync
    pub fn result_index(&self) -> u64 {
        self.result_index
    }

    /// Flattened fields, without primary key columns
    pub fn fields(&self) -> &JsonObject {
        &self.fields
    }

    /// Render the row; primary key columns win over colliding fields
    pub fn to_row(&self) -> JsonObject {
        let mut row = self.fields.clone();
        row.insert(self.key_column.clone(), Value::String(self.key.clone()));
        row.insert(self.index_column.clone(), Value::from(self.result_index));
        row
    }

    /// Names of every column this row will carry
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields
            .keys()
            .map(String::as_str)
            .chain([self.key_column.as_str(), self.index_column.as_str()])
    }
}
