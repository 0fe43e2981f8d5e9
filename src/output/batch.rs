//! Flat rows to Arrow conversion
//!
//! Rows produced by the flattener only hold scalars, so each column maps to
//! one of Int64, Float64, Boolean or Utf8. Columns with mixed types fall back
//! to Utf8.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use arrow::array::{ArrayRef, BooleanArray, Float64Array, Int64Array, NullArray, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Infer an Arrow schema for flat rows
///
/// `leading` columns (the primary key) come first, the rest are sorted.
pub fn infer_row_schema(rows: &[JsonObject], leading: &[&str]) -> Schema {
    let mut column_types: BTreeMap<&str, DataType> = BTreeMap::new();

    for row in rows {
        for (key, value) in row {
            let inferred = infer_type(value);
            column_types
                .entry(key.as_str())
                .and_modify(|existing| *existing = merge_types(existing, &inferred))
                .or_insert(inferred);
        }
    }

    let mut fields = Vec::with_capacity(column_types.len());
    for name in leading {
        if let Some(dtype) = column_types.remove(name) {
            fields.push(Field::new(*name, dtype, true));
        }
    }
    fields.extend(
        column_types
            .into_iter()
            .map(|(name, dtype)| Field::new(name, dtype, true)),
    );

    Schema::new(fields)
}

/// Convert flat rows into a RecordBatch with the given schema
pub fn rows_to_batch(rows: &[JsonObject], schema: &Schema) -> Result<RecordBatch> {
    let schema = Arc::new(schema.clone());
    if rows.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let columns = schema
        .fields()
        .iter()
        .map(|field| {
            let values: Vec<Option<&Value>> =
                rows.iter().map(|row| row.get(field.name())).collect();
            build_array(&values, field.data_type())
        })
        .collect::<Result<Vec<_>>>()?;

    RecordBatch::try_new(schema, columns)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) if n.is_i64() => DataType::Int64,
        Value::Number(_) => DataType::Float64,
        _ => DataType::Utf8,
    }
}

fn merge_types(existing: &DataType, other: &DataType) -> DataType {
    match (existing, other) {
        (a, b) if a == b => a.clone(),
        (DataType::Null, other) | (other, DataType::Null) => other.clone(),
        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    }
}

fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),
        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }
        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }
        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }
        DataType::Utf8 => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            Ok(Arc::new(arr))
        }
        other => Err(Error::output(format!("Unsupported column type {other}"))),
    }
}
