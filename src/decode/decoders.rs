//! Decoder implementations
//!
//! The vendor answers in several shapes depending on endpoint and format:
//! a JSON array, a single object, JSON Lines, or JSON encoded inside a JSON
//! string. [`AutoDecoder`] recognizes all of them.

use super::types::{DecodeMode, RecordDecoder, MAX_DECODE_DEPTH};
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON value per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();

        for (line_num, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| {
                Error::parse(format!("invalid JSON Lines at line {}: {e}", line_num + 1))
            })?;

            records.push(value);
        }

        Ok(records)
    }
}

// ============================================================================
// Auto Decoder
// ============================================================================

/// Shape-sniffing decoder for vendor responses
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoDecoder {
    mode: DecodeMode,
}

impl AutoDecoder {
    /// Decoder that rejects unrecognized bodies
    pub fn strict() -> Self {
        Self {
            mode: DecodeMode::Strict,
        }
    }

    /// Decoder that keeps unrecognized bodies as a single string record
    pub fn lenient() -> Self {
        Self {
            mode: DecodeMode::Lenient,
        }
    }

    /// The configured mode
    pub fn mode(&self) -> DecodeMode {
        self.mode
    }

    /// Decode an already parsed value (e.g. a `data` field)
    pub fn decode_value(&self, value: Value) -> Result<Vec<Value>> {
        self.value_records(value, 0)
    }

    fn text_records(&self, text: &str, depth: usize) -> Result<Vec<Value>> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return self.value_records(value, depth);
        }

        if let Ok(records) = JsonlDecoder.decode(trimmed) {
            return Ok(records);
        }

        match self.mode {
            DecodeMode::Lenient => Ok(vec![Value::String(text.to_string())]),
            DecodeMode::Strict => Err(Error::parse(preview(trimmed))),
        }
    }

    fn value_records(&self, value: Value, depth: usize) -> Result<Vec<Value>> {
        match value {
            Value::Null => Ok(Vec::new()),
            Value::Array(items) => Ok(items.into_iter().filter(|v| !v.is_null()).collect()),
            Value::Object(_) => Ok(vec![value]),
            Value::String(text) if depth < MAX_DECODE_DEPTH => self.text_records(&text, depth + 1),
            other if self.mode == DecodeMode::Lenient => Ok(vec![other]),
            other => Err(Error::parse(preview(&other.to_string()))),
        }
    }
}

impl RecordDecoder for AutoDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        self.text_records(body, 0)
    }
}

/// Shorten a body for error messages
fn preview(text: &str) -> String {
    const LIMIT: usize = 120;
    match text.char_indices().nth(LIMIT) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
