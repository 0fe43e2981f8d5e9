//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use crate::error::Result;
use serde_json::Value;

/// Maximum number of times a JSON string is unwrapped as encoded JSON
pub const MAX_DECODE_DEPTH: usize = 4;

/// How unrecognized bodies are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeMode {
    /// Unrecognized bodies are a parse error
    #[default]
    Strict,
    /// Unrecognized bodies become a single string record
    Lenient,
}

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode a response body into individual records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;
}
