//! Response decoder module
//!
//! Supports: JSON arrays and objects, JSONL, double-encoded JSON
//!
//! # Overview
//!
//! Every vendor response is reduced to a list of individual records before
//! flattening. Empty bodies and `null` yield no records.

mod decoders;
mod types;

pub use decoders::{AutoDecoder, JsonlDecoder};
pub use types::{DecodeMode, RecordDecoder, MAX_DECODE_DEPTH};
