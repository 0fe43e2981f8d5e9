//! Output module
//!
//! The boundary between the sync pipeline and whatever stores its rows.
//!
//! # Overview
//!
//! This module provides:
//! - Table declarations (primary keys only) and the discovered-fields catalog
//! - The `Destination` trait with in-memory, JSON Lines and Parquet sinks
//! - Conversion of flat rows into Arrow RecordBatches

mod batch;
mod destination;
mod schema;
mod writer;

pub use batch::{infer_row_schema, rows_to_batch};
pub use destination::{Destination, JsonLinesDestination, MemoryDestination};
pub use schema::{FieldsCatalog, TableSchema};
pub use writer::{write_batch_to_parquet, ParquetDestination, ParquetWriterConfig};
