//! Table declarations and discovered-field documentation
//!
//! Only primary keys are declared up front; every other column is inferred
//! from the rows that are actually written.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Destination table declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Table name
    pub table: String,
    /// Primary key columns: input key column, then index column
    pub primary_key: [String; 2],
}

impl TableSchema {
    /// Declare a table keyed by (key column, index column)
    pub fn new(
        table: impl Into<String>,
        key_column: impl Into<String>,
        index_column: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            primary_key: [key_column.into(), index_column.into()],
        }
    }

    /// Column holding the originating input item
    pub fn key_column(&self) -> &str {
        &self.primary_key[0]
    }

    /// Column holding the zero-based result index
    pub fn index_column(&self) -> &str {
        &self.primary_key[1]
    }
}

/// Fields observed per table, persisted as YAML for documentation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldsCatalog {
    /// Table name to sorted field names
    #[serde(default)]
    pub tables: BTreeMap<String, BTreeSet<String>>,
}

impl FieldsCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog file, returning an empty catalog if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::new());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::output(format!("Failed to read {}: {e}", path.display()))
        })?;
        if contents.trim().is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Merge newly observed fields for a table
    pub fn merge<I, S>(&mut self, table: &str, fields: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tables
            .entry(table.to_string())
            .or_default()
            .extend(fields.into_iter().map(Into::into));
    }

    /// Fields known for a table
    pub fn fields(&self, table: &str) -> Option<&BTreeSet<String>> {
        self.tables.get(table)
    }

    /// Write the catalog as YAML
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let contents = serde_yaml::to_string(self)?;
        std::fs::write(path, contents).map_err(|e| {
            Error::output(format!("Failed to write {}: {e}", path.display()))
        })
    }
}
