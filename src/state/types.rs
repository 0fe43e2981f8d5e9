//! Sync state passed between runs
//!
//! The state is an opaque JSON object owned by the caller. A sync reads the
//! value it is given and returns an updated copy; nothing is kept globally.

use crate::types::{JsonObject, JsonValue};
use serde::{Deserialize, Serialize};

/// Connector state checkpointed between syncs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SyncState(JsonObject);

impl SyncState {
    /// Create a new empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing JSON object
    pub fn from_object(object: JsonObject) -> Self {
        Self(object)
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    /// Set a value, returning the previous one
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Option<JsonValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Overlay every key of `update` onto this state
    pub fn merge(&mut self, update: JsonObject) {
        for (key, value) in update {
            self.0.insert(key, value);
        }
    }

    /// Check if the state holds no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying object
    pub fn as_object(&self) -> &JsonObject {
        &self.0
    }

    /// Convert into a JSON value
    pub fn into_value(self) -> JsonValue {
        JsonValue::Object(self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_default() {
        let state = SyncState::new();
        assert!(state.is_empty());
    }

    #[test]
    fn test_state_merge_keeps_unrelated_keys() {
        let mut state: SyncState =
            serde_json::from_value(json!({"cursor": "abc", "last_unlocker_count": 1})).unwrap();

        let mut update = JsonObject::new();
        update.insert("last_unlocker_count".to_string(), json!(5));
        state.merge(update);

        assert_eq!(state.get("cursor"), Some(&json!("abc")));
        assert_eq!(state.get("last_unlocker_count"), Some(&json!(5)));
    }

    #[test]
    fn test_state_serializes_transparently() {
        let mut state = SyncState::new();
        state.insert("last_dataset_id", "gd_123");

        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({"last_dataset_id": "gd_123"})
        );
        assert_eq!(state.into_value(), json!({"last_dataset_id": "gd_123"}));
    }
}
