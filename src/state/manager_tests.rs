//! Tests for StateManager

use super::*;
use serde_json::json;
use tempfile::tempdir;

#[test]
fn test_state_manager_new() {
    let manager = StateManager::new("/tmp/test-state.json");
    assert!(!manager.is_in_memory());
    assert_eq!(manager.path().to_str().unwrap(), "/tmp/test-state.json");
}

#[test]
fn test_state_manager_in_memory() {
    let manager = StateManager::in_memory();
    assert!(manager.is_in_memory());
}

#[test]
fn test_parse_inline_state() {
    let state = StateManager::parse(r#"{"last_search_count": 3}"#).unwrap();
    assert_eq!(state.get("last_search_count"), Some(&json!(3)));

    assert!(StateManager::parse("  ").unwrap().is_empty());
    assert!(matches!(
        StateManager::parse("[1, 2]"),
        Err(crate::error::Error::State { .. })
    ));
}

#[tokio::test]
async fn test_load_missing_file_is_empty() {
    let dir = tempdir().unwrap();
    let manager = StateManager::new(dir.path().join("state.json"));

    let state = manager.load().await.unwrap();
    assert!(state.is_empty());
}

#[tokio::test]
async fn test_save_and_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let manager = StateManager::new(&path);

    let mut state = SyncState::new();
    state.insert("last_unlocker_urls", json!(["https://a.com"]));
    state.insert("last_unlocker_count", 1);
    manager.save(&state).await.unwrap();

    assert!(path.exists());
    assert!(!dir.path().join("state.tmp").exists());

    let loaded = StateManager::new(&path).load().await.unwrap();
    assert_eq!(loaded, state);
}

#[tokio::test]
async fn test_in_memory_save_is_noop() {
    let manager = StateManager::in_memory();
    let mut state = SyncState::new();
    state.insert("k", "v");

    manager.save(&state).await.unwrap();
    assert!(manager.load().await.unwrap().is_empty());
}
