//! Tests for the sync pipeline

use super::*;
use crate::config::{ConnectorConfig, ConnectorKind};
use crate::error::Error;
use crate::output::MemoryDestination;
use crate::state::SyncState;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine(kind: ConnectorKind, server: &MockServer, extra: Value) -> SyncEngine {
    let mut raw = json!({
        "api_token": "tok",
        "base_url": server.uri(),
        "max_retries": "0",
        "poll_interval_seconds": "1",
        "poll_max_attempts": "3"
    });
    if let (Value::Object(raw), Value::Object(extra)) = (&mut raw, extra) {
        raw.extend(extra);
    }
    let config = ConnectorConfig::parse(kind, &raw).unwrap();
    SyncEngine::from_config(&config).unwrap()
}

async fn mock_request(server: &MockServer, url: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path("/request"))
        .and(body_partial_json(json!({"url": url})))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_unlocker_rows_and_state() {
    let server = MockServer::start().await;
    mock_request(
        &server,
        "https://a.com",
        ResponseTemplate::new(200).set_body_json(json!({"status_code": 200, "body": "A"})),
    )
    .await;
    mock_request(
        &server,
        "https://b.com",
        ResponseTemplate::new(200).set_body_json(json!({"status_code": 200, "body": "B"})),
    )
    .await;

    let engine = engine(
        ConnectorKind::Unlocker,
        &server,
        json!({"unlocker_url": "https://a.com,https://b.com"}),
    );
    let mut destination = MemoryDestination::new();
    let report = engine
        .run(SyncState::new(), &mut destination)
        .await
        .unwrap();

    assert_eq!(report.table, "unlocker_results");
    assert_eq!(report.rows_written, 2);
    assert!(report.is_complete());

    let rows = destination.rows_for("unlocker_results");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["requested_url"], json!("https://a.com"));
    assert_eq!(rows[0]["result_index"], json!(0));
    assert_eq!(rows[0]["body"], json!("A"));
    assert_eq!(rows[1]["requested_url"], json!("https://b.com"));
    assert_eq!(rows[1]["result_index"], json!(1));

    let state = destination.last_checkpoint().unwrap();
    assert_eq!(
        state.get("last_unlocker_urls"),
        Some(&json!(["https://a.com", "https://b.com"]))
    );
    assert_eq!(state.get("last_unlocker_count"), Some(&json!(2)));
    assert!(state.get(LAST_SYNCED_AT_KEY).is_some());
    assert_eq!(state.get(LAST_FAILED_ITEMS_KEY), Some(&json!([])));
    assert!(destination.finished);
}

#[tokio::test]
async fn test_failed_item_is_recorded() {
    let server = MockServer::start().await;
    mock_request(
        &server,
        "https://a.com",
        ResponseTemplate::new(200).set_body_json(json!({"title": "A"})),
    )
    .await;
    mock_request(
        &server,
        "https://bad.com",
        ResponseTemplate::new(400).set_body_json(json!({"error": "blocked"})),
    )
    .await;

    let engine = engine(
        ConnectorKind::Unlocker,
        &server,
        json!({"unlocker_url": "https://bad.com\nhttps://a.com"}),
    );
    let mut destination = MemoryDestination::new();
    let report = engine
        .run(SyncState::new(), &mut destination)
        .await
        .unwrap();

    assert_eq!(report.rows_written, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].item, "https://bad.com");
    assert!(report.failures[0].error.contains("blocked"));

    let rows = destination.rows_for("unlocker_results");
    assert_eq!(rows[0]["requested_url"], json!("https://a.com"));
    assert_eq!(rows[0]["result_index"], json!(0));
    assert_eq!(
        report.state.get(LAST_FAILED_ITEMS_KEY),
        Some(&json!(["https://bad.com"]))
    );
}

#[tokio::test]
async fn test_all_items_failing_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({"message": "bad zone"})))
        .expect(2)
        .mount(&server)
        .await;

    let engine = engine(
        ConnectorKind::Unlocker,
        &server,
        json!({"unlocker_url": "https://a.com,https://b.com"}),
    );
    let mut destination = MemoryDestination::new();
    let err = engine
        .run(SyncState::new(), &mut destination)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Api { status: 400, .. }));
    assert!(destination.rows.is_empty());
    assert!(destination.checkpoints.is_empty());
}

#[tokio::test]
async fn test_unauthorized_aborts_sync() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid token"))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine(
        ConnectorKind::Unlocker,
        &server,
        json!({"unlocker_url": "https://a.com,https://b.com"}),
    );
    let mut destination = MemoryDestination::new();
    let err = engine
        .run(SyncState::new(), &mut destination)
        .await
        .unwrap_err();

    assert!(err.is_fatal());
    assert!(destination.checkpoints.is_empty());
}

#[tokio::test]
async fn test_serp_positions_and_columns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "First", "link": "https://one.com"},
            {"title": "Second", "snippet": "text"}
        ])))
        .mount(&server)
        .await;

    let engine = engine(
        ConnectorKind::Serp,
        &server,
        json!({"search_query": "pizza, pasta"}),
    );
    let mut destination = MemoryDestination::new();
    let report = engine
        .run(SyncState::new(), &mut destination)
        .await
        .unwrap();

    let rows = destination.rows_for("search_results");
    assert_eq!(rows.len(), 4);

    let summary: Vec<(Value, Value, Value)> = rows
        .iter()
        .map(|r| (r["query"].clone(), r["result_index"].clone(), r["position"].clone()))
        .collect();
    assert_eq!(
        summary,
        vec![
            (json!("pizza"), json!(0), json!(1)),
            (json!("pizza"), json!(1), json!(2)),
            (json!("pasta"), json!(2), json!(1)),
            (json!("pasta"), json!(3), json!(2)),
        ]
    );

    // Every row carries the union of columns
    assert_eq!(rows[0]["snippet"], Value::Null);
    assert_eq!(rows[1]["link"], Value::Null);
    assert!(report.fields.contains("snippet"));
    assert!(report.fields.contains("position"));
    assert_eq!(report.state.get("last_search_count"), Some(&json!(4)));
}

#[tokio::test]
async fn test_scrape_batch_missing_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/datasets/v3/trigger"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"snapshot_id": "s_1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/datasets/v3/snapshot/s_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "A"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let engine = engine(
        ConnectorKind::Scrape,
        &server,
        json!({"scrape_url": "https://a.com,https://b.com", "dataset_id": "gd_1"}),
    );
    let mut destination = MemoryDestination::new();
    let report = engine
        .run(SyncState::new(), &mut destination)
        .await
        .unwrap();

    let rows = destination.rows_for("scrape_results");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["url"], json!("https://a.com"));
    assert_eq!(rows[0]["title"], json!("A"));

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].item, "https://b.com");
    assert_eq!(report.state.get("last_scrape_count"), Some(&json!(1)));
}

#[tokio::test]
async fn test_dataset_sync_keeps_prior_state() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/datasets/filter"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"snapshot_id": "snap"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/datasets/v3/snapshot/snap"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("{\"name\": \"a\"}\n{\"name\": \"b\", \"price\": 3}\n"),
        )
        .mount(&server)
        .await;

    let engine = engine(
        ConnectorKind::Dataset,
        &server,
        json!({
            "dataset_id": "gd_l7",
            "filter_name": "name",
            "filter_operator": "=",
            "filter_value": "a"
        }),
    );

    let mut prior = SyncState::new();
    prior.insert("cursor", "kept");

    let mut destination = MemoryDestination::new();
    let report = engine.run(prior, &mut destination).await.unwrap();

    let rows = destination.rows_for("dataset_results");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["dataset_id"], json!("gd_l7"));
    assert_eq!(rows[1]["record_index"], json!(1));
    assert_eq!(rows[0]["price"], Value::Null);

    assert_eq!(report.state.get("cursor"), Some(&json!("kept")));
    assert_eq!(report.state.get("last_record_count"), Some(&json!(2)));
    assert_eq!(report.state.get("last_dataset_id"), Some(&json!("gd_l7")));
}

#[tokio::test]
async fn test_serp_duplicate_queries_restart_positions() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "First"},
            {"title": "Second"}
        ])))
        .expect(2)
        .mount(&server)
        .await;

    let engine = engine(
        ConnectorKind::Serp,
        &server,
        json!({"search_query": "pizza,pizza"}),
    );
    let mut destination = MemoryDestination::new();
    engine
        .run(SyncState::new(), &mut destination)
        .await
        .unwrap();

    let rows = destination.rows_for("search_results");
    let positions: Vec<Value> = rows.iter().map(|r| r["position"].clone()).collect();
    let indexes: Vec<Value> = rows.iter().map(|r| r["result_index"].clone()).collect();
    assert_eq!(positions, vec![json!(1), json!(2), json!(1), json!(2)]);
    assert_eq!(indexes, vec![json!(0), json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn test_serp_drops_nested_key_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "input": {"query": "echoed", "result_index": 9},
            "organic": [{"title": "Slice"}]
        })))
        .mount(&server)
        .await;

    let engine = engine(ConnectorKind::Serp, &server, json!({"search_query": "pizza"}));
    let mut destination = MemoryDestination::new();
    let report = engine
        .run(SyncState::new(), &mut destination)
        .await
        .unwrap();

    let rows = destination.rows_for("search_results");
    assert_eq!(rows[0]["query"], json!("pizza"));
    assert_eq!(rows[0]["organic_0_title"], json!("Slice"));
    assert!(!rows[0].contains_key("input_query"));
    assert!(!report.fields.contains("input_result_index"));
}
