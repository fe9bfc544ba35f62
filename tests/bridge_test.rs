//! Integration tests for the bridge HTTP surface against a file-backed
//! SQLite database.

use db_bridge::config::DatabaseStatus;
use db_bridge::server::{BridgeServer, BridgeState};
use reqwest::StatusCode;
use serde_json::{Value as JsonValue, json};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Start a bridge on an ephemeral port. Returns its base URL.
async fn spawn_bridge(database: DatabaseStatus) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let state = BridgeState::new(database, Duration::from_secs(5), Duration::from_secs(5));
    let server = BridgeServer::new(state.into_shared(), "127.0.0.1", addr.port());
    tokio::spawn(async move { server.serve(listener, std::future::pending()).await });
    format!("http://{addr}")
}

/// Bridge pointed at a fresh SQLite file. Keep the `TempDir` alive for the
/// duration of the test.
async fn sqlite_bridge() -> (String, TempDir) {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}?mode=rwc", dir.path().join("bridge.db").display());
    let base = spawn_bridge(DatabaseStatus::from_setting(Some(&url))).await;
    (base, dir)
}

async fn post_query(base: &str, body: JsonValue) -> (StatusCode, JsonValue) {
    let response = reqwest::Client::new()
        .post(format!("{base}/query"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn get_schema(base: &str) -> (StatusCode, JsonValue) {
    let response = reqwest::get(format!("{base}/schema")).await.unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

async fn seed(base: &str) {
    for sql in [
        "CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT NOT NULL, score REAL, active BOOLEAN)",
        "CREATE TABLE orders (order_id INTEGER NOT NULL, user_id INTEGER, note TEXT)",
    ] {
        let (status, body) = post_query(base, json!({ "query": sql })).await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }
    for (id, name, score, active) in [(1, "alice", 9.5, true), (2, "bob", 7.0, false)] {
        let (status, _) = post_query(
            base,
            json!({
                "query": "INSERT INTO users (id, name, score, active) VALUES (?, ?, ?, ?)",
                "params": [id, name, score, active],
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn test_health_without_database() {
    let base = spawn_bridge(DatabaseStatus::Missing).await;
    let response = reqwest::get(format!("{base}/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: JsonValue = response.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_unconfigured_schema_is_server_error() {
    let base = spawn_bridge(DatabaseStatus::Missing).await;
    let (status, body) = get_schema(&base).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn test_unconfigured_query_checked_before_body() {
    let base = spawn_bridge(DatabaseStatus::Missing).await;
    let (status, body) = post_query(&base, json!({ "not_query": 1 })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("not configured"));
}

#[tokio::test]
async fn test_invalid_setting_reported() {
    let base = spawn_bridge(DatabaseStatus::from_setting(Some("oracle://db:1521/x"))).await;
    let (status, body) = get_schema(&base).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("misconfigured"));
}

#[tokio::test]
async fn test_statement_without_result_set_acknowledged() {
    let (base, _dir) = sqlite_bridge().await;
    let (status, body) = post_query(&base, json!({ "query": "CREATE TABLE t (x INTEGER)" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "results": [], "message": "Query executed successfully" })
    );
}

#[tokio::test]
async fn test_select_returns_typed_rows_in_order() {
    let (base, _dir) = sqlite_bridge().await;
    seed(&base).await;

    let (status, body) = post_query(
        &base,
        json!({ "query": "SELECT id, name, score, active FROM users ORDER BY id" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("message").is_none());
    assert_eq!(
        body["results"],
        json!([
            { "id": 1, "name": "alice", "score": 9.5, "active": true },
            { "id": 2, "name": "bob", "score": 7.0, "active": false },
        ])
    );

    let columns: Vec<&String> = body["results"][0].as_object().unwrap().keys().collect();
    assert_eq!(columns, ["id", "name", "score", "active"]);
}

#[tokio::test]
async fn test_select_with_params_and_no_match() {
    let (base, _dir) = sqlite_bridge().await;
    seed(&base).await;

    let (status, body) = post_query(
        &base,
        json!({ "query": "SELECT name FROM users WHERE id = ?", "params": [2] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([{ "name": "bob" }]));

    let (status, body) = post_query(
        &base,
        json!({ "query": "SELECT name FROM users WHERE id = ?", "params": [99] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "results": [] }));
}

#[tokio::test]
async fn test_null_and_blob_values() {
    let (base, _dir) = sqlite_bridge().await;
    let (status, body) = post_query(
        &base,
        json!({ "query": "SELECT NULL AS nothing, X'DEADBEEF' AS raw" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!([{ "nothing": null, "raw": "3q2+7w==" }]));
}

#[tokio::test]
async fn test_malformed_sql_is_client_error() {
    let (base, _dir) = sqlite_bridge().await;
    let (status, body) = post_query(&base, json!({ "query": "SELEC * FROM users" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("syntax error"));
}

#[tokio::test]
async fn test_missing_table_is_client_error() {
    let (base, _dir) = sqlite_bridge().await;
    let (status, body) = post_query(&base, json!({ "query": "SELECT * FROM nowhere" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("no such table"));
}

#[tokio::test]
async fn test_malformed_body_is_unprocessable() {
    let (base, _dir) = sqlite_bridge().await;
    let (status, body) = post_query(&base, json!({ "sql": "SELECT 1" })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("query"));
}

#[tokio::test]
async fn test_mutating_statement_is_not_blocked() {
    let (base, _dir) = sqlite_bridge().await;
    seed(&base).await;

    let (status, body) = post_query(&base, json!({ "query": "DELETE FROM users WHERE id = 1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Query executed successfully");

    let (_, body) = post_query(&base, json!({ "query": "SELECT COUNT(*) AS n FROM users" })).await;
    assert_eq!(body["results"], json!([{ "n": 1 }]));
}

#[tokio::test]
async fn test_schema_lists_tables_and_columns() {
    let (base, _dir) = sqlite_bridge().await;
    seed(&base).await;

    let (status, body) = get_schema(&base).await;
    assert_eq!(status, StatusCode::OK);

    let schema = body["schema"].as_object().unwrap();
    let tables: Vec<&String> = schema.keys().collect();
    assert_eq!(tables, ["users", "orders"]);

    assert_eq!(
        body["schema"]["orders"],
        json!([
            { "column_name": "order_id", "data_type": "INTEGER", "is_nullable": false },
            { "column_name": "user_id", "data_type": "INTEGER", "is_nullable": true },
            { "column_name": "note", "data_type": "TEXT", "is_nullable": true },
        ])
    );
    assert_eq!(body["schema"]["users"][1]["column_name"], "name");
    assert_eq!(body["schema"]["users"][1]["is_nullable"], false);
}

#[tokio::test]
async fn test_schema_of_empty_database() {
    let (base, _dir) = sqlite_bridge().await;
    let (status, body) = get_schema(&base).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "schema": {} }));
}

#[tokio::test]
async fn test_schema_is_stable_across_calls() {
    let (base, _dir) = sqlite_bridge().await;
    seed(&base).await;

    let (_, first) = get_schema(&base).await;
    let (_, second) = get_schema(&base).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_unreachable_database() {
    let dir = TempDir::new().unwrap();
    // Missing parent directory and no create mode: opening fails.
    let url = format!("sqlite:{}", dir.path().join("absent").join("x.db").display());
    let base = spawn_bridge(DatabaseStatus::from_setting(Some(&url))).await;

    let (status, body) = get_schema(&base).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].is_string());

    let (status, body) = post_query(&base, json!({ "query": "SELECT 1" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}
