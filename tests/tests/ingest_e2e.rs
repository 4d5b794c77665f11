//! End-to-end tests for the ingest endpoint.
//!
//! POST /ingest → raw_event queue row (status PENDING).
//!
//! Requires Docker for the Postgres testcontainer.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use uuid::Uuid;

use insights_core::RawEventStatus;
use insights_db::raw_events;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn test_ingest_accepts_pageview() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let event = fixtures::pageview("u1", "s1", "/home", "Home Page");
    let response = server
        .post("/ingest")
        .json(&fixtures::webhook_payload(&event))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["accepted"], true);

    // The queue row is PENDING and untouched by the worker
    let raw_event_id: Uuid =
        serde_json::from_value(body["raw_event_id"].clone()).expect("raw_event_id in response");
    let row = raw_events::fetch_raw_event(&ctx.db, raw_event_id)
        .await
        .expect("Failed to fetch raw event")
        .expect("Raw event row missing");

    assert_eq!(row.event_name, "$pageview");
    assert_eq!(row.user_id, "u1");
    assert_eq!(row.status, RawEventStatus::Pending);
    assert_eq!(row.processed_at, None);
    assert_eq!(row.session_id(), Some("s1"));
}

#[tokio::test]
async fn test_ingest_preserves_elements_chain() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let event = fixtures::autocapture_submit("u1", "s1", "/contact");
    let response = server
        .post("/ingest")
        .json(&fixtures::webhook_payload(&event))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    let body: serde_json::Value = response.json();
    let raw_event_id: Uuid = serde_json::from_value(body["raw_event_id"].clone()).unwrap();

    let row = raw_events::fetch_raw_event(&ctx.db, raw_event_id)
        .await
        .unwrap()
        .unwrap();
    assert!(row
        .elements_chain
        .as_deref()
        .unwrap()
        .contains(r#"text="Send""#));
}

#[tokio::test]
async fn test_ingest_rejects_empty_distinct_id() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server
        .post("/ingest")
        .json(&fixtures::webhook_payload_json(json!({
            "event": "$pageview",
            "distinct_id": "",
            "properties": {},
            "timestamp": "2020-01-01T00:00:00Z",
        })))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_ingest_rejects_malformed_payload() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // No "event" wrapper at all
    let response = server
        .post("/ingest")
        .json(&json!({ "something": "else" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_health_endpoints() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/health").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert!(body.get("status").is_some());

    server.get("/health/live").await.assert_status_ok();
}
