//! End-to-end tests for the context endpoint.
//!
//! Ingest → worker → GET /session/context/{user_id}.
//!
//! Requires Docker for the Postgres testcontainer.

use axum::http::StatusCode;
use axum_test::TestServer;
use insights_worker::WorkerConfig;
use integration_tests::{fixtures, setup::TestContext};

#[tokio::test]
async fn test_context_for_unknown_user_is_empty() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/session/context/nobody").await;

    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();
    assert_eq!(body["user_id"], "nobody");
    assert_eq!(body["recent_events"].as_array().unwrap().len(), 0);
    assert_eq!(body["last_session_summary"], serde_json::Value::Null);
    assert_eq!(body["patterns"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_context_composite_after_processing() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    // A short frustrated journey: checkout page, then rage clicking on payment
    for event in [
        fixtures::pageview("u1", "s1", "/checkout", "Checkout"),
        fixtures::rage_click("u1", "s1", "/payment", "Pay"),
    ] {
        server
            .post("/ingest")
            .json(&fixtures::webhook_payload(&event))
            .await
            .assert_status(StatusCode::ACCEPTED);
    }

    let processed = ctx
        .worker(WorkerConfig {
            max_concurrency: 1,
            ..Default::default()
        })
        .process_batch()
        .await
        .unwrap();
    assert_eq!(processed, 2);

    let response = server.get("/session/context/u1").await;
    response.assert_status(StatusCode::OK);
    let body: serde_json::Value = response.json();

    // Recent events, newest first
    let recent = body["recent_events"].as_array().unwrap();
    assert_eq!(recent.len(), 2);

    // Session summary covers pages, clicks and frustration
    let summary = body["last_session_summary"].as_str().unwrap();
    assert!(summary.contains("Viewed 1 pages including Checkout"), "{summary}");
    assert!(summary.contains("Clicked 1 times"), "{summary}");
    assert!(summary.contains("frustration detected"), "{summary}");
    assert!(summary.ends_with('.'), "{summary}");

    // Patterns from the default catalogue
    let codes: Vec<&str> = body["patterns"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["code"].as_str().unwrap())
        .collect();
    assert!(codes.contains(&"checkout_abandoned"), "{codes:?}");
    assert!(codes.contains(&"payment_failure_frustration"), "{codes:?}");
    assert!(!codes.contains(&"quick_bounce"), "{codes:?}");
}

#[tokio::test]
async fn test_recent_events_span_sessions() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    for (session, path, title) in [
        ("s1", "/home", "Home"),
        ("s2", "/products", "Products"),
    ] {
        server
            .post("/ingest")
            .json(&fixtures::webhook_payload(&fixtures::pageview(
                "u1", session, path, title,
            )))
            .await
            .assert_status(StatusCode::ACCEPTED);
    }
    assert_eq!(ctx.run_worker_once().await, 2);

    let response = server.get("/session/context/u1").await;
    let body: serde_json::Value = response.json();

    // Both sessions contribute to the cross-session recent list
    let recent = body["recent_events"].as_array().unwrap();
    assert_eq!(recent.len(), 2);

    // The summary covers only the latest session
    let summary = body["last_session_summary"].as_str().unwrap();
    assert!(summary.contains("Viewed 1 pages"), "{summary}");
}
