//! End-to-end tests for the batch worker.
//!
//! raw_event queue → claim → enrichment → enriched_event + session rollup.
//!
//! Requires Docker for the Postgres testcontainer.

use std::collections::HashSet;

use insights_core::{ActionType, EventType, RawEventStatus};
use insights_db::{enriched_events, raw_events, sessions};
use insights_worker::WorkerConfig;
use integration_tests::{fixtures, setup::TestContext};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_pageview_happy_path() {
    let ctx = TestContext::new().await;

    let event = fixtures::pageview("u1", "s1", "/home", "Home Page");
    let raw_event_id = raw_events::insert_raw_event(&ctx.db, &event)
        .await
        .expect("Failed to insert raw event");

    let processed = ctx.run_worker_once().await;
    assert_eq!(processed, 1);

    // Raw row is DONE with processed_at stamped
    let raw = raw_events::fetch_raw_event(&ctx.db, raw_event_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw.status, RawEventStatus::Done);
    assert!(raw.processed_at.is_some());

    // One enriched row
    let enriched = enriched_events::fetch_session_events(&ctx.db, "s1")
        .await
        .unwrap();
    assert_eq!(enriched.len(), 1);
    let row = &enriched[0];
    assert_eq!(row.raw_event_id, raw_event_id);
    assert_eq!(row.event_type, EventType::Pageview);
    assert_eq!(row.action_type, ActionType::View);
    assert_eq!(row.semantic_label, "Viewed Home Page");
    assert_eq!(row.sequence_number, 1);
    assert_eq!(row.page_path.as_deref(), Some("/home"));

    // Session rollup
    let mut conn = ctx.db.pool().acquire().await.unwrap();
    let session = sessions::fetch_session(&mut conn, "s1")
        .await
        .unwrap()
        .expect("Session row missing");
    assert_eq!(session.user_id, "u1");
    assert_eq!(session.event_count, 1);
    assert_eq!(session.page_views_count, 1);
    assert_eq!(session.first_page.as_deref(), Some("/home"));
    assert_eq!(session.last_page.as_deref(), Some("/home"));
    assert!(session.is_active);
}

#[tokio::test]
async fn test_sequence_numbers_increase_within_session() {
    let ctx = TestContext::new().await;

    for (path, title) in [("/home", "Home"), ("/products", "Products"), ("/checkout", "Checkout")] {
        raw_events::insert_raw_event(&ctx.db, &fixtures::pageview("u1", "s1", path, title))
            .await
            .unwrap();
    }

    // Serialize tasks so the read-then-increment sequence is deterministic
    let worker = ctx.worker(WorkerConfig {
        max_concurrency: 1,
        ..Default::default()
    });
    assert_eq!(worker.process_batch().await.unwrap(), 3);

    let enriched = enriched_events::fetch_session_events(&ctx.db, "s1")
        .await
        .unwrap();
    let sequences: Vec<i32> = enriched.iter().map(|e| e.sequence_number).collect();
    assert_eq!(sequences, vec![1, 2, 3]);

    let mut conn = ctx.db.pool().acquire().await.unwrap();
    let session = sessions::fetch_session(&mut conn, "s1").await.unwrap().unwrap();
    assert_eq!(session.event_count, 3);
    assert_eq!(session.page_views_count, 3);
    // first_page is set at creation and never rewritten
    assert_eq!(session.first_page.as_deref(), Some("/home"));
    assert_eq!(session.last_page.as_deref(), Some("/checkout"));
}

#[tokio::test]
async fn test_missing_session_id_marks_failed() {
    let ctx = TestContext::new().await;

    let event = fixtures::tracker_event("$pageview", "u1", json!({}), None);
    let raw_event_id = raw_events::insert_raw_event(&ctx.db, &event).await.unwrap();

    let processed = ctx.run_worker_once().await;
    assert_eq!(processed, 1);

    let raw = raw_events::fetch_raw_event(&ctx.db, raw_event_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(raw.status, RawEventStatus::Failed);

    // No enriched row, no session row
    let recent = enriched_events::fetch_recent_events(&ctx.db, "u1", 10)
        .await
        .unwrap();
    assert!(recent.is_empty());

    let latest = sessions::fetch_latest_session(&ctx.db, "u1").await.unwrap();
    assert!(latest.is_none());
}

#[tokio::test]
async fn test_failed_rows_are_not_reclaimed() {
    let ctx = TestContext::new().await;

    let event = fixtures::tracker_event("$pageview", "u1", json!({}), None);
    raw_events::insert_raw_event(&ctx.db, &event).await.unwrap();

    assert_eq!(ctx.run_worker_once().await, 1);
    // The FAILED row is out of the queue for good
    assert_eq!(ctx.run_worker_once().await, 0);
}

#[tokio::test]
async fn test_concurrent_claims_are_disjoint() {
    let ctx = TestContext::new().await;

    for i in 0..4 {
        let session = format!("s{i}");
        raw_events::insert_raw_event(
            &ctx.db,
            &fixtures::pageview("u1", &session, "/home", "Home"),
        )
        .await
        .unwrap();
    }

    // Two overlapping claim transactions: skip-locked selects must hand
    // each claimer its own rows
    let mut tx_a = ctx.db.pool().begin().await.unwrap();
    let mut tx_b = ctx.db.pool().begin().await.unwrap();

    let batch_a = raw_events::claim_batch_tx(&mut tx_a, 2).await.unwrap();
    let batch_b = raw_events::claim_batch_tx(&mut tx_b, 2).await.unwrap();

    let ids_a: HashSet<Uuid> = batch_a.iter().map(|e| e.raw_event_id).collect();
    let ids_b: HashSet<Uuid> = batch_b.iter().map(|e| e.raw_event_id).collect();

    assert_eq!(ids_a.len(), 2);
    assert_eq!(ids_b.len(), 2);
    assert!(ids_a.is_disjoint(&ids_b), "claimed rows overlap");

    tx_a.commit().await.unwrap();
    tx_b.commit().await.unwrap();
}

#[tokio::test]
async fn test_click_and_submit_enrichment() {
    let ctx = TestContext::new().await;

    raw_events::insert_raw_event(&ctx.db, &fixtures::autocapture_submit("u1", "s1", "/contact"))
        .await
        .unwrap();

    assert_eq!(ctx.run_worker_once().await, 1);

    let enriched = enriched_events::fetch_session_events(&ctx.db, "s1")
        .await
        .unwrap();
    assert_eq!(enriched.len(), 1);
    let row = &enriched[0];
    assert_eq!(row.event_type, EventType::Click);
    assert_eq!(row.action_type, ActionType::Submit);
    assert_eq!(row.element_type.as_deref(), Some("button"));
    assert_eq!(row.element_text.as_deref(), Some("Send"));
    assert_eq!(row.semantic_label, "Clicked 'Send' button in form");
    assert_eq!(row.context["form_id"], json!("contact"));
}
