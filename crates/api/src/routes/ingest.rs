//! Ingest endpoint: drops tracker events into the raw queue.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::{debug, error};
use validator::Validate;

use insights_core::TrackerEvent;
use insights_db::raw_events;
use insights_telemetry::metrics;

use crate::response::{ApiError, IngestResponse};
use crate::state::AppState;

/// Tracker webhook payload. The single-field wrapper is the simplest of the
/// formats the tracker can be configured to send.
#[derive(Debug, Deserialize)]
pub struct TrackerWebhookPayload {
    pub event: TrackerEvent,
}

/// POST /ingest - accepts one tracker event, inserts a PENDING queue row.
pub async fn ingest_handler(
    State(state): State<AppState>,
    Json(payload): Json<TrackerWebhookPayload>,
) -> Result<(StatusCode, Json<IngestResponse>), ApiError> {
    payload
        .event
        .validate()
        .map_err(|e| ApiError::unprocessable(e.to_string()))?;

    let raw_event_id = raw_events::insert_raw_event(&state.db, &payload.event)
        .await
        .map_err(|e| {
            error!("Failed to insert raw event: {}", e);
            ApiError::internal("Failed to accept event")
        })?;

    metrics().events_ingested.inc();
    debug!(
        raw_event_id = %raw_event_id,
        event = %payload.event.event,
        distinct_id = %payload.event.distinct_id,
        "Accepted tracker event"
    );

    Ok((
        StatusCode::ACCEPTED,
        Json(IngestResponse::accepted(raw_event_id)),
    ))
}
