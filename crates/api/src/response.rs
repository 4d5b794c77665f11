//! Standardized API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use insights_core::EnrichedEvent;
use insights_patterns::Pattern;

/// Acknowledgement for an accepted ingest payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct IngestResponse {
    pub accepted: bool,
    pub raw_event_id: Uuid,
}

impl IngestResponse {
    pub fn accepted(raw_event_id: Uuid) -> Self {
        Self {
            accepted: true,
            raw_event_id,
        }
    }
}

/// Composite context payload for a user.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub recent_events: Vec<EnrichedEvent>,
    pub last_session_summary: Option<String>,
    pub patterns: Vec<Pattern>,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database_connected: bool,
    pub worker_running: bool,
    pub events_processed: u64,
    pub events_failed: u64,
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// API error with status code.
pub struct ApiError {
    pub status: StatusCode,
    pub response: ErrorResponse,
}

impl ApiError {
    pub fn with_code(status: StatusCode, code: impl Into<String>, msg: impl Into<String>) -> Self {
        Self {
            status,
            response: ErrorResponse {
                error: msg.into(),
                code: code.into(),
            },
        }
    }

    /// 422 for payloads that parse but fail validation.
    pub fn unprocessable(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::UNPROCESSABLE_ENTITY, "invalid_payload", msg)
    }

    /// 500 for unexpected infrastructure failures.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_code(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}
