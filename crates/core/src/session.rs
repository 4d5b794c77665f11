//! Session types: the persisted row and its read-only projection.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Per-user interaction window, keyed by the tracker's `$session_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub event_count: i32,
    pub page_views_count: i32,
    pub clicks_count: i32,
    pub first_page: Option<String>,
    pub last_page: Option<String>,
    pub session_summary: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Read-only session projection handed to the pattern engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    pub session_id: String,
    pub user_id: String,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    /// None while the session is still active.
    pub duration: Option<Duration>,
    pub event_count: i32,
    pub page_views_count: i32,
    pub clicks_count: i32,
    pub first_page: Option<String>,
    pub last_page: Option<String>,
    pub is_active: bool,
}

impl SessionContext {
    /// Projects a stored session row; duration is derived from `ended_at`.
    pub fn from_session(session: &Session) -> Self {
        Self {
            session_id: session.session_id.clone(),
            user_id: session.user_id.clone(),
            started_at: session.started_at,
            ended_at: session.ended_at,
            duration: session.ended_at.map(|ended| ended - session.started_at),
            event_count: session.event_count,
            page_views_count: session.page_views_count,
            clicks_count: session.clicks_count,
            first_page: session.first_page.clone(),
            last_page: session.last_page.clone(),
            is_active: session.is_active,
        }
    }

    /// Session duration in seconds, None while active.
    pub fn duration_seconds(&self) -> Option<f64> {
        self.duration
            .map(|d| d.num_milliseconds() as f64 / 1000.0)
    }
}
