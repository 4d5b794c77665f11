//! Context composition for downstream consumers.
//!
//! Pulls together a user's recent activity, the latest session's summary
//! and the patterns detected in that session.

use insights_core::{generate_events_summary, Result, SessionContext};
use insights_db::{enriched_events, sessions};

use crate::response::UserContext;
use crate::state::AppState;

/// Cross-session events returned with every context payload.
const RECENT_EVENTS_LIMIT: i64 = 20;

/// Builds the context payload for a user.
///
/// A user without sessions still gets a full payload: recent events (often
/// empty), no summary, no patterns.
pub async fn build_user_context(state: &AppState, user_id: &str) -> Result<UserContext> {
    let recent_events =
        enriched_events::fetch_recent_events(&state.db, user_id, RECENT_EVENTS_LIMIT).await?;

    let Some(latest_session) = sessions::fetch_latest_session(&state.db, user_id).await? else {
        return Ok(UserContext {
            user_id: user_id.to_string(),
            recent_events,
            last_session_summary: None,
            patterns: Vec::new(),
        });
    };

    let session_events =
        enriched_events::fetch_session_events(&state.db, &latest_session.session_id).await?;
    let summary =
        generate_events_summary(&session_events, state.settings.pages_in_summary_limit);

    let session_context = SessionContext::from_session(&latest_session);
    let patterns = state.pattern_engine.detect(&session_events, &session_context);

    Ok(UserContext {
        user_id: user_id.to_string(),
        recent_events,
        last_session_summary: Some(summary),
        patterns,
    })
}
