//! Context read endpoint.

use axum::extract::{Path, State};
use axum::Json;
use tracing::error;

use insights_telemetry::metrics;

use crate::context::build_user_context;
use crate::response::{ApiError, UserContext};
use crate::state::AppState;

/// GET /session/context/{user_id} - composite user context.
///
/// Always 200 for known and unknown users alike; 500 only on
/// infrastructure failure.
pub async fn context_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserContext>, ApiError> {
    let context = build_user_context(&state, &user_id).await.map_err(|e| {
        error!(user_id = %user_id, "Failed to build user context: {}", e);
        ApiError::internal("Failed to build user context")
    })?;

    metrics().contexts_served.inc();
    Ok(Json(context))
}
