//! Enriched event persistence and read queries.

use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use insights_core::{EnrichedEvent, EnrichedEventCreate, Result};

use crate::client::Database;
use crate::map_db_err;

const ENRICHED_COLUMNS: &str = "enriched_event_id, raw_event_id, user_id, session_id, timestamp, \
     event_name, event_type, action_type, semantic_label, page_path, page_title, element_type, \
     element_text, context, sequence_number, created_at";

pub(crate) fn enriched_event_from_row(row: &PgRow) -> Result<EnrichedEvent> {
    let event_type: String = row.try_get("event_type").map_err(map_db_err)?;
    let action_type: String = row.try_get("action_type").map_err(map_db_err)?;
    let context: serde_json::Value = row.try_get("context").map_err(map_db_err)?;

    Ok(EnrichedEvent {
        enriched_event_id: row.try_get("enriched_event_id").map_err(map_db_err)?,
        raw_event_id: row.try_get("raw_event_id").map_err(map_db_err)?,
        user_id: row.try_get("user_id").map_err(map_db_err)?,
        session_id: row.try_get("session_id").map_err(map_db_err)?,
        timestamp: row.try_get("timestamp").map_err(map_db_err)?,
        event_name: row.try_get("event_name").map_err(map_db_err)?,
        event_type: event_type.parse()?,
        action_type: action_type.parse()?,
        semantic_label: row.try_get("semantic_label").map_err(map_db_err)?,
        page_path: row.try_get("page_path").map_err(map_db_err)?,
        page_title: row.try_get("page_title").map_err(map_db_err)?,
        element_type: row.try_get("element_type").map_err(map_db_err)?,
        element_text: row.try_get("element_text").map_err(map_db_err)?,
        context: context.as_object().cloned().unwrap_or_default(),
        sequence_number: row.try_get("sequence_number").map_err(map_db_err)?,
        created_at: row.try_get("created_at").map_err(map_db_err)?,
    })
}

/// Inserts an enriched event row inside the caller's transaction.
pub async fn insert_enriched_event(
    conn: &mut PgConnection,
    event: &EnrichedEventCreate,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO enriched_event (
            raw_event_id, user_id, session_id, timestamp, event_name, event_type,
            action_type, semantic_label, page_path, page_title, element_type,
            element_text, context, sequence_number
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        "#,
    )
    .bind(event.raw_event_id)
    .bind(&event.user_id)
    .bind(&event.session_id)
    .bind(event.timestamp)
    .bind(&event.event_name)
    .bind(event.event_type.as_str())
    .bind(event.action_type.as_str())
    .bind(&event.semantic_label)
    .bind(&event.page_path)
    .bind(&event.page_title)
    .bind(&event.element_type)
    .bind(&event.element_text)
    .bind(serde_json::Value::Object(event.context.clone()))
    .bind(event.sequence_number)
    .execute(conn)
    .await
    .map_err(map_db_err)?;

    Ok(())
}

/// Fetches a user's most recent enriched events across sessions,
/// newest first.
pub async fn fetch_recent_events(
    db: &Database,
    user_id: &str,
    limit: i64,
) -> Result<Vec<EnrichedEvent>> {
    let rows = sqlx::query(&format!(
        "SELECT {ENRICHED_COLUMNS} FROM enriched_event \
         WHERE user_id = $1 ORDER BY timestamp DESC LIMIT $2"
    ))
    .bind(user_id)
    .bind(limit)
    .fetch_all(db.pool())
    .await
    .map_err(map_db_err)?;

    rows.iter().map(enriched_event_from_row).collect()
}

/// Fetches a session's enriched events in sequence order.
pub async fn fetch_session_events(db: &Database, session_id: &str) -> Result<Vec<EnrichedEvent>> {
    let rows = sqlx::query(&format!(
        "SELECT {ENRICHED_COLUMNS} FROM enriched_event \
         WHERE session_id = $1 ORDER BY sequence_number ASC"
    ))
    .bind(session_id)
    .fetch_all(db.pool())
    .await
    .map_err(map_db_err)?;

    rows.iter().map(enriched_event_from_row).collect()
}
