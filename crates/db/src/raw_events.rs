//! Raw event queue operations.

use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};
use uuid::Uuid;

use insights_core::{RawEvent, RawEventStatus, Result, TrackerEvent};

use crate::client::Database;
use crate::map_db_err;

const CLAIM_SQL: &str = r#"
SELECT raw_event_id, event_name, user_id, timestamp, properties, elements_chain,
       processed_at, status, created_at, updated_at
FROM raw_event
WHERE processed_at IS NULL AND status = 'PENDING'
ORDER BY created_at
LIMIT $1
FOR UPDATE SKIP LOCKED
"#;

pub(crate) fn raw_event_from_row(row: &PgRow) -> Result<RawEvent> {
    let status: String = row.try_get("status").map_err(map_db_err)?;
    let properties: serde_json::Value = row.try_get("properties").map_err(map_db_err)?;

    Ok(RawEvent {
        raw_event_id: row.try_get("raw_event_id").map_err(map_db_err)?,
        event_name: row.try_get("event_name").map_err(map_db_err)?,
        user_id: row.try_get("user_id").map_err(map_db_err)?,
        timestamp: row.try_get("timestamp").map_err(map_db_err)?,
        properties: properties.as_object().cloned().unwrap_or_default(),
        elements_chain: row.try_get("elements_chain").map_err(map_db_err)?,
        processed_at: row.try_get("processed_at").map_err(map_db_err)?,
        status: status.parse()?,
        created_at: row.try_get("created_at").map_err(map_db_err)?,
        updated_at: row.try_get("updated_at").map_err(map_db_err)?,
    })
}

/// Inserts a tracker event as a PENDING queue row. Returns the row id.
pub async fn insert_raw_event(db: &Database, event: &TrackerEvent) -> Result<Uuid> {
    let row = sqlx::query(
        r#"
        INSERT INTO raw_event (event_name, user_id, timestamp, properties, elements_chain, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING raw_event_id
        "#,
    )
    .bind(&event.event)
    .bind(&event.distinct_id)
    .bind(event.timestamp)
    .bind(serde_json::Value::Object(event.properties.clone()))
    .bind(&event.elements_chain)
    .bind(RawEventStatus::Pending.as_str())
    .fetch_one(db.pool())
    .await
    .map_err(map_db_err)?;

    row.try_get("raw_event_id").map_err(map_db_err)
}

/// Claims up to `batch_size` pending rows inside the caller's transaction.
///
/// `FOR UPDATE SKIP LOCKED` keeps concurrent claimers on disjoint rows;
/// rows stay PENDING until processed.
pub async fn claim_batch_tx(conn: &mut PgConnection, batch_size: i64) -> Result<Vec<RawEvent>> {
    let rows = sqlx::query(CLAIM_SQL)
        .bind(batch_size)
        .fetch_all(conn)
        .await
        .map_err(map_db_err)?;

    rows.iter().map(raw_event_from_row).collect()
}

/// Claims a batch in its own short transaction.
///
/// The transaction commits before any enrichment work so row locks are not
/// held across processing.
pub async fn claim_batch(db: &Database, batch_size: i64) -> Result<Vec<RawEvent>> {
    let mut tx = db.pool().begin().await.map_err(map_db_err)?;
    let events = claim_batch_tx(&mut tx, batch_size).await?;
    tx.commit().await.map_err(map_db_err)?;
    Ok(events)
}

/// Marks a raw event DONE, stamping `processed_at`.
pub async fn mark_event_as_done(conn: &mut PgConnection, raw_event_id: Uuid) -> Result<()> {
    sqlx::query(
        "UPDATE raw_event SET status = $2, processed_at = $3, updated_at = $3 WHERE raw_event_id = $1",
    )
    .bind(raw_event_id)
    .bind(RawEventStatus::Done.as_str())
    .bind(Utc::now())
    .execute(conn)
    .await
    .map_err(map_db_err)?;

    Ok(())
}

/// Marks a raw event FAILED. Runs on a fresh connection so it survives the
/// aborted per-event transaction.
pub async fn mark_event_as_failed(db: &Database, raw_event_id: Uuid) -> Result<()> {
    sqlx::query("UPDATE raw_event SET status = $2, updated_at = $3 WHERE raw_event_id = $1")
        .bind(raw_event_id)
        .bind(RawEventStatus::Failed.as_str())
        .bind(Utc::now())
        .execute(db.pool())
        .await
        .map_err(map_db_err)?;

    Ok(())
}

/// Fetches a raw event by id (tests and diagnostics).
pub async fn fetch_raw_event(db: &Database, raw_event_id: Uuid) -> Result<Option<RawEvent>> {
    let row = sqlx::query(
        r#"
        SELECT raw_event_id, event_name, user_id, timestamp, properties, elements_chain,
               processed_at, status, created_at, updated_at
        FROM raw_event
        WHERE raw_event_id = $1
        "#,
    )
    .bind(raw_event_id)
    .fetch_optional(db.pool())
    .await
    .map_err(map_db_err)?;

    row.as_ref().map(raw_event_from_row).transpose()
}
