//! Session reconciliation and lookups.

use sqlx::postgres::PgRow;
use sqlx::{PgConnection, Row};

use insights_core::{EnrichedEventCreate, Error, EventType, RawEvent, Result, Session};

use crate::client::Database;
use crate::map_db_err;

const SESSION_COLUMNS: &str = "session_id, user_id, started_at, last_activity_at, ended_at, \
     event_count, page_views_count, clicks_count, first_page, last_page, session_summary, \
     is_active, created_at, updated_at";

pub(crate) fn session_from_row(row: &PgRow) -> Result<Session> {
    Ok(Session {
        session_id: row.try_get("session_id").map_err(map_db_err)?,
        user_id: row.try_get("user_id").map_err(map_db_err)?,
        started_at: row.try_get("started_at").map_err(map_db_err)?,
        last_activity_at: row.try_get("last_activity_at").map_err(map_db_err)?,
        ended_at: row.try_get("ended_at").map_err(map_db_err)?,
        event_count: row.try_get("event_count").map_err(map_db_err)?,
        page_views_count: row.try_get("page_views_count").map_err(map_db_err)?,
        clicks_count: row.try_get("clicks_count").map_err(map_db_err)?,
        first_page: row.try_get("first_page").map_err(map_db_err)?,
        last_page: row.try_get("last_page").map_err(map_db_err)?,
        session_summary: row.try_get("session_summary").map_err(map_db_err)?,
        is_active: row.try_get("is_active").map_err(map_db_err)?,
        created_at: row.try_get("created_at").map_err(map_db_err)?,
        updated_at: row.try_get("updated_at").map_err(map_db_err)?,
    })
}

/// Fetches a session by id inside the caller's transaction.
pub async fn fetch_session(
    conn: &mut PgConnection,
    session_id: &str,
) -> Result<Option<Session>> {
    let row = sqlx::query(&format!(
        "SELECT {SESSION_COLUMNS} FROM session WHERE session_id = $1"
    ))
    .bind(session_id)
    .fetch_optional(conn)
    .await
    .map_err(map_db_err)?;

    row.as_ref().map(session_from_row).transpose()
}

/// Upserts the session for a raw event and returns the stored row.
///
/// The insert is idempotent (`ON CONFLICT DO NOTHING`); the read-back is
/// the source of truth for the counters the enrichment step sees.
pub async fn get_or_create_session(conn: &mut PgConnection, event: &RawEvent) -> Result<Session> {
    let session_id = event
        .session_id()
        .ok_or(Error::MissingSession(event.raw_event_id))?
        .to_string();

    sqlx::query(
        r#"
        INSERT INTO session (session_id, user_id, started_at, last_activity_at, first_page, is_active)
        VALUES ($1, $2, $3, $3, $4, TRUE)
        ON CONFLICT (session_id) DO NOTHING
        "#,
    )
    .bind(&session_id)
    .bind(&event.user_id)
    .bind(event.timestamp)
    .bind(event.page_path())
    .execute(&mut *conn)
    .await
    .map_err(map_db_err)?;

    fetch_session(conn, &session_id)
        .await?
        .ok_or_else(|| Error::database(format!("session {session_id} missing after upsert")))
}

/// Updates session counters after an event was enriched.
///
/// Counters move as relative SQL expressions so concurrent increments
/// compose; the row is locked by the database for the statement only.
pub async fn update_session_activity(
    conn: &mut PgConnection,
    session_id: &str,
    event: &RawEvent,
    enriched: &EnrichedEventCreate,
) -> Result<()> {
    let query = if enriched.page_path.is_some() {
        sqlx::query(
            r#"
            UPDATE session
            SET last_activity_at = $2,
                event_count = event_count + 1,
                page_views_count = page_views_count + 1,
                last_page = $3,
                updated_at = now()
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .bind(event.timestamp)
        .bind(&enriched.page_path)
    } else if enriched.event_type == EventType::Click {
        sqlx::query(
            r#"
            UPDATE session
            SET last_activity_at = $2,
                event_count = event_count + 1,
                clicks_count = clicks_count + 1,
                updated_at = now()
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .bind(event.timestamp)
    } else {
        sqlx::query(
            r#"
            UPDATE session
            SET last_activity_at = $2,
                event_count = event_count + 1,
                updated_at = now()
            WHERE session_id = $1
            "#,
        )
        .bind(session_id)
        .bind(event.timestamp)
    };

    query.execute(conn).await.map_err(map_db_err)?;
    Ok(())
}

/// Fetches the user's most recently started session.
pub async fn fetch_latest_session(db: &Database, user_id: &str) -> Result<Option<Session>> {
    let row = sqlx::query(&format!(
        "SELECT {SESSION_COLUMNS} FROM session WHERE user_id = $1 ORDER BY started_at DESC LIMIT 1"
    ))
    .bind(user_id)
    .fetch_optional(db.pool())
    .await
    .map_err(map_db_err)?;

    row.as_ref().map(session_from_row).transpose()
}
