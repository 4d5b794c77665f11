//! Postgres table schemas.

use tracing::info;

use insights_core::Result;

use crate::client::Database;
use crate::map_db_err;

/// SQL for creating the raw event queue table.
pub const CREATE_RAW_EVENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS raw_event (
    raw_event_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    event_name TEXT NOT NULL,
    user_id TEXT NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL,
    properties JSONB NOT NULL DEFAULT '{}'::jsonb,
    elements_chain TEXT,
    processed_at TIMESTAMPTZ,
    status TEXT NOT NULL DEFAULT 'PENDING'
        CHECK (status IN ('PENDING', 'DONE', 'FAILED')),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// SQL for creating the enriched event table.
pub const CREATE_ENRICHED_EVENT_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS enriched_event (
    enriched_event_id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    raw_event_id UUID NOT NULL REFERENCES raw_event (raw_event_id),
    user_id TEXT NOT NULL,
    session_id TEXT NOT NULL,
    timestamp TIMESTAMPTZ NOT NULL,
    event_name TEXT NOT NULL,
    event_type TEXT NOT NULL,
    action_type TEXT NOT NULL,
    semantic_label TEXT NOT NULL,
    page_path TEXT,
    page_title TEXT,
    element_type TEXT,
    element_text TEXT,
    context JSONB NOT NULL DEFAULT '{}'::jsonb,
    sequence_number INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

/// SQL for creating the session table.
pub const CREATE_SESSION_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS session (
    session_id TEXT PRIMARY KEY,
    user_id TEXT NOT NULL,
    started_at TIMESTAMPTZ NOT NULL,
    last_activity_at TIMESTAMPTZ NOT NULL,
    ended_at TIMESTAMPTZ,
    event_count INTEGER NOT NULL DEFAULT 0,
    page_views_count INTEGER NOT NULL DEFAULT 0,
    clicks_count INTEGER NOT NULL DEFAULT 0,
    first_page TEXT,
    last_page TEXT,
    session_summary TEXT,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
)
"#;

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS ix_raw_event_user_time ON raw_event (user_id, timestamp)",
    // Partial index backing the queue claim scan
    "CREATE INDEX IF NOT EXISTS ix_raw_event_pending ON raw_event (created_at) \
     WHERE processed_at IS NULL AND status = 'PENDING'",
    "CREATE INDEX IF NOT EXISTS ix_enriched_user_timestamp ON enriched_event (user_id, timestamp)",
    "CREATE INDEX IF NOT EXISTS ix_enriched_session_timestamp ON enriched_event (session_id, timestamp)",
    "CREATE INDEX IF NOT EXISTS ix_enriched_timestamp ON enriched_event (timestamp)",
    "CREATE INDEX IF NOT EXISTS ix_session_user_started ON session (user_id, started_at)",
    "CREATE INDEX IF NOT EXISTS ix_session_user_active ON session (user_id, is_active)",
    "CREATE INDEX IF NOT EXISTS ix_session_active_activity ON session (is_active, last_activity_at)",
];

/// Creates all tables and indexes if they don't exist.
pub async fn init_schema(db: &Database) -> Result<()> {
    for ddl in [
        CREATE_RAW_EVENT_TABLE,
        CREATE_ENRICHED_EVENT_TABLE,
        CREATE_SESSION_TABLE,
    ] {
        sqlx::query(ddl)
            .execute(db.pool())
            .await
            .map_err(map_db_err)?;
    }

    for ddl in CREATE_INDEXES {
        sqlx::query(ddl)
            .execute(db.pool())
            .await
            .map_err(map_db_err)?;
    }

    info!("Database schema initialized");
    Ok(())
}
