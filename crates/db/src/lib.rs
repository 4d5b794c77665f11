//! Postgres access layer for session-insights.
//!
//! Three tables back the pipeline: the `raw_event` queue, the
//! `enriched_event` append-only log and the `session` rollup. The queue is
//! coordinated purely through `FOR UPDATE SKIP LOCKED` claims.

pub mod client;
pub mod config;
pub mod enriched_events;
pub mod health;
pub mod raw_events;
pub mod schema;
pub mod sessions;

pub use client::Database;
pub use config::DatabaseConfig;
pub use schema::init_schema;

use insights_core::Error;

pub(crate) fn map_db_err(err: sqlx::Error) -> Error {
    Error::database(err.to_string())
}
