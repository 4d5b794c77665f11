//! Database health checks.

use crate::client::Database;

/// Returns true when a trivial round trip succeeds.
pub async fn check_connection(db: &Database) -> bool {
    sqlx::query("SELECT 1").execute(db.pool()).await.is_ok()
}
