//! Per-event enrichment pipeline.
//!
//! Runs the whole derivation for one claimed raw event inside a single
//! transaction: session upsert, enrichment, insert, counter update, DONE
//! mark. Any error aborts the transaction; the runner compensates by
//! marking the row FAILED separately.

use insights_core::{Enricher, Error, RawEvent, Result};
use insights_db::{enriched_events, raw_events, sessions, Database};

/// Processes a single raw event end to end.
///
/// The sequence number assigned to the enriched row is the session's event
/// count as read inside this transaction, plus one; the counter update uses
/// relative increments so concurrent sessions compose.
pub async fn process_event(db: &Database, enricher: &Enricher, event: &RawEvent) -> Result<()> {
    let mut tx = db
        .pool()
        .begin()
        .await
        .map_err(|e| Error::database(e.to_string()))?;

    let session = sessions::get_or_create_session(&mut tx, event).await?;
    let enriched = enricher.enrich(event, &session)?;

    enriched_events::insert_enriched_event(&mut tx, &enriched).await?;
    sessions::update_session_activity(&mut tx, &session.session_id, event, &enriched).await?;
    raw_events::mark_event_as_done(&mut tx, event.raw_event_id).await?;

    tx.commit()
        .await
        .map_err(|e| Error::database(e.to_string()))?;

    Ok(())
}
