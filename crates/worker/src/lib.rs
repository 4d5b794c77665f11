//! Background worker for session-insights.
//!
//! Drains the raw event queue with at-least-once semantics:
//! - Claim a batch with row-level skip-locked selects
//! - Enrich each event in its own transaction, bounded concurrency
//! - Mark rows DONE, compensate failures with FAILED
//! - Drain in-flight work on shutdown

pub mod pipeline;
pub mod runner;

pub use pipeline::process_event;
pub use runner::{IngestionWorker, WorkerConfig};
