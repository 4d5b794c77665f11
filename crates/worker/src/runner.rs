//! Batch worker loop.
//!
//! Claims pending raw events in short lock-free-after-commit transactions,
//! dispatches each to a bounded pool of enrichment tasks, awaits the batch
//! and repeats. Empty batches sleep until the next tick or shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use insights_core::{Enricher, Error, RawEvent, Result};
use insights_db::{raw_events, Database};
use insights_telemetry::{health, metrics};

use crate::pipeline::process_event;

/// Worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Raw events claimed per batch
    #[serde(default = "default_batch_size")]
    pub batch_size: i64,
    /// In-flight enrichment tasks
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Sleep between empty batches, in seconds
    #[serde(default = "default_wait_time_secs")]
    pub wait_time_secs: u64,
    /// Per-task timeout, in seconds
    #[serde(default = "default_task_timeout_secs")]
    pub task_timeout_secs: u64,
}

fn default_batch_size() -> i64 {
    200
}

fn default_max_concurrency() -> usize {
    10
}

fn default_wait_time_secs() -> u64 {
    1
}

fn default_task_timeout_secs() -> u64 {
    30
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            max_concurrency: default_max_concurrency(),
            wait_time_secs: default_wait_time_secs(),
            task_timeout_secs: default_task_timeout_secs(),
        }
    }
}

impl WorkerConfig {
    pub fn wait_time(&self) -> Duration {
        Duration::from_secs(self.wait_time_secs)
    }

    pub fn task_timeout(&self) -> Duration {
        Duration::from_secs(self.task_timeout_secs)
    }
}

/// Long-running queue drainer.
pub struct IngestionWorker {
    db: Database,
    enricher: Arc<Enricher>,
    config: WorkerConfig,
    shutdown: watch::Receiver<bool>,
}

impl IngestionWorker {
    pub fn new(
        db: Database,
        enricher: Arc<Enricher>,
        config: WorkerConfig,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            db,
            enricher,
            config,
            shutdown,
        }
    }

    /// Main run loop: claim, dispatch, await, repeat until shutdown.
    ///
    /// On shutdown the current batch drains before the loop exits.
    pub async fn run(mut self) {
        info!(
            batch_size = self.config.batch_size,
            max_concurrency = self.config.max_concurrency,
            "Ingestion worker starting"
        );
        health().worker.set_healthy();

        while !*self.shutdown.borrow() {
            match self.process_batch().await {
                Ok(0) => self.idle_wait().await,
                Ok(count) => debug!(count = count, "Processed batch"),
                Err(e) => {
                    error!("Batch processing error: {}", e);
                    self.idle_wait().await;
                }
            }
        }

        health().worker.set_unhealthy("shut down");
        info!("Ingestion worker shut down gracefully");
    }

    /// Processes a single batch (also driven directly by tests).
    ///
    /// Returns the number of claimed events; per-event failures are
    /// compensated inside their task and never abort the batch.
    pub async fn process_batch(&self) -> Result<usize> {
        let events = raw_events::claim_batch(&self.db, self.config.batch_size).await?;
        if events.is_empty() {
            return Ok(0);
        }

        let count = events.len();
        info!(count = count, "Processing {} events...", count);
        metrics().batches_claimed.inc();
        metrics().events_claimed.inc_by(count as u64);

        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrency));
        let mut tasks = JoinSet::new();

        for event in events {
            let db = self.db.clone();
            let enricher = self.enricher.clone();
            let semaphore = semaphore.clone();
            let task_timeout = self.config.task_timeout();

            tasks.spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                process_claimed_event(db, enricher, event, task_timeout).await;
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                error!("Enrichment task failed to join: {}", e);
            }
        }

        Ok(count)
    }

    /// Sleeps for the configured wait time, waking early on shutdown.
    async fn idle_wait(&mut self) {
        tokio::select! {
            _ = tokio::time::sleep(self.config.wait_time()) => {}
            _ = self.shutdown.changed() => {}
        }
    }
}

/// Runs the pipeline for one claimed event, compensating on failure.
///
/// The enrichment itself runs in a child task so a panic or timeout still
/// lets us mark the row FAILED. If the FAILED mark itself fails the row
/// stays PENDING and will be re-claimed.
async fn process_claimed_event(
    db: Database,
    enricher: Arc<Enricher>,
    event: RawEvent,
    task_timeout: Duration,
) {
    let raw_event_id = event.raw_event_id;
    let started = Instant::now();
    metrics().tasks_in_flight.inc();

    let handle = {
        let db = db.clone();
        tokio::spawn(async move { process_event(&db, &enricher, &event).await })
    };
    let abort = handle.abort_handle();

    let result = match tokio::time::timeout(task_timeout, handle).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(Error::internal(format!("enrichment panicked: {join_err}"))),
        Err(_) => {
            abort.abort();
            Err(Error::Timeout(task_timeout.as_secs()))
        }
    };

    metrics().tasks_in_flight.dec();

    match result {
        Ok(()) => {
            metrics().events_processed.inc();
            metrics()
                .enrich_latency_ms
                .observe(started.elapsed().as_millis() as u64);
        }
        Err(e) => {
            error!(raw_event_id = %raw_event_id, "Failed to process event: {}", e);
            metrics().events_failed.inc();

            if let Err(mark_err) = raw_events::mark_event_as_failed(&db, raw_event_id).await {
                warn!(
                    raw_event_id = %raw_event_id,
                    "Could not mark event FAILED, leaving it PENDING: {}", mark_err
                );
            }
        }
    }
}
