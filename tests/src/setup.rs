//! Common test setup.

use std::sync::Arc;

use axum::Router;
use tokio::sync::watch;

use insights_api::{router, AppState};
use insights_core::{Enricher, EnrichmentSettings};
use insights_db::{init_schema, Database};
use insights_patterns::default_rules;
use insights_worker::{IngestionWorker, WorkerConfig};

use crate::postgres::TestPostgres;

/// Test context with a real Postgres testcontainer.
///
/// Uses the production router and production worker code paths; only the
/// database endpoint differs from a deployment.
pub struct TestContext {
    #[allow(dead_code)]
    pub postgres: TestPostgres,
    pub db: Database,
    pub router: Router,
}

impl TestContext {
    /// Start Postgres, initialize the schema, build the router.
    pub async fn new() -> Self {
        let postgres = TestPostgres::start().await;
        let pool = postgres.connect().await;
        let db = Database::from_pool(pool);

        init_schema(&db).await.expect("Failed to initialize schema");

        let state = AppState::new(db.clone(), EnrichmentSettings::default(), default_rules());
        let router = router(state);

        Self {
            postgres,
            db,
            router,
        }
    }

    /// Worker bound to this context's database.
    ///
    /// The shutdown channel is parked open; tests drive `process_batch`
    /// directly instead of the run loop.
    pub fn worker(&self, config: WorkerConfig) -> IngestionWorker {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        // Keep the sender alive for the worker's lifetime
        std::mem::forget(shutdown_tx);

        IngestionWorker::new(
            self.db.clone(),
            Arc::new(Enricher::default()),
            config,
            shutdown_rx,
        )
    }

    /// Claims and processes one batch with default worker settings.
    pub async fn run_worker_once(&self) -> usize {
        self.worker(WorkerConfig::default())
            .process_batch()
            .await
            .expect("Batch processing failed")
    }
}
