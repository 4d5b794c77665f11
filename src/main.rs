//! Session Insights
//!
//! Event-enrichment and pattern-detection service:
//! - HTTP ingest dropping tracker events into a Postgres-backed queue
//! - Batch worker draining the queue with bounded concurrency
//! - Per-user context endpoint with session summaries and detected patterns

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::sync::watch;
use tracing::{error, info};

use insights_api::{router, AppState};
use insights_core::{Enricher, EnrichmentSettings};
use insights_db::{init_schema, Database, DatabaseConfig};
use insights_patterns::{default_rules, PatternRule};
use insights_telemetry::{health, init_tracing_from_env};
use insights_worker::{IngestionWorker, WorkerConfig};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    #[serde(default)]
    database: DatabaseConfig,

    #[serde(default)]
    worker: WorkerConfig,

    #[serde(default)]
    enrichment: EnrichmentSettings,

    /// Pattern rule set evaluated on context reads
    #[serde(default = "default_rules")]
    pattern_rules: Vec<PatternRule>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: DatabaseConfig::default(),
            worker: WorkerConfig::default(),
            enrichment: EnrichmentSettings::default(),
            pattern_rules: default_rules(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Session Insights v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    // Connect Postgres and ensure the schema exists
    let db = Database::connect(config.database.clone())
        .await
        .context("Failed to connect to Postgres")?;

    init_schema(&db)
        .await
        .context("Failed to initialize database schema")?;

    // Check health and update status
    check_health(&db).await;

    // Start the ingestion worker on a shutdown channel
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let enricher = Arc::new(Enricher::new(config.enrichment.clone()));
    let worker = IngestionWorker::new(
        db.clone(),
        enricher,
        config.worker.clone(),
        shutdown_rx,
    );
    let worker_handle = tokio::spawn(worker.run());

    // Create application state and router
    let state = AppState::new(db, config.enrichment.clone(), config.pattern_rules.clone());
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Stop claiming new batches, drain in-flight enrichment tasks
    info!("Shutting down...");
    shutdown_tx.send(true).ok();
    if let Err(e) = worker_handle.await {
        error!("Worker task failed during shutdown: {}", e);
    }

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("INSIGHTS")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Manual overrides for nested config from environment
    // The config crate's nested parsing doesn't work reliably with underscored field names
    if let Ok(host) = std::env::var("INSIGHTS_DATABASE_HOST") {
        config.database.host = host;
    }
    if let Ok(port) = std::env::var("INSIGHTS_DATABASE_PORT") {
        config.database.port = port.parse().context("Invalid INSIGHTS_DATABASE_PORT")?;
    }
    if let Ok(username) = std::env::var("INSIGHTS_DATABASE_USERNAME") {
        config.database.username = username;
    }
    if let Ok(password) = std::env::var("INSIGHTS_DATABASE_PASSWORD") {
        config.database.password = password;
    }
    if let Ok(database) = std::env::var("INSIGHTS_DATABASE_DATABASE") {
        config.database.database = database;
    }

    if let Ok(batch_size) = std::env::var("INSIGHTS_WORKER_BATCH_SIZE") {
        config.worker.batch_size = batch_size.parse().context("Invalid INSIGHTS_WORKER_BATCH_SIZE")?;
    }
    if let Ok(max_concurrency) = std::env::var("INSIGHTS_WORKER_MAX_CONCURRENCY") {
        config.worker.max_concurrency = max_concurrency
            .parse()
            .context("Invalid INSIGHTS_WORKER_MAX_CONCURRENCY")?;
    }
    if let Ok(wait_time) = std::env::var("INSIGHTS_WORKER_WAIT_TIME_SECS") {
        config.worker.wait_time_secs = wait_time.parse().context("Invalid INSIGHTS_WORKER_WAIT_TIME_SECS")?;
    }
    if let Ok(label_max) = std::env::var("INSIGHTS_ENRICHMENT_SEMANTIC_LABEL_MAX_LENGTH") {
        config.enrichment.semantic_label_max_length = label_max
            .parse()
            .context("Invalid INSIGHTS_ENRICHMENT_SEMANTIC_LABEL_MAX_LENGTH")?;
    }
    if let Ok(pages_limit) = std::env::var("INSIGHTS_ENRICHMENT_PAGES_IN_SUMMARY_LIMIT") {
        config.enrichment.pages_in_summary_limit = pages_limit
            .parse()
            .context("Invalid INSIGHTS_ENRICHMENT_PAGES_IN_SUMMARY_LIMIT")?;
    }

    Ok(config)
}

/// Check component health on startup.
async fn check_health(db: &Database) {
    let db_healthy = insights_db::health::check_connection(db).await;
    if db_healthy {
        health().database.set_healthy();
        info!("Postgres connection: healthy");
    } else {
        health().database.set_unhealthy("Connection failed");
        error!("Postgres connection: unhealthy");
    }
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
