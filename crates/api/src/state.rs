//! Application state shared across handlers.

use std::sync::Arc;

use insights_core::EnrichmentSettings;
use insights_db::Database;
use insights_patterns::{PatternEngine, PatternRule};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Postgres access
    pub db: Database,
    /// Enrichment tunables (summary limits etc.)
    pub settings: Arc<EnrichmentSettings>,
    /// Pattern engine with the startup rule set
    pub pattern_engine: Arc<PatternEngine>,
}

impl AppState {
    pub fn new(db: Database, settings: EnrichmentSettings, rules: Vec<PatternRule>) -> Self {
        Self {
            db,
            settings: Arc::new(settings),
            pattern_engine: Arc::new(PatternEngine::new(rules)),
        }
    }
}
