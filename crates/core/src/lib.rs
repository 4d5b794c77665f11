//! Domain types and pure enrichment logic for session-insights.

pub mod classify;
pub mod context;
pub mod elements;
pub mod enrich;
pub mod error;
pub mod event;
pub mod label;
pub mod page;
pub mod session;
pub mod settings;
pub mod summary;
pub mod text;

pub use classify::classify_event;
pub use context::build_context;
pub use elements::{parse_elements_chain, ParsedElements};
pub use enrich::Enricher;
pub use error::{Error, Result};
pub use event::{
    ActionType, EnrichedEvent, EnrichedEventCreate, EventClassification, EventType, Properties,
    RawEvent, RawEventStatus, Severity, TrackerEvent,
};
pub use label::SemanticLabelBuilder;
pub use page::{extract_page_info, PageInfo};
pub use session::{Session, SessionContext};
pub use settings::EnrichmentSettings;
pub use summary::generate_events_summary;
