//! Enrichment of a raw event into its derived record.
//!
//! The pure half of the pipeline: parsing, classification, labelling and
//! context assembly. Persistence happens around it in the worker.

use crate::context::build_context;
use crate::classify::classify_event;
use crate::elements::parse_elements_chain;
use crate::error::{Error, Result};
use crate::event::{EnrichedEventCreate, RawEvent};
use crate::label::SemanticLabelBuilder;
use crate::page::extract_page_info;
use crate::session::Session;
use crate::settings::EnrichmentSettings;

/// Turns claimed raw events into enriched insert payloads.
#[derive(Debug, Clone)]
pub struct Enricher {
    label_builder: SemanticLabelBuilder,
    settings: EnrichmentSettings,
}

impl Enricher {
    pub fn new(settings: EnrichmentSettings) -> Self {
        Self {
            label_builder: SemanticLabelBuilder::new(&settings),
            settings,
        }
    }

    /// Derive the enriched record for a raw event attached to `session`.
    ///
    /// The sequence number is the session's event count as read in the
    /// surrounding transaction, plus one.
    pub fn enrich(&self, event: &RawEvent, session: &Session) -> Result<EnrichedEventCreate> {
        let session_id = event
            .session_id()
            .ok_or(Error::MissingSession(event.raw_event_id))?
            .to_string();

        let element_info = event
            .elements_chain
            .as_deref()
            .map(parse_elements_chain)
            .unwrap_or_default();
        let classification = classify_event(&event.event_name, &event.properties);
        let page_info = extract_page_info(&event.properties);

        let semantic_label = self.label_builder.build(
            &classification,
            &page_info,
            &element_info,
            &event.event_name,
            &event.properties,
        );
        let context = build_context(
            &event.event_name,
            &event.properties,
            &element_info,
            &self.settings.context_exclude_keys,
        );

        Ok(EnrichedEventCreate {
            raw_event_id: event.raw_event_id,
            user_id: event.user_id.clone(),
            session_id,
            timestamp: event.timestamp,
            event_name: event.event_name.clone(),
            event_type: classification.event_type,
            action_type: classification.action_type,
            semantic_label,
            page_path: Some(page_info.page_path),
            page_title: Some(page_info.page_title),
            element_type: element_info.element_type,
            element_text: element_info.element_text,
            context,
            sequence_number: session.event_count + 1,
        })
    }
}

impl Default for Enricher {
    fn default() -> Self {
        Self::new(EnrichmentSettings::default())
    }
}
