//! Semantic label building.
//!
//! Produces the short, human-readable phrase stored on every enriched
//! event and fed downstream as LLM input.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::elements::ParsedElements;
use crate::event::{ActionType, EventClassification, EventType, Properties};
use crate::page::PageInfo;
use crate::settings::EnrichmentSettings;
use crate::text::{capitalize_first_letter, humanize_snake_case_string, truncate_text};

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("invalid placeholder regex"));

/// Builder for LLM-friendly semantic labels.
///
/// Configurable with custom event templates, element enrichment rules and
/// a length cap.
#[derive(Debug, Clone)]
pub struct SemanticLabelBuilder {
    custom_templates: HashMap<String, String>,
    enrichment_rules: HashMap<String, String>,
    max_length: usize,
}

impl SemanticLabelBuilder {
    pub fn new(settings: &EnrichmentSettings) -> Self {
        Self {
            custom_templates: settings.custom_event_templates.clone(),
            enrichment_rules: settings.element_enrichment_rules.clone(),
            max_length: settings.semantic_label_max_length,
        }
    }

    /// Build the label for an event, routed on `(event_type, action_type)`.
    pub fn build(
        &self,
        classification: &EventClassification,
        page_info: &PageInfo,
        element_info: &ParsedElements,
        event_name: &str,
        properties: &Properties,
    ) -> String {
        let label = match (classification.event_type, classification.action_type) {
            (EventType::Pageview, _) => self.pageview_label(page_info),
            (_, ActionType::RageClick) => self.rage_click_label(element_info, page_info),
            (EventType::Click, _) => self.click_label(element_info, page_info),
            (EventType::Navigation, ActionType::Leave) => self.navigation_label(page_info),
            (EventType::Custom, _) => self.custom_label(event_name, properties),
            _ => self.fallback_label(page_info),
        };

        capitalize_first_letter(&truncate_text(&label, self.max_length))
    }

    fn pageview_label(&self, page_info: &PageInfo) -> String {
        format!("viewed {}", page_info.page_title)
    }

    fn click_label(&self, element_info: &ParsedElements, page_info: &PageInfo) -> String {
        if let Some(text) = &element_info.element_text {
            let element_type = self.enrich_element_type(element_info);
            return format!("clicked '{text}' {element_type}");
        }

        let element_type = element_info.element_type.as_deref().unwrap_or("element");
        format!("clicked {element_type} on {}", page_info.page_title)
    }

    /// Rage clicks are a frustration signal; the element is named even
    /// without enrichment.
    fn rage_click_label(&self, element_info: &ParsedElements, page_info: &PageInfo) -> String {
        if let Some(text) = &element_info.element_text {
            let element_type = element_info.element_type.as_deref().unwrap_or("element");
            return format!("rage-clicked '{text}' {element_type}");
        }

        if let Some(element_type) = &element_info.element_type {
            return format!("rage-clicked {element_type} on {}", page_info.page_title);
        }

        format!("rage-clicked on {}", page_info.page_title)
    }

    fn navigation_label(&self, page_info: &PageInfo) -> String {
        format!("left {}", page_info.page_title)
    }

    /// Custom events try the configured template first and fall back to
    /// the humanized event name when the template or a property is missing.
    fn custom_label(&self, event_name: &str, properties: &Properties) -> String {
        if event_name.is_empty() {
            return "custom event".to_string();
        }

        if let Some(template) = self.custom_templates.get(event_name) {
            if let Some(rendered) = render_template(template, properties) {
                return rendered;
            }
        }

        humanize_snake_case_string(event_name)
    }

    fn fallback_label(&self, page_info: &PageInfo) -> String {
        format!("event on {}", page_info.page_title)
    }

    /// Enrich the element type with context from capture attributes.
    ///
    /// The first attribute (in chain order) with a configured rule wins:
    /// a button carrying `nav` becomes a "navigation button".
    fn enrich_element_type(&self, element_info: &ParsedElements) -> String {
        let base_type = element_info.element_type.as_deref().unwrap_or("element");

        for attr_name in element_info.attributes.keys() {
            if let Some(template) = self.enrichment_rules.get(attr_name) {
                return template.replace("{base_type}", base_type);
            }
        }

        base_type.to_string()
    }
}

/// Resolve every `{key}` placeholder from properties. Returns None when any
/// key is missing so the caller can fall back.
fn render_template(template: &str, properties: &Properties) -> Option<String> {
    let mut rendered = String::with_capacity(template.len());
    let mut last_end = 0;

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let matched = caps.get(0)?;
        let value = properties.get(&caps[1])?;

        rendered.push_str(&template[last_end..matched.start()]);
        match value {
            Value::String(s) => rendered.push_str(s),
            other => rendered.push_str(&other.to_string()),
        }
        last_end = matched.end();
    }

    rendered.push_str(&template[last_end..]);
    Some(rendered)
}
