//! Context assembly.
//!
//! Builds the context blob persisted with every enriched event: useful
//! property metadata plus element attributes, with tracker internals
//! filtered out. Pure and deterministic.

use std::collections::HashSet;

use serde_json::Value;

use crate::elements::ParsedElements;
use crate::event::Properties;
use crate::text::hyphens_to_snake_case;

/// Build the context map for an enriched event.
///
/// Tracker-internal (`$`-prefixed) and excluded keys are dropped; element
/// capture attributes are added with snake_case keys and overwrite property
/// values on collision; the DOM hierarchy and original event name round it
/// out.
pub fn build_context(
    event_name: &str,
    properties: &Properties,
    element_info: &ParsedElements,
    excluded_keys: &HashSet<String>,
) -> Properties {
    let mut context = Properties::new();

    for (key, value) in properties {
        if key.starts_with('$') || excluded_keys.contains(key) {
            continue;
        }
        context.insert(key.clone(), value.clone());
    }

    for (attr_name, attr_value) in &element_info.attributes {
        context.insert(
            hyphens_to_snake_case(attr_name),
            Value::String(attr_value.clone()),
        );
    }

    if !element_info.hierarchy.is_empty() {
        context.insert(
            "hierarchy".to_string(),
            Value::Array(
                element_info
                    .hierarchy
                    .iter()
                    .map(|tag| Value::String(tag.clone()))
                    .collect(),
            ),
        );
    }

    if !event_name.is_empty() {
        context.insert(
            "posthog_event".to_string(),
            Value::String(event_name.to_string()),
        );
    }

    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EnrichmentSettings;
    use indexmap::IndexMap;
    use serde_json::json;

    fn excluded() -> HashSet<String> {
        EnrichmentSettings::default().context_exclude_keys
    }

    #[test]
    fn test_filters_tracker_internals_and_excluded_keys() {
        let mut properties = Properties::new();
        properties.insert("$session_id".into(), json!("s1"));
        properties.insert("$pathname".into(), json!("/home"));
        properties.insert("token".into(), json!("secret"));
        properties.insert("distinct_id".into(), json!("u1"));
        properties.insert("plan".into(), json!("pro"));

        let context = build_context("", &properties, &ParsedElements::default(), &excluded());

        assert_eq!(context.len(), 1);
        assert_eq!(context["plan"], json!("pro"));
    }

    #[test]
    fn test_attributes_overwrite_properties() {
        let mut properties = Properties::new();
        properties.insert("form_id".into(), json!("stale"));

        let element_info = ParsedElements {
            attributes: IndexMap::from([("form-id".to_string(), "contact".to_string())]),
            ..Default::default()
        };

        let context = build_context("", &properties, &element_info, &excluded());

        assert_eq!(context["form_id"], json!("contact"));
    }

    #[test]
    fn test_hierarchy_and_event_name_included() {
        let element_info = ParsedElements {
            hierarchy: vec!["button".into(), "nav".into()],
            ..Default::default()
        };

        let context = build_context("$autocapture", &Properties::new(), &element_info, &excluded());

        assert_eq!(context["hierarchy"], json!(["button", "nav"]));
        assert_eq!(context["posthog_event"], json!("$autocapture"));
    }

    #[test]
    fn test_empty_inputs_yield_empty_context() {
        let context = build_context("", &Properties::new(), &ParsedElements::default(), &excluded());
        assert!(context.is_empty());
    }
}
