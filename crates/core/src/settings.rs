//! Enrichment configuration.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// Default cap on semantic label length.
pub const SEMANTIC_LABEL_MAX_LENGTH: usize = 150;

/// Default number of unique page titles quoted in a session summary.
pub const PAGES_IN_SUMMARY_LIMIT: usize = 3;

/// Tunables for label building, context assembly and summaries.
///
/// All fields default in code and can be overridden through the config
/// file layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentSettings {
    #[serde(default = "default_semantic_label_max_length")]
    pub semantic_label_max_length: usize,
    #[serde(default = "default_pages_in_summary_limit")]
    pub pages_in_summary_limit: usize,
    /// Label templates for known custom events, keyed by event name.
    /// `{placeholder}` tokens resolve from event properties.
    #[serde(default = "default_custom_event_templates")]
    pub custom_event_templates: HashMap<String, String>,
    /// Element-type enrichment rules keyed by capture-attribute name.
    /// `{base_type}` resolves to the parsed element type.
    #[serde(default = "default_element_enrichment_rules")]
    pub element_enrichment_rules: HashMap<String, String>,
    /// Property keys dropped from the assembled context.
    #[serde(default = "default_context_exclude_keys")]
    pub context_exclude_keys: HashSet<String>,
}

fn default_semantic_label_max_length() -> usize {
    SEMANTIC_LABEL_MAX_LENGTH
}

fn default_pages_in_summary_limit() -> usize {
    PAGES_IN_SUMMARY_LIMIT
}

fn default_custom_event_templates() -> HashMap<String, String> {
    HashMap::from([
        ("product_clicked".to_string(), "Selected product: {product_name}".to_string()),
        ("plan_upgrade_started".to_string(), "Started plan upgrade".to_string()),
        (
            "plan_upgrade_completed".to_string(),
            "Completed plan upgrade to {plan_name}".to_string(),
        ),
        ("form_submitted".to_string(), "Submitted {form_name} form".to_string()),
    ])
}

fn default_element_enrichment_rules() -> HashMap<String, String> {
    HashMap::from([
        ("nav".to_string(), "navigation {base_type}".to_string()),
        ("product-id".to_string(), "product card".to_string()),
        ("product-name".to_string(), "product card".to_string()),
        ("form-id".to_string(), "{base_type} in form".to_string()),
    ])
}

fn default_context_exclude_keys() -> HashSet<String> {
    HashSet::from(["token".to_string(), "distinct_id".to_string()])
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            semantic_label_max_length: default_semantic_label_max_length(),
            pages_in_summary_limit: default_pages_in_summary_limit(),
            custom_event_templates: default_custom_event_templates(),
            element_enrichment_rules: default_element_enrichment_rules(),
            context_exclude_keys: default_context_exclude_keys(),
        }
    }
}
