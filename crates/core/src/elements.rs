//! Element-chain parsing.
//!
//! Decodes the tracker's serialized DOM-path string (`elements_chain`) into
//! structured element info. The chain is `;`-separated, each segment opening
//! with a tag name and optionally carrying concatenated `key="value"` forms:
//!
//! `button.btn:text="Send"attr__data-ph-capture-attribute-form-id="contact";form;div`

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum DOM levels kept in the hierarchy.
const MAX_HIERARCHY_DEPTH: usize = 5;

static ELEMENT_TYPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?i)([a-z0-9]+)").expect("invalid element type regex"));
static TEXT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"text="([^"]*)""#).expect("invalid text regex"));
static ALT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"attr__alt="([^"]*)""#).expect("invalid alt regex"));
static CAPTURE_ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"attr__data-ph-capture-attribute-([^=]+)="([^"]*)""#)
        .expect("invalid capture attribute regex")
});

/// Structured element info parsed from an elements chain.
///
/// Attribute order matters: label enrichment scans attributes first-match in
/// the order they appear in the chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedElements {
    pub element_type: Option<String>,
    pub element_text: Option<String>,
    pub attributes: IndexMap<String, String>,
    pub hierarchy: Vec<String>,
}

/// Parse a tracker elements chain into structured element information.
///
/// Extraction order:
/// 1. Element type - leading tag name of the first segment, lowercased
/// 2. Element text - first `text="..."`, falling back to `attr__alt="..."`
/// 3. Custom attributes - all `attr__data-ph-capture-attribute-*` pairs
/// 4. Hierarchy - tag names of the first 5 segments
///
/// Never fails: malformed input yields a best-effort partial result. Quoted
/// values are consumed up to the next `"`; escaped quotes are not supported.
pub fn parse_elements_chain(chain: &str) -> ParsedElements {
    if chain.trim().is_empty() {
        return ParsedElements::default();
    }

    let segments: Vec<&str> = chain.split(';').collect();
    let first_segment = segments[0].trim();

    let element_type = ELEMENT_TYPE_RE
        .captures(first_segment)
        .map(|caps| caps[1].to_lowercase());

    let element_text = TEXT_RE
        .captures(first_segment)
        .or_else(|| ALT_RE.captures(first_segment))
        .map(|caps| caps[1].to_string());

    let mut attributes = IndexMap::new();
    for caps in CAPTURE_ATTR_RE.captures_iter(first_segment) {
        attributes.insert(caps[1].to_string(), caps[2].to_string());
    }

    let hierarchy = segments
        .iter()
        .take(MAX_HIERARCHY_DEPTH)
        .filter_map(|segment| {
            ELEMENT_TYPE_RE
                .captures(segment.trim())
                .map(|caps| caps[1].to_lowercase())
        })
        .collect();

    ParsedElements {
        element_type,
        element_text,
        attributes,
        hierarchy,
    }
}
