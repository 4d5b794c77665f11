//! Page info derivation from tracker properties.

use serde_json::Value;

use crate::event::Properties;

/// Page path and title extracted from event properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub page_path: String,
    pub page_title: String,
}

/// Strip trailing slashes, keeping the bare root.
pub fn normalize_page_path(page_path: &str) -> String {
    if page_path == "/" {
        "/".to_string()
    } else {
        page_path.trim_end_matches('/').to_string()
    }
}

/// Convert a page path to a human-readable page name.
///
/// ```
/// use insights_core::page::humanize_page_path;
/// assert_eq!(humanize_page_path("/about"), "about page");
/// ```
pub fn humanize_page_path(page_path: &str) -> String {
    let path = page_path.trim_matches('/');

    if path.is_empty() {
        return "home page".to_string();
    }

    // First segment only ("billing/settings" reads as the billing page)
    let first_segment = path.split('/').next().unwrap_or(path);
    let humanized = first_segment.replace(['_', '-'], " ");
    format!("{humanized} page")
}

/// Extract page path and title from tracker event properties.
///
/// Path defaults to the root and loses trailing slashes; title falls back
/// to the humanized first path segment when the tracker sent none.
pub fn extract_page_info(properties: &Properties) -> PageInfo {
    let page_path = properties
        .get("$pathname")
        .and_then(Value::as_str)
        .unwrap_or("/");
    let page_path = normalize_page_path(page_path);

    let page_title = properties
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| humanize_page_path(&page_path));

    PageInfo {
        page_path,
        page_title,
    }
}
