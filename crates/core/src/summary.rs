//! Session summary generation.

use std::collections::HashSet;

use crate::event::{ActionType, EnrichedEvent, EventType};

/// Generate a human-readable summary from a session's enriched events.
///
/// Pure function, no queries. Counts pageviews, clicks (rage clicks
/// included), rage clicks and custom events, quoting up to `pages_limit`
/// unique page titles in first-seen order.
pub fn generate_events_summary(events: &[EnrichedEvent], pages_limit: usize) -> String {
    if events.is_empty() {
        return "No activity recorded".to_string();
    }

    let page_views: Vec<&EnrichedEvent> = events
        .iter()
        .filter(|e| e.event_type == EventType::Pageview)
        .collect();
    let clicks = events
        .iter()
        .filter(|e| e.event_type == EventType::Click)
        .count();
    let rage_clicks = events
        .iter()
        .filter(|e| e.action_type == ActionType::RageClick)
        .count();
    let custom_events = events
        .iter()
        .filter(|e| e.event_type == EventType::Custom)
        .count();

    let mut unique_pages: Vec<&str> = Vec::new();
    let mut seen_pages: HashSet<&str> = HashSet::new();
    for event in &page_views {
        if unique_pages.len() >= pages_limit {
            break;
        }
        if let Some(title) = event.page_title.as_deref().filter(|t| !t.is_empty()) {
            if seen_pages.insert(title) {
                unique_pages.push(title);
            }
        }
    }

    let mut parts: Vec<String> = Vec::new();

    if !page_views.is_empty() {
        if unique_pages.is_empty() {
            parts.push(format!("Viewed {} pages", page_views.len()));
        } else {
            parts.push(format!(
                "Viewed {} pages including {}",
                page_views.len(),
                unique_pages.join(", ")
            ));
        }
    }

    if clicks > 0 {
        parts.push(format!("Clicked {clicks} times"));
    }

    if rage_clicks > 0 {
        parts.push(format!("Rage-clicked {rage_clicks} times (frustration detected)"));
    }

    if custom_events > 0 {
        parts.push(format!("Triggered {custom_events} custom events"));
    }

    if parts.is_empty() {
        parts.push("No significant activity".to_string());
    }

    let mut summary = parts.join(". ");
    if !summary.ends_with('.') {
        summary.push('.');
    }

    summary
}
