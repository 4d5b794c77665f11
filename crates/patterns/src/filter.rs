//! Event and session predicates.

use serde::{Deserialize, Serialize};

use insights_core::{ActionType, EnrichedEvent, EventType, SessionContext};

/// Predicate over a single enriched event. All set fields must hold.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    pub event_type: Option<EventType>,
    pub action_type: Option<ActionType>,
    pub page_path_prefix: Option<String>,
    pub page_path_equals: Option<String>,
    /// Case-insensitive substring over the semantic label.
    pub semantic_contains: Option<String>,
}

impl EventFilter {
    /// True when every set condition holds for the event.
    pub fn matches(&self, event: &EnrichedEvent) -> bool {
        if let Some(event_type) = self.event_type {
            if event.event_type != event_type {
                return false;
            }
        }
        if let Some(action_type) = self.action_type {
            if event.action_type != action_type {
                return false;
            }
        }
        if let Some(prefix) = &self.page_path_prefix {
            if !event.page_path.as_deref().unwrap_or("").starts_with(prefix) {
                return false;
            }
        }
        if let Some(path) = &self.page_path_equals {
            if event.page_path.as_deref() != Some(path.as_str()) {
                return false;
            }
        }
        if let Some(needle) = &self.semantic_contains {
            if !event
                .semantic_label
                .to_lowercase()
                .contains(&needle.to_lowercase())
            {
                return false;
            }
        }
        true
    }

    /// Filter a slice down to the matching events, preserving order.
    pub fn apply<'a>(&self, events: &[&'a EnrichedEvent]) -> Vec<&'a EnrichedEvent> {
        events
            .iter()
            .copied()
            .filter(|event| self.matches(event))
            .collect()
    }
}

/// Predicate over the session shape. `min_*` means `actual >= bound`,
/// `max_*` means `actual <= bound`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionFilter {
    pub min_duration_seconds: Option<f64>,
    pub max_duration_seconds: Option<f64>,
    pub min_events: Option<i32>,
    pub max_events: Option<i32>,
    pub min_page_views: Option<i32>,
    pub max_page_views: Option<i32>,
}

impl SessionFilter {
    /// True when the session satisfies every set bound.
    ///
    /// An active session has no duration, so any set duration bound fails.
    pub fn matches(&self, session: &SessionContext) -> bool {
        if let Some(min) = self.min_duration_seconds {
            match session.duration_seconds() {
                Some(duration) if duration >= min => {}
                _ => return false,
            }
        }
        if let Some(max) = self.max_duration_seconds {
            match session.duration_seconds() {
                Some(duration) if duration <= max => {}
                _ => return false,
            }
        }
        if let Some(min) = self.min_events {
            if session.event_count < min {
                return false;
            }
        }
        if let Some(max) = self.max_events {
            if session.event_count > max {
                return false;
            }
        }
        if let Some(min) = self.min_page_views {
            if session.page_views_count < min {
                return false;
            }
        }
        if let Some(max) = self.max_page_views {
            if session.page_views_count > max {
                return false;
            }
        }
        true
    }
}
