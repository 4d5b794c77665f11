//! Event classification.
//!
//! Maps a tracker event name plus properties to an `(event_type,
//! action_type)` pair. Tracker system events (`$`-prefixed) use a fixed
//! mapping; `$autocapture` is refined by `properties.$event_type`; anything
//! without the `$` prefix is a custom event whose action is inferred from
//! its name.

use serde_json::Value;

use crate::event::{ActionType, EventClassification, EventType, Properties};

/// Classify a tracker event into event_type and action_type.
pub fn classify_event(event_name: &str, properties: &Properties) -> EventClassification {
    match event_name {
        "$pageview" => EventClassification {
            event_type: EventType::Pageview,
            action_type: ActionType::View,
        },
        "$pageleave" => EventClassification {
            event_type: EventType::Navigation,
            action_type: ActionType::Leave,
        },
        "$rageclick" => EventClassification {
            event_type: EventType::Click,
            action_type: ActionType::RageClick,
        },
        "$autocapture" => classify_autocapture(properties),
        _ if !event_name.starts_with('$') => EventClassification {
            event_type: EventType::Custom,
            action_type: infer_action_from_custom_event(event_name),
        },
        _ => EventClassification {
            event_type: EventType::Unknown,
            action_type: ActionType::Unknown,
        },
    }
}

fn classify_autocapture(properties: &Properties) -> EventClassification {
    let autocapture_type = properties
        .get("$event_type")
        .and_then(Value::as_str)
        .unwrap_or("click");

    let action_type = match autocapture_type {
        "submit" => ActionType::Submit,
        "change" => ActionType::Change,
        _ => ActionType::Click,
    };

    EventClassification {
        event_type: EventType::Click,
        action_type,
    }
}

/// Infer an action type from a custom event name.
///
/// Assumes event names were chosen with attention to the action they
/// represent; this is a heuristic, not an algorithm.
fn infer_action_from_custom_event(event_name: &str) -> ActionType {
    let event_lower = event_name.to_lowercase();

    if ["click", "select", "choose"].iter().any(|kw| event_lower.contains(kw)) {
        return ActionType::Click;
    }

    if ["submit", "complete", "finish"].iter().any(|kw| event_lower.contains(kw)) {
        return ActionType::Submit;
    }

    if ["start", "open", "view", "navigate"].iter().any(|kw| event_lower.contains(kw)) {
        return ActionType::Navigate;
    }

    ActionType::Click
}
