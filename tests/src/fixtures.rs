//! Test fixtures and tracker event generators.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use insights_core::{Properties, TrackerEvent};

/// Deterministic base timestamp shared by fixtures.
pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap()
}

/// A tracker event with the given name, properties and chain.
pub fn tracker_event(
    event: &str,
    distinct_id: &str,
    properties: Value,
    elements_chain: Option<&str>,
) -> TrackerEvent {
    let properties: Properties = properties
        .as_object()
        .cloned()
        .unwrap_or_default();

    TrackerEvent {
        event: event.to_string(),
        distinct_id: distinct_id.to_string(),
        properties,
        timestamp: base_time(),
        elements_chain: elements_chain.map(str::to_string),
    }
}

/// `$pageview` on `pathname` with an explicit title.
pub fn pageview(distinct_id: &str, session_id: &str, pathname: &str, title: &str) -> TrackerEvent {
    tracker_event(
        "$pageview",
        distinct_id,
        json!({
            "$session_id": session_id,
            "$pathname": pathname,
            "title": title,
        }),
        None,
    )
}

/// `$rageclick` on `pathname` with a labelled button.
pub fn rage_click(distinct_id: &str, session_id: &str, pathname: &str, text: &str) -> TrackerEvent {
    tracker_event(
        "$rageclick",
        distinct_id,
        json!({
            "$session_id": session_id,
            "$pathname": pathname,
        }),
        Some(&format!(r#"button:text="{text}""#)),
    )
}

/// `$autocapture` form submit with a capture attribute.
pub fn autocapture_submit(distinct_id: &str, session_id: &str, pathname: &str) -> TrackerEvent {
    tracker_event(
        "$autocapture",
        distinct_id,
        json!({
            "$session_id": session_id,
            "$pathname": pathname,
            "$event_type": "submit",
        }),
        Some(r#"button:text="Send"attr__data-ph-capture-attribute-form-id="contact""#),
    )
}

/// Webhook body wrapping a tracker event.
pub fn webhook_payload(event: &TrackerEvent) -> Value {
    json!({ "event": event })
}

/// Webhook body for a raw JSON event fragment.
pub fn webhook_payload_json(event: Value) -> Value {
    json!({ "event": event })
}
