//! Event type definitions for the enrichment pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

use crate::error::Error;

/// Opaque tracker property map (`properties` JSON column).
pub type Properties = serde_json::Map<String, Value>;

/// Queue row lifecycle. Terminal states are write-once from the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RawEventStatus {
    Pending,
    Done,
    Failed,
}

impl RawEventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Done => "DONE",
            Self::Failed => "FAILED",
        }
    }
}

impl FromStr for RawEventStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "DONE" => Ok(Self::Done),
            "FAILED" => Ok(Self::Failed),
            other => Err(Error::validation(format!("invalid raw event status: {other}"))),
        }
    }
}

impl fmt::Display for RawEventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// High-level event category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    Pageview,
    Click,
    Navigation,
    Custom,
    Unknown,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pageview => "pageview",
            Self::Click => "click",
            Self::Navigation => "navigation",
            Self::Custom => "custom",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for EventType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pageview" => Ok(Self::Pageview),
            "click" => Ok(Self::Click),
            "navigation" => Ok(Self::Navigation),
            "custom" => Ok(Self::Custom),
            "unknown" => Ok(Self::Unknown),
            other => Err(Error::validation(format!("invalid event type: {other}"))),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Specific user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    View,
    Leave,
    Click,
    RageClick,
    Submit,
    Change,
    Navigate,
    Unknown,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Leave => "leave",
            Self::Click => "click",
            Self::RageClick => "rage_click",
            Self::Submit => "submit",
            Self::Change => "change",
            Self::Navigate => "navigate",
            Self::Unknown => "unknown",
        }
    }
}

impl FromStr for ActionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "view" => Ok(Self::View),
            "leave" => Ok(Self::Leave),
            "click" => Ok(Self::Click),
            "rage_click" => Ok(Self::RageClick),
            "submit" => Ok(Self::Submit),
            "change" => Ok(Self::Change),
            "navigate" => Ok(Self::Navigate),
            "unknown" => Ok(Self::Unknown),
            other => Err(Error::validation(format!("invalid action type: {other}"))),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordinal severity on a detected pattern. Carries no numeric weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

/// Tracker-shaped event as received on the ingest endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TrackerEvent {
    /// Tracker-level event name (`$pageview`, `product_clicked`, ...)
    #[validate(length(min = 1, max = 200))]
    pub event: String,
    /// Tracker user identifier
    #[validate(length(min = 1, max = 128))]
    pub distinct_id: String,
    /// Opaque property map
    #[serde(default)]
    pub properties: Properties,
    /// Client-side event timestamp
    pub timestamp: DateTime<Utc>,
    /// Serialized DOM path for click-like events
    #[serde(default)]
    pub elements_chain: Option<String>,
}

/// Unprocessed queue row. Created by HTTP ingest, mutated only by the
/// worker, never deleted by the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    pub raw_event_id: Uuid,
    pub event_name: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub properties: Properties,
    pub elements_chain: Option<String>,
    pub processed_at: Option<DateTime<Utc>>,
    pub status: RawEventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RawEvent {
    /// The tracker session this event belongs to, if any.
    pub fn session_id(&self) -> Option<&str> {
        self.properties.get("$session_id").and_then(Value::as_str)
    }

    /// Raw page path property, if the tracker sent one.
    pub fn page_path(&self) -> Option<&str> {
        self.properties.get("$pathname").and_then(Value::as_str)
    }
}

/// Classification result: high-level category plus specific action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventClassification {
    pub event_type: EventType,
    pub action_type: ActionType,
}

/// Insert payload for a derived event row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEventCreate {
    pub raw_event_id: Uuid,
    pub user_id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_name: String,
    pub event_type: EventType,
    pub action_type: ActionType,
    pub semantic_label: String,
    pub page_path: Option<String>,
    pub page_title: Option<String>,
    pub element_type: Option<String>,
    pub element_text: Option<String>,
    pub context: Properties,
    pub sequence_number: i32,
}

/// Derived, classified, labelled, session-attached record consumed
/// downstream. Append-only: exactly one row per successfully processed
/// raw event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedEvent {
    pub enriched_event_id: Uuid,
    pub raw_event_id: Uuid,
    pub user_id: String,
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_name: String,
    pub event_type: EventType,
    pub action_type: ActionType,
    pub semantic_label: String,
    pub page_path: Option<String>,
    pub page_title: Option<String>,
    pub element_type: Option<String>,
    pub element_text: Option<String>,
    pub context: Properties,
    pub sequence_number: i32,
    pub created_at: DateTime<Utc>,
}
