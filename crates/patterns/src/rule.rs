//! Pattern rules: declarative records with a pure match function.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use insights_core::{EnrichedEvent, SessionContext, Severity};

use crate::filter::{EventFilter, SessionFilter};

/// A named behavioural signal derived from a session's events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub code: String,
    pub description: String,
    pub severity: Severity,
}

fn default_min_count() -> usize {
    1
}

/// Declarative pattern rule.
///
/// A rule matches a `(events, session)` pair when its session shape holds,
/// enough positive events survive optional time-window clustering, and no
/// disqualifying negative event is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternRule {
    pub code: String,
    pub description: String,
    pub severity: Severity,

    // Event-based conditions
    #[serde(default)]
    pub filter: Option<EventFilter>,
    #[serde(default = "default_min_count")]
    pub min_count: usize,
    /// Positives must cluster within this window of each other.
    #[serde(default, with = "optional_duration_seconds")]
    pub time_window: Option<Duration>,
    #[serde(default)]
    pub negative_filter: Option<EventFilter>,
    /// Negatives only disqualify within this window after the last positive.
    #[serde(default, with = "optional_duration_seconds")]
    pub negative_time_window: Option<Duration>,

    // Session-based conditions
    #[serde(default)]
    pub session_filter: Option<SessionFilter>,
}

/// Durations configured as plain seconds.
mod optional_duration_seconds {
    use chrono::Duration;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        duration: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match duration {
            Some(d) => serializer.serialize_some(&d.num_seconds()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<i64>::deserialize(deserializer)?.map(Duration::seconds))
    }
}

impl PatternRule {
    /// Check whether the rule matches the session's event stream.
    pub fn matches(&self, events: &[EnrichedEvent], session: &SessionContext) -> bool {
        // Session shape first (cheaper)
        if let Some(session_filter) = &self.session_filter {
            if !session_filter.matches(session) {
                return false;
            }
        }

        // Session-only rule
        let Some(filter) = &self.filter else {
            return true;
        };

        let mut events_sorted: Vec<&EnrichedEvent> = events.iter().collect();
        events_sorted.sort_by_key(|event| event.sequence_number);

        let mut positives = filter.apply(&events_sorted);

        if let Some(window) = self.time_window {
            positives = filter_by_time_window(positives, window);
        }

        if positives.len() < self.min_count {
            return false;
        }

        let Some(negative_filter) = &self.negative_filter else {
            return true;
        };

        let negatives = negative_filter.apply(&events_sorted);

        let Some(negative_window) = self.negative_time_window else {
            return negatives.is_empty();
        };

        // Disqualify on a negative inside the window after the last positive
        let Some(last_positive) = positives.last() else {
            return negatives.is_empty();
        };
        let window_start = last_positive.timestamp;
        let window_end = window_start + negative_window;

        !negatives
            .iter()
            .any(|negative| negative.timestamp >= window_start && negative.timestamp <= window_end)
    }

    pub fn to_pattern(&self) -> Pattern {
        Pattern {
            code: self.code.clone(),
            description: self.description.clone(),
            severity: self.severity,
        }
    }
}

/// Keep only events clustered within `window` of an already-retained event,
/// seeded by the first. Each event is retained at most once.
fn filter_by_time_window<'a>(
    events: Vec<&'a EnrichedEvent>,
    window: Duration,
) -> Vec<&'a EnrichedEvent> {
    let mut retained: Vec<&EnrichedEvent> = Vec::with_capacity(events.len());

    for (i, event) in events.into_iter().enumerate() {
        if i == 0 {
            retained.push(event);
            continue;
        }

        let in_window = retained.iter().any(|prev| {
            let gap = (event.timestamp - prev.timestamp).abs();
            gap <= window
        });
        if in_window {
            retained.push(event);
        }
    }

    retained
}
