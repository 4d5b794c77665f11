//! Pattern engine: maps a fixed rule set over session event streams.

use insights_core::{EnrichedEvent, SessionContext};

use crate::rule::{Pattern, PatternRule};

/// Pure evaluator over a list of pattern rules.
///
/// The rule set is fixed at construction; `detect` performs no I/O and is
/// referentially transparent for fixed inputs.
#[derive(Debug, Clone)]
pub struct PatternEngine {
    rules: Vec<PatternRule>,
}

impl PatternEngine {
    pub fn new(rules: Vec<PatternRule>) -> Self {
        Self { rules }
    }

    /// Detect patterns in a session's events, in rule order.
    pub fn detect(&self, events: &[EnrichedEvent], session: &SessionContext) -> Vec<Pattern> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(events, session))
            .map(PatternRule::to_pattern)
            .collect()
    }
}
