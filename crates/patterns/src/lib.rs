//! Declarative behavioural pattern detection.
//!
//! Rules are plain data records with a pure `matches` function; the engine
//! maps a fixed rule list over `(events, session)` pairs and returns the
//! matched patterns in rule order.

pub mod catalog;
pub mod engine;
pub mod filter;
pub mod rule;

pub use catalog::default_rules;
pub use engine::PatternEngine;
pub use filter::{EventFilter, SessionFilter};
pub use rule::{Pattern, PatternRule};


#[cfg(test)]
mod filter_tests {
    use super::filter::{EventFilter, SessionFilter};
    use super::testutil::{enriched_event, session_context};
    use insights_core::{ActionType, EnrichedEvent, EventType};

    fn sample_events() -> Vec<EnrichedEvent> {
        vec![
            enriched_event(1, 0, EventType::Pageview, ActionType::View, "Viewed home page", "/home"),
            enriched_event(2, 10, EventType::Custom, ActionType::Click, "Selected product: Drone", "/products"),
            enriched_event(3, 20, EventType::Click, ActionType::RageClick, "Rage-clicked checkout button", "/checkout"),
        ]
    }

    fn apply(filter: EventFilter) -> usize {
        let events = sample_events();
        let refs: Vec<&EnrichedEvent> = events.iter().collect();
        filter.apply(&refs).len()
    }

    #[test]
    fn test_event_filter_single_conditions() {
        assert_eq!(apply(EventFilter { event_type: Some(EventType::Pageview), ..Default::default() }), 1);
        assert_eq!(apply(EventFilter { action_type: Some(ActionType::RageClick), ..Default::default() }), 1);
        assert_eq!(apply(EventFilter { page_path_prefix: Some("/prod".into()), ..Default::default() }), 1);
        assert_eq!(apply(EventFilter { page_path_equals: Some("/home".into()), ..Default::default() }), 1);
        assert_eq!(apply(EventFilter { event_type: Some(EventType::Navigation), ..Default::default() }), 0);
    }

    #[test]
    fn test_semantic_contains_is_case_insensitive() {
        for needle in ["product", "PRODUCT", "pRoDuCt"] {
            assert_eq!(
                apply(EventFilter {
                    semantic_contains: Some(needle.into()),
                    ..Default::default()
                }),
                1,
                "{needle}"
            );
        }
    }

    #[test]
    fn test_event_filter_conditions_are_conjunctive() {
        assert_eq!(
            apply(EventFilter {
                event_type: Some(EventType::Custom),
                semantic_contains: Some("product".into()),
                ..Default::default()
            }),
            1
        );
        assert_eq!(
            apply(EventFilter {
                event_type: Some(EventType::Pageview),
                semantic_contains: Some("product".into()),
                ..Default::default()
            }),
            0
        );
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        assert_eq!(apply(EventFilter::default()), 3);
    }

    #[test]
    fn test_session_filter_bounds() {
        let session = session_context(10, 5, 5, Some(5));

        assert!(SessionFilter { min_duration_seconds: Some(4.0), ..Default::default() }.matches(&session));
        assert!(!SessionFilter { min_duration_seconds: Some(600.0), ..Default::default() }.matches(&session));
        assert!(SessionFilter { max_duration_seconds: Some(600.0), ..Default::default() }.matches(&session));
        assert!(!SessionFilter { max_duration_seconds: Some(4.0), ..Default::default() }.matches(&session));
        assert!(SessionFilter { min_events: Some(5), ..Default::default() }.matches(&session));
        assert!(!SessionFilter { min_events: Some(20), ..Default::default() }.matches(&session));
        assert!(SessionFilter { max_events: Some(20), ..Default::default() }.matches(&session));
        assert!(!SessionFilter { max_events: Some(5), ..Default::default() }.matches(&session));
        assert!(SessionFilter { min_page_views: Some(3), ..Default::default() }.matches(&session));
        assert!(!SessionFilter { min_page_views: Some(6), ..Default::default() }.matches(&session));
        assert!(SessionFilter { max_page_views: Some(10), ..Default::default() }.matches(&session));
        assert!(!SessionFilter { max_page_views: Some(1), ..Default::default() }.matches(&session));
    }

    #[test]
    fn test_session_filter_zero_bound_is_honored() {
        let session = session_context(10, 5, 5, Some(5));
        // max_events of 0 is a real bound, not "unset"
        assert!(!SessionFilter { max_events: Some(0), ..Default::default() }.matches(&session));
    }

    #[test]
    fn test_active_session_fails_any_duration_bound() {
        let active = session_context(5, 2, 3, None);

        assert!(!SessionFilter { min_duration_seconds: Some(60.0), ..Default::default() }.matches(&active));
        assert!(!SessionFilter { max_duration_seconds: Some(60.0), ..Default::default() }.matches(&active));
        // Non-duration bounds still evaluate
        assert!(SessionFilter { min_events: Some(5), ..Default::default() }.matches(&active));
    }

    #[test]
    fn test_empty_session_filter_matches() {
        assert!(SessionFilter::default().matches(&session_context(0, 0, 0, None)));
    }
}
