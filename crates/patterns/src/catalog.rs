//! Built-in pattern rule catalogue.
//!
//! Seed rules loaded at startup. Deployments can extend or replace them
//! through the config file layer.

use chrono::Duration;

use insights_core::{ActionType, EventType, Severity};

use crate::filter::{EventFilter, SessionFilter};
use crate::rule::PatternRule;

fn rule(code: &str, description: &str, severity: Severity) -> PatternRule {
    PatternRule {
        code: code.to_string(),
        description: description.to_string(),
        severity,
        filter: None,
        min_count: 1,
        time_window: None,
        negative_filter: None,
        negative_time_window: None,
        session_filter: None,
    }
}

/// The default rule set.
pub fn default_rules() -> Vec<PatternRule> {
    vec![
        PatternRule {
            filter: Some(EventFilter {
                semantic_contains: Some("checkout".into()),
                ..Default::default()
            }),
            negative_filter: Some(EventFilter {
                semantic_contains: Some("completed".into()),
                ..Default::default()
            }),
            negative_time_window: Some(Duration::minutes(30)),
            ..rule(
                "checkout_abandoned",
                "Started checkout but did not complete the purchase",
                Severity::High,
            )
        },
        PatternRule {
            filter: Some(EventFilter {
                action_type: Some(ActionType::RageClick),
                page_path_prefix: Some("/payment".into()),
                ..Default::default()
            }),
            ..rule(
                "payment_failure_frustration",
                "Rage-clicked on the payment page, likely a failing payment flow",
                Severity::High,
            )
        },
        PatternRule {
            filter: Some(EventFilter {
                page_path_prefix: Some("/signup".into()),
                ..Default::default()
            }),
            negative_filter: Some(EventFilter {
                semantic_contains: Some("completed".into()),
                ..Default::default()
            }),
            negative_time_window: Some(Duration::minutes(30)),
            ..rule(
                "signup_abandonment",
                "Visited signup but never completed registration",
                Severity::Medium,
            )
        },
        PatternRule {
            filter: Some(EventFilter {
                page_path_prefix: Some("/billing".into()),
                ..Default::default()
            }),
            min_count: 3,
            time_window: Some(Duration::minutes(10)),
            ..rule(
                "billing_hesitation",
                "Returned to billing repeatedly without acting",
                Severity::Medium,
            )
        },
        PatternRule {
            filter: Some(EventFilter {
                action_type: Some(ActionType::Change),
                ..Default::default()
            }),
            min_count: 5,
            time_window: Some(Duration::minutes(5)),
            ..rule(
                "form_struggle",
                "Many rapid form field changes, user may be struggling with a form",
                Severity::Medium,
            )
        },
        PatternRule {
            filter: Some(EventFilter {
                page_path_prefix: Some("/pricing".into()),
                ..Default::default()
            }),
            min_count: 3,
            time_window: Some(Duration::minutes(15)),
            ..rule(
                "price_comparison_loop",
                "Circling back to pricing, comparing plans",
                Severity::Low,
            )
        },
        PatternRule {
            session_filter: Some(SessionFilter {
                max_duration_seconds: Some(30.0),
                max_events: Some(3),
                ..Default::default()
            }),
            ..rule(
                "quick_bounce",
                "Left almost immediately after arriving",
                Severity::Low,
            )
        },
        PatternRule {
            session_filter: Some(SessionFilter {
                min_duration_seconds: Some(600.0),
                min_events: Some(30),
                min_page_views: Some(10),
                ..Default::default()
            }),
            ..rule(
                "power_user_session",
                "Long, highly active session across many pages",
                Severity::Low,
            )
        },
        PatternRule {
            filter: Some(EventFilter {
                event_type: Some(EventType::Pageview),
                ..Default::default()
            }),
            min_count: 5,
            session_filter: Some(SessionFilter {
                min_page_views: Some(5),
                ..Default::default()
            }),
            ..rule(
                "feature_exploration",
                "Browsed through many distinct areas of the product",
                Severity::Low,
            )
        },
        PatternRule {
            filter: Some(EventFilter {
                semantic_contains: Some("product".into()),
                ..Default::default()
            }),
            min_count: 3,
            time_window: Some(Duration::minutes(10)),
            ..rule(
                "product_comparison",
                "Interacted with several products in quick succession",
                Severity::Low,
            )
        },
    ]
}
