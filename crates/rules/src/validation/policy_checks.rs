//! PolicyChange checks.

use std::collections::HashSet;

use claimscope_core::PolicyChangeEvent;

use super::ValidationResult;

pub fn validate_policy_event(event: &PolicyChangeEvent, path: &str, result: &mut ValidationResult) {
    if event.policy_id.trim().is_empty() {
        result.error(format!("{}.policy_id", path), "policy_id must not be empty");
    }
    if event.affected_code_prefixes.is_empty() {
        result.error(
            format!("{}.affected_code_prefixes", path),
            "at least one procedure code prefix is required",
        );
    }
    for (i, prefix) in event.affected_code_prefixes.iter().enumerate() {
        if prefix.trim().is_empty() {
            result.error(
                format!("{}.affected_code_prefixes[{}]", path, i),
                "a blank prefix would match every claim",
            );
        }
    }
    for (field, days, bound) in [
        ("pre_window_days", event.pre_window_days, event.pre_window_start()),
        ("post_window_days", event.post_window_days, event.post_window_end()),
    ] {
        if days < 0 {
            result.error(
                format!("{}.{}", path, field),
                format!("window size must not be negative, got {}", days),
            );
        } else if bound.is_none() {
            result.error(
                format!("{}.{}", path, field),
                format!(
                    "a {}-day window from {} runs past the supported date range",
                    days, event.effective_date
                ),
            );
        } else if days == 0 {
            result.warn(
                format!("{}.{}", path, field),
                "an empty window never holds claims; the event will report insufficient data",
            );
        }
    }
    if !(event.rebound_ratio_threshold.is_finite() && event.rebound_ratio_threshold > 0.0) {
        result.error(
            format!("{}.rebound_ratio_threshold", path),
            format!("must be a positive number, got {}", event.rebound_ratio_threshold),
        );
    }
}

pub fn validate_policy_events(events: &[PolicyChangeEvent], result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for (i, event) in events.iter().enumerate() {
        let path = format!("policy_events[{}]", i);
        validate_policy_event(event, &path, result);
        if !seen.insert(event.policy_id.as_str()) {
            result.error(
                format!("{}.policy_id", path),
                format!("duplicate policy_id '{}'", event.policy_id),
            );
        }
    }
}
