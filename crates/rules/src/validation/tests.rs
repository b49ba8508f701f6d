use chrono::NaiveDate;

use claimscope_core::{AnalysisError, ChangeType, PolicyChangeEvent};

use super::*;
use crate::benchmark_config::BenchmarkBaseline;
use crate::loader::parse_document;

fn event(policy_id: &str) -> PolicyChangeEvent {
    PolicyChangeEvent {
        policy_id: policy_id.to_string(),
        description: "Removed prior auth for imaging".to_string(),
        affected_code_prefixes: vec!["CPT-7".to_string()],
        change_type: ChangeType::Removed,
        effective_date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        pre_window_days: 84,
        post_window_days: 84,
        rebound_ratio_threshold: 1.1,
    }
}

fn paths(result: &ValidationResult) -> Vec<&str> {
    result.errors.iter().map(|e| e.path.as_str()).collect()
}

#[test]
fn default_config_is_valid() {
    let result = validate_analysis_config(&AnalysisConfig::default());
    assert!(result.is_valid(), "{:?}", result.errors);
    assert!(result.errors.is_empty());
}

#[test]
fn negative_cost_per_appeal_rejected() {
    let mut config = AnalysisConfig::default();
    config.appeals.cost_per_appeal = -1.0;

    let err = validate_analysis_config(&config).into_result().unwrap_err();
    match err {
        AnalysisError::InvalidConfiguration { field, .. } => {
            assert_eq!(field, "appeals.cost_per_appeal")
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn negative_windows_and_empty_prefixes_rejected() {
    let mut bad = event("POL-9");
    bad.pre_window_days = -7;
    bad.affected_code_prefixes.clear();

    let mut config = AnalysisConfig::default();
    config.policy_events = vec![event("POL-1"), bad];

    let result = validate_analysis_config(&config);
    assert!(!result.is_valid());
    assert_eq!(
        paths(&result),
        vec![
            "policy_events[1].affected_code_prefixes",
            "policy_events[1].pre_window_days",
        ]
    );
}

#[test]
fn blank_prefix_and_zero_ratio_rejected() {
    let mut bad = event("POL-2");
    bad.affected_code_prefixes = vec!["  ".to_string()];
    bad.rebound_ratio_threshold = 0.0;

    let mut result = ValidationResult::new();
    validate_policy_event(&bad, "spec", &mut result);
    assert_eq!(
        paths(&result),
        vec!["spec.affected_code_prefixes[0]", "spec.rebound_ratio_threshold"]
    );
}

#[test]
fn duplicate_policy_ids_rejected() {
    let mut config = AnalysisConfig::default();
    config.policy_events = vec![event("POL-1"), event("POL-1")];
    let result = validate_analysis_config(&config);
    assert_eq!(paths(&result), vec!["policy_events[1].policy_id"]);
}

#[test]
fn zero_window_only_warns() {
    let mut e = event("POL-3");
    e.post_window_days = 0;
    let mut result = ValidationResult::new();
    validate_policy_event(&e, "spec", &mut result);
    assert!(result.is_valid());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn window_past_calendar_range_rejected() {
    let mut e = event("POL-4");
    e.pre_window_days = 200_000_000;
    e.post_window_days = i64::MAX;
    let mut result = ValidationResult::new();
    validate_policy_event(&e, "spec", &mut result);
    assert_eq!(paths(&result), vec!["spec.pre_window_days", "spec.post_window_days"]);
    assert!(result.errors[0].message.contains("supported date range"));
}

#[test]
fn unknown_metric_warns_with_suggestion() {
    let mut result = ValidationResult::new();
    validate_benchmarks(
        &[BenchmarkBaseline::new("denial_rte", 0.08, 0.15)],
        "benchmarks",
        &mut result,
    );
    assert!(result.is_valid());
    assert!(result.warnings[0].message.contains("did you mean 'denial_rate'"));
}

#[test]
fn zero_baseline_warns_negative_threshold_errors() {
    let mut result = ValidationResult::new();
    validate_benchmarks(
        &[
            BenchmarkBaseline::new("oon_rate", 0.0, 0.2),
            BenchmarkBaseline::new("denial_rate", 0.08, -0.1),
        ],
        "benchmarks",
        &mut result,
    );
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(paths(&result), vec!["benchmarks[1].threshold_pct"]);
}

#[test]
fn severity_cutoffs_must_be_ordered() {
    let mut config = AnalysisConfig::default();
    config.detection.severity.medium_excess = 0.6;
    let result = validate_analysis_config(&config);
    assert_eq!(paths(&result), vec!["detection.severity.medium_excess"]);
}

#[test]
fn percentile_must_be_a_fraction() {
    let mut config = AnalysisConfig::default();
    config.detection.new_entity_percentile = 90.0;
    let result = validate_analysis_config(&config);
    assert_eq!(paths(&result), vec!["detection.new_entity_percentile"]);
}

#[test]
fn into_result_joins_all_errors() {
    let mut config = AnalysisConfig::default();
    config.appeals.cost_per_appeal = -5.0;
    config.detection.zscore_multiplier = 0.0;

    let err = validate_analysis_config(&config).into_result().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Invalid configuration at detection.zscore_multiplier"));
    assert!(message.contains("appeals.cost_per_appeal"));
}

#[test]
fn document_header_checks() {
    let doc = parse_document(
        r#"
apiVersion: v2
kind: PolicyChange
metadata:
  id: POL_001
  name: Bad header
spec:
  policy_id: POL-001
  affected_code_prefixes: ["CPT-7"]
  change_type: added
  effective_date: 2024-01-01
"#,
    )
    .unwrap();
    let result = validate_document(&doc);
    assert_eq!(paths(&result), vec!["apiVersion", "metadata.id"]);
}
