//! BenchmarkSet checks.

use std::collections::HashSet;

use super::fuzzy::did_you_mean;
use super::{non_negative, ValidationResult};
use crate::benchmark_config::{BenchmarkBaseline, BENCHMARK_METRICS};

pub fn validate_benchmarks(baselines: &[BenchmarkBaseline], path: &str, result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for (i, b) in baselines.iter().enumerate() {
        let at = format!("{}[{}]", path, i);
        if b.metric_name.trim().is_empty() {
            result.error(format!("{}.metric_name", at), "metric_name must not be empty");
            continue;
        }
        if !seen.insert(b.metric_name.as_str()) {
            result.error(
                format!("{}.metric_name", at),
                format!("duplicate baseline for metric '{}'", b.metric_name),
            );
        }
        if !BENCHMARK_METRICS.contains(&b.metric_name.as_str()) {
            let message = format!(
                "metric '{}' is not computed from claims{}",
                b.metric_name,
                did_you_mean(&b.metric_name, BENCHMARK_METRICS)
            );
            result.warn(format!("{}.metric_name", at), message);
        }
        if !b.baseline_value.is_finite() {
            result.error(format!("{}.baseline_value", at), "baseline_value must be finite");
        } else if b.baseline_value == 0.0 {
            result.warn(
                format!("{}.baseline_value", at),
                "a zero baseline has no defined variance; the metric will be excluded",
            );
        }
        if !non_negative(b.threshold_pct) {
            result.error(
                format!("{}.threshold_pct", at),
                format!("must be finite and non-negative, got {}", b.threshold_pct),
            );
        }
    }
}
