//! Internal metrics versus peer baselines.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use claimscope_core::{denial_approval_rates, Claim, RunWarning};
use claimscope_rules::BenchmarkBaseline;

/// Metric name → value computed from the run's claims.
pub type InternalMetrics = BTreeMap<String, f64>;

/// `denial_rate`, `approval_rate`, `oon_rate` and `cost_per_claim` over
/// the whole claims slice. Every metric is 0 for an empty slice.
pub fn internal_metrics(claims: &[Claim]) -> InternalMetrics {
    let n = claims.len();
    let (denial_rate, approval_rate) = denial_approval_rates(claims);
    let (oon_rate, cost_per_claim) = if n == 0 {
        (0.0, 0.0)
    } else {
        let oon = claims.iter().filter(|c| c.is_oon()).count();
        let allowed: f64 = claims.iter().map(|c| c.allowed_amount).sum();
        (oon as f64 / n as f64, allowed / n as f64)
    };

    BTreeMap::from([
        ("denial_rate".to_string(), denial_rate),
        ("approval_rate".to_string(), approval_rate),
        ("oon_rate".to_string(), oon_rate),
        ("cost_per_claim".to_string(), cost_per_claim),
    ])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Above,
    Below,
    Within,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkComparison {
    pub metric_name: String,
    pub internal_value: f64,
    pub baseline_value: f64,
    /// `(internal - baseline) / baseline` as a fraction.
    pub variance_pct: f64,
    pub threshold_pct: f64,
    pub flagged: bool,
    pub direction: Direction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkOutcome {
    pub comparisons: Vec<BenchmarkComparison>,
    pub warnings: Vec<RunWarning>,
}

impl BenchmarkOutcome {
    pub fn flagged_count(&self) -> usize {
        self.comparisons.iter().filter(|c| c.flagged).count()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BenchmarkComparator;

impl BenchmarkComparator {
    pub fn new() -> Self {
        Self
    }

    /// Compare each baseline, in baseline order. Zero baselines and
    /// metrics the run did not compute are excluded with a warning.
    pub fn compare(&self, internal: &InternalMetrics, baselines: &[BenchmarkBaseline]) -> BenchmarkOutcome {
        let mut outcome = BenchmarkOutcome::default();

        for baseline in baselines {
            let metric = baseline.metric_name.as_str();
            let Some(&internal_value) = internal.get(metric) else {
                warn!(metric, "benchmark metric not computed, skipping");
                outcome.warnings.push(RunWarning::MissingInternalMetric {
                    metric_name: metric.to_string(),
                });
                continue;
            };
            if baseline.baseline_value == 0.0 {
                warn!(metric, "zero benchmark baseline, skipping");
                outcome.warnings.push(RunWarning::DegenerateBaseline {
                    metric_name: metric.to_string(),
                });
                continue;
            }

            let variance_pct = (internal_value - baseline.baseline_value) / baseline.baseline_value;
            let flagged = variance_pct.abs() > baseline.threshold_pct;
            let direction = match (flagged, variance_pct > 0.0) {
                (false, _) => Direction::Within,
                (true, true) => Direction::Above,
                (true, false) => Direction::Below,
            };

            outcome.comparisons.push(BenchmarkComparison {
                metric_name: metric.to_string(),
                internal_value,
                baseline_value: baseline.baseline_value,
                variance_pct,
                threshold_pct: baseline.threshold_pct,
                flagged,
                direction,
            });
        }

        info!(
            compared = outcome.comparisons.len(),
            flagged = outcome.flagged_count(),
            excluded = outcome.warnings.len(),
            "benchmarks compared"
        );
        outcome
    }
}
