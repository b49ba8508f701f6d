//! BenchmarkSet document kind: peer baselines with per-metric variance thresholds.

use serde::{Deserialize, Serialize};

/// Metrics the engine computes from claims and can benchmark.
pub const BENCHMARK_METRICS: &[&str] = &["denial_rate", "approval_rate", "oon_rate", "cost_per_claim"];

/// One peer baseline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkBaseline {
    pub metric_name: String,
    pub baseline_value: f64,
    /// Allowed relative variance (fraction) before the metric is flagged.
    #[serde(default = "default_threshold_pct")]
    pub threshold_pct: f64,
}

fn default_threshold_pct() -> f64 {
    0.10
}

impl BenchmarkBaseline {
    pub fn new(metric_name: impl Into<String>, baseline_value: f64, threshold_pct: f64) -> Self {
        Self {
            metric_name: metric_name.into(),
            baseline_value,
            threshold_pct,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct BenchmarkSetSpec {
    pub baselines: Vec<BenchmarkBaseline>,
}

/// Baselines used when no BenchmarkSet document is present.
pub fn default_baselines() -> Vec<BenchmarkBaseline> {
    vec![
        BenchmarkBaseline::new("denial_rate", 0.08, 0.15),
        BenchmarkBaseline::new("oon_rate", 0.05, 0.20),
        BenchmarkBaseline::new("cost_per_claim", 1200.0, 0.10),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_defaults_to_ten_percent() {
        let spec: BenchmarkSetSpec = serde_yaml::from_str(
            r#"
baselines:
  - metric_name: oon_rate
    baseline_value: 0.05
"#,
        )
        .unwrap();
        assert_eq!(spec.baselines[0].threshold_pct, 0.10);
    }

    #[test]
    fn defaults_only_name_known_metrics() {
        for b in default_baselines() {
            assert!(BENCHMARK_METRICS.contains(&b.metric_name.as_str()));
        }
    }
}
