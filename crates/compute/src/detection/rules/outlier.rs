//! `high_volume_provider` and `high_cost_provider`: providers more than
//! k standard deviations above the provider mean.

use claimscope_core::{EntityType, FeatureRecord, FeatureTable};
use claimscope_rules::DetectionConfig;

use crate::algorithms::stats;
use crate::detection::evidence::ZScoreEvidence;
use crate::detection::{build_flag, DetectionRule, RuleOutcome};

/// Which provider metric a z-score rule measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    TotalClaims,
    TotalAllowed,
}

impl Metric {
    fn field(self) -> &'static str {
        match self {
            Metric::TotalClaims => "total_claims",
            Metric::TotalAllowed => "total_allowed",
        }
    }

    fn value(self, record: &FeatureRecord) -> f64 {
        match self {
            Metric::TotalClaims => record.total_claims as f64,
            Metric::TotalAllowed => record.total_allowed,
        }
    }

    fn describe(self, record: &FeatureRecord, z: f64, threshold: f64) -> String {
        match self {
            Metric::TotalClaims => format!(
                "Provider {} has {} claims (z-score={:.2}, threshold={:.0})",
                record.entity_id, record.total_claims, z, threshold
            ),
            Metric::TotalAllowed => format!(
                "Provider {} has ${:.2} total allowed (z-score={:.2}, threshold=${:.0})",
                record.entity_id, record.total_allowed, z, threshold
            ),
        }
    }
}

/// Mean + k·σ outlier rule over one provider metric.
#[derive(Debug, Clone)]
pub struct ZScoreOutlier {
    name: &'static str,
    metric: Metric,
}

impl ZScoreOutlier {
    /// Claim volume above μ + kσ.
    pub fn high_volume() -> Self {
        Self { name: "high_volume_provider", metric: Metric::TotalClaims }
    }

    /// Total allowed amount above μ + kσ.
    pub fn high_cost() -> Self {
        Self { name: "high_cost_provider", metric: Metric::TotalAllowed }
    }
}

impl DetectionRule for ZScoreOutlier {
    fn name(&self) -> &str {
        self.name
    }

    fn evaluate(&self, features: &FeatureTable, config: &DetectionConfig) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let providers: Vec<&FeatureRecord> = features.of_type(EntityType::Provider).collect();

        if providers.len() < config.min_population {
            outcome.skip(
                self.name,
                Some(EntityType::Provider),
                format!(
                    "population of {} below minimum {}",
                    providers.len(),
                    config.min_population
                ),
            );
            return outcome;
        }

        let values: Vec<f64> = providers.iter().map(|r| self.metric.value(r)).collect();
        let (mean, std) = match (stats::mean(&values), stats::sample_stddev(&values)) {
            (Some(m), Some(s)) if s > 0.0 && s.is_finite() => (m, s),
            _ => {
                outcome.skip(self.name, Some(EntityType::Provider), "zero variance");
                return outcome;
            }
        };

        let threshold = mean + config.zscore_multiplier * std;
        for (record, &value) in providers.iter().zip(&values) {
            if value <= threshold {
                continue;
            }
            let z = (value - mean) / std;
            let evidence = ZScoreEvidence {
                metric: self.metric.field(),
                value,
                peer_mean: mean,
                peer_std: std,
                z_score: z,
                multiplier: config.zscore_multiplier,
                population: providers.len(),
            };
            outcome.flags.push(build_flag(
                self.name,
                record,
                &evidence,
                threshold,
                value,
                config,
                self.metric.describe(record, z, threshold),
            ));
        }
        outcome
    }
}
