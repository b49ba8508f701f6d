//! Fixed-shape evidence for each detection rule.
//!
//! A rule fills one of these structs and converts it into the flag's
//! `feature_values` map, so every input the rule used is always present.

use claimscope_core::FeatureValues;

pub trait Evidence {
    fn feature_values(&self) -> FeatureValues;
}

fn values<const N: usize>(pairs: [(&str, f64); N]) -> FeatureValues {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Mean + k·σ outlier on one metric.
#[derive(Debug, Clone, PartialEq)]
pub struct ZScoreEvidence {
    /// Name of the metric the rule measured, e.g. `total_claims`.
    pub metric: &'static str,
    pub value: f64,
    pub peer_mean: f64,
    pub peer_std: f64,
    pub z_score: f64,
    pub multiplier: f64,
    pub population: usize,
}

impl Evidence for ZScoreEvidence {
    fn feature_values(&self) -> FeatureValues {
        values([
            (self.metric, self.value),
            ("peer_mean", self.peer_mean),
            ("peer_std", self.peer_std),
            ("z_score", self.z_score),
            ("zscore_multiplier", self.multiplier),
            ("population_size", self.population as f64),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewEntityEvidence {
    pub total_claims: u64,
    pub entity_age_days: u64,
    pub new_entity_days: u64,
    pub percentile: f64,
    pub established_count: usize,
}

impl Evidence for NewEntityEvidence {
    fn feature_values(&self) -> FeatureValues {
        values([
            ("total_claims", self.total_claims as f64),
            ("entity_age_days", self.entity_age_days as f64),
            ("new_entity_days", self.new_entity_days as f64),
            ("percentile", self.percentile),
            ("established_count", self.established_count as f64),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OonClusterEvidence {
    pub oon_rate: f64,
    pub unique_procedure_codes: u64,
    pub total_claims: u64,
    pub total_allowed: f64,
    pub entity_age_days: u64,
    pub max_unique_codes: u64,
    pub min_volume: u64,
}

impl Evidence for OonClusterEvidence {
    fn feature_values(&self) -> FeatureValues {
        values([
            ("oon_rate", self.oon_rate),
            ("unique_procedure_codes", self.unique_procedure_codes as f64),
            ("total_claims", self.total_claims as f64),
            ("total_allowed", self.total_allowed),
            ("entity_age_days", self.entity_age_days as f64),
            ("max_unique_codes", self.max_unique_codes as f64),
            ("min_volume", self.min_volume as f64),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillingRatioEvidence {
    pub billed_to_allowed_ratio: f64,
    pub peer_median: f64,
    pub multiplier: f64,
    pub peer_group_size: usize,
    pub total_claims: u64,
}

impl Evidence for BillingRatioEvidence {
    fn feature_values(&self) -> FeatureValues {
        values([
            ("billed_to_allowed_ratio", self.billed_to_allowed_ratio),
            ("peer_median", self.peer_median),
            ("billing_ratio_multiplier", self.multiplier),
            ("peer_group_size", self.peer_group_size as f64),
            ("total_claims", self.total_claims as f64),
        ])
    }
}
