//! DetectionConfig document kind: thresholds for the outlier rules and the
//! severity cutoffs applied uniformly to every flag.

use serde::{Deserialize, Serialize};

/// How a percentile is read off a sorted sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PercentileMethod {
    /// Smallest value whose rank covers `p` of the sample (`ceil(p * n)`).
    NearestRank,
    /// Linear interpolation between the two closest ranks.
    Linear,
}

/// Excess-ratio cutoffs mapping `(actual - threshold) / threshold` to a severity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SeverityPolicy {
    /// Excess at or above this is `high`.
    #[serde(default = "default_high_excess")]
    pub high_excess: f64,
    /// Excess at or above this (and below `high_excess`) is `medium`.
    #[serde(default = "default_medium_excess")]
    pub medium_excess: f64,
}

fn default_high_excess() -> f64 { 0.5 }
fn default_medium_excess() -> f64 { 0.2 }

impl Default for SeverityPolicy {
    fn default() -> Self {
        Self {
            high_excess: default_high_excess(),
            medium_excess: default_medium_excess(),
        }
    }
}

/// Thresholds for the detection rules.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DetectionConfig {
    /// Standard deviations above the mean for the volume and cost rules.
    #[serde(default = "default_zscore_multiplier")]
    pub zscore_multiplier: f64,
    /// Smallest population the mean/stddev rules will evaluate.
    #[serde(default = "default_min_population")]
    pub min_population: usize,
    /// Entities younger than this many days are "new".
    #[serde(default = "default_new_entity_days")]
    pub new_entity_days: u64,
    /// Percentile of established volume a new entity must exceed.
    #[serde(default = "default_new_entity_percentile")]
    pub new_entity_percentile: f64,
    #[serde(default = "default_percentile_method")]
    pub percentile_method: PercentileMethod,
    /// OON rate a supplier must exceed to join an OON DME cluster.
    #[serde(default = "default_oon_rate_cutoff")]
    pub oon_rate_cutoff: f64,
    /// Most distinct procedure codes a clustered supplier may bill.
    #[serde(default = "default_max_unique_codes")]
    pub max_unique_codes: u64,
    /// Fewest claims a clustered supplier must have.
    #[serde(default = "default_min_volume")]
    pub min_volume: u64,
    /// Multiple of the peer median billed/allowed ratio that flags an entity.
    #[serde(default = "default_billing_ratio_multiplier")]
    pub billing_ratio_multiplier: f64,
    /// Smallest peer group the billing ratio rule will evaluate.
    #[serde(default = "default_min_peer_group")]
    pub min_peer_group: usize,
    #[serde(default)]
    pub severity: SeverityPolicy,
}

fn default_zscore_multiplier() -> f64 { 2.0 }
fn default_min_population() -> usize { 3 }
fn default_new_entity_days() -> u64 { 90 }
fn default_new_entity_percentile() -> f64 { 0.90 }
fn default_percentile_method() -> PercentileMethod { PercentileMethod::NearestRank }
fn default_oon_rate_cutoff() -> f64 { 0.8 }
fn default_max_unique_codes() -> u64 { 3 }
fn default_min_volume() -> u64 { 50 }
fn default_billing_ratio_multiplier() -> f64 { 3.0 }
fn default_min_peer_group() -> usize { 3 }

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            zscore_multiplier: default_zscore_multiplier(),
            min_population: default_min_population(),
            new_entity_days: default_new_entity_days(),
            new_entity_percentile: default_new_entity_percentile(),
            percentile_method: default_percentile_method(),
            oon_rate_cutoff: default_oon_rate_cutoff(),
            max_unique_codes: default_max_unique_codes(),
            min_volume: default_min_volume(),
            billing_ratio_multiplier: default_billing_ratio_multiplier(),
            min_peer_group: default_min_peer_group(),
            severity: SeverityPolicy::default(),
        }
    }
}
