//! DetectionConfig checks.

use super::{non_negative, ValidationResult};
use crate::detection_config::DetectionConfig;

pub fn validate_detection(config: &DetectionConfig, path: &str, result: &mut ValidationResult) {
    if !(config.zscore_multiplier.is_finite() && config.zscore_multiplier > 0.0) {
        result.error(
            format!("{}.zscore_multiplier", path),
            format!("must be a positive number, got {}", config.zscore_multiplier),
        );
    }
    if config.min_population < 2 {
        result.error(
            format!("{}.min_population", path),
            "a standard deviation needs at least 2 entities",
        );
    }
    if !(config.new_entity_percentile > 0.0 && config.new_entity_percentile <= 1.0) {
        result.error(
            format!("{}.new_entity_percentile", path),
            format!("must be in (0, 1], got {}", config.new_entity_percentile),
        );
    }
    if !(non_negative(config.oon_rate_cutoff) && config.oon_rate_cutoff <= 1.0) {
        result.error(
            format!("{}.oon_rate_cutoff", path),
            format!("must be a rate in [0, 1], got {}", config.oon_rate_cutoff),
        );
    }
    if !(config.billing_ratio_multiplier.is_finite() && config.billing_ratio_multiplier > 0.0) {
        result.error(
            format!("{}.billing_ratio_multiplier", path),
            format!("must be a positive number, got {}", config.billing_ratio_multiplier),
        );
    }
    if config.min_peer_group == 0 {
        result.error(format!("{}.min_peer_group", path), "must be at least 1");
    } else if config.min_peer_group < 3 {
        result.warn(
            format!("{}.min_peer_group", path),
            "peer groups smaller than 3 give a weak median",
        );
    }

    let severity = &config.severity;
    if !non_negative(severity.medium_excess) || !non_negative(severity.high_excess) {
        result.error(
            format!("{}.severity", path),
            "severity cutoffs must be finite and non-negative",
        );
    } else if severity.medium_excess > severity.high_excess {
        result.error(
            format!("{}.severity.medium_excess", path),
            format!(
                "medium_excess ({}) must not exceed high_excess ({})",
                severity.medium_excess, severity.high_excess
            ),
        );
    }
}
