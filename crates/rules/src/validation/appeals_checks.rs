//! AppealsConfig checks.

use super::{non_negative, ValidationResult};
use crate::appeals_config::AppealsConfig;

pub fn validate_appeals(config: &AppealsConfig, path: &str, result: &mut ValidationResult) {
    if !non_negative(config.cost_per_appeal) {
        result.error(
            format!("{}.cost_per_appeal", path),
            format!("must be finite and non-negative, got {}", config.cost_per_appeal),
        );
    }
    if config.top_n_categories == 0 {
        result.warn(format!("{}.top_n_categories", path), "top-N category view will be empty");
    }
    if config.known_categories.iter().any(|c| c.trim().is_empty()) {
        result.error(format!("{}.known_categories", path), "category names must not be blank");
    }
}
