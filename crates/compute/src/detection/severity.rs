//! Excess-ratio severity classification.

use claimscope_core::Severity;
use claimscope_rules::SeverityPolicy;

/// `(actual - threshold) / |threshold|`, or `actual` itself when the
/// threshold is zero.
pub fn excess_ratio(actual: f64, threshold: f64) -> f64 {
    if threshold.abs() < f64::EPSILON {
        actual
    } else {
        (actual - threshold) / threshold.abs()
    }
}

/// Map how far `actual` overshoots `threshold` onto a severity.
pub fn classify(actual: f64, threshold: f64, policy: &SeverityPolicy) -> Severity {
    let excess = excess_ratio(actual, threshold);
    if excess >= policy.high_excess {
        Severity::High
    } else if excess >= policy.medium_excess {
        Severity::Medium
    } else {
        Severity::Low
    }
}
