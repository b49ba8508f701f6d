//! Explainable detection flags.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;

/// Boundary representation of a flag's evidence: metric name → value.
pub type FeatureValues = BTreeMap<String, f64>;

/// Flag severity. Declared low → high so the derived `Ord` ranks `High` highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

/// An explainable detection result.
///
/// Carries every input the rule used so a reviewer can understand why it
/// fired without consulting any other state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flag {
    pub rule_name: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub severity: Severity,
    pub feature_values: FeatureValues,
    pub threshold: f64,
    pub actual_value: f64,
    pub description: String,
}

impl Flag {
    /// True when the flag honours its own contract (`actual_value > threshold`).
    pub fn exceeds_threshold(&self) -> bool {
        self.actual_value > self.threshold
    }
}
