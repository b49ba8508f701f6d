//! Config document kind enum for two-pass deserialization dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::validation::fuzzy::did_you_mean;

/// Supported analysis config document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigKind {
    DetectionConfig,
    PolicyChange,
    BenchmarkSet,
    AppealsConfig,
}

impl ConfigKind {
    pub const ALL: &'static [&'static str] =
        &["DetectionConfig", "PolicyChange", "BenchmarkSet", "AppealsConfig"];
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigKind::DetectionConfig => write!(f, "DetectionConfig"),
            ConfigKind::PolicyChange => write!(f, "PolicyChange"),
            ConfigKind::BenchmarkSet => write!(f, "BenchmarkSet"),
            ConfigKind::AppealsConfig => write!(f, "AppealsConfig"),
        }
    }
}

impl FromStr for ConfigKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "DetectionConfig" => Ok(ConfigKind::DetectionConfig),
            "PolicyChange" => Ok(ConfigKind::PolicyChange),
            "BenchmarkSet" => Ok(ConfigKind::BenchmarkSet),
            "AppealsConfig" => Ok(ConfigKind::AppealsConfig),
            other => Err(format!(
                "unknown config kind: '{}'{}",
                other,
                did_you_mean(other, ConfigKind::ALL)
            )),
        }
    }
}
