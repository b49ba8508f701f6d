//! Multi-kind config document container and accessors.

use serde::{Deserialize, Serialize};

use claimscope_core::PolicyChangeEvent;

use super::{CommonMetadata, ConfigKind};
use crate::appeals_config::AppealsConfig;
use crate::benchmark_config::BenchmarkSetSpec;
use crate::detection_config::DetectionConfig;

/// Generic typed document: header plus a kind-specific `spec`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Document<S> {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    pub spec: S,
}

pub type DetectionConfigDocument = Document<DetectionConfig>;
pub type PolicyChangeDocument = Document<PolicyChangeEvent>;
pub type BenchmarkSetDocument = Document<BenchmarkSetSpec>;
pub type AppealsConfigDocument = Document<AppealsConfig>;

/// A fully deserialized config document of any supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigDocument {
    /// Detection thresholds and severity cutoffs.
    Detection(DetectionConfigDocument),
    /// One policy change event.
    PolicyChange(PolicyChangeDocument),
    /// A list of peer benchmark baselines.
    BenchmarkSet(BenchmarkSetDocument),
    /// Appeals cost and ranking settings.
    Appeals(AppealsConfigDocument),
}

impl ConfigDocument {
    pub fn metadata(&self) -> &CommonMetadata {
        match self {
            ConfigDocument::Detection(d) => &d.metadata,
            ConfigDocument::PolicyChange(d) => &d.metadata,
            ConfigDocument::BenchmarkSet(d) => &d.metadata,
            ConfigDocument::Appeals(d) => &d.metadata,
        }
    }

    pub fn kind(&self) -> ConfigKind {
        match self {
            ConfigDocument::Detection(_) => ConfigKind::DetectionConfig,
            ConfigDocument::PolicyChange(_) => ConfigKind::PolicyChange,
            ConfigDocument::BenchmarkSet(_) => ConfigKind::BenchmarkSet,
            ConfigDocument::Appeals(_) => ConfigKind::AppealsConfig,
        }
    }

    /// Header fields as declared in the file: (apiVersion, kind).
    pub fn header(&self) -> (&str, &str) {
        match self {
            ConfigDocument::Detection(d) => (&d.api_version, &d.kind),
            ConfigDocument::PolicyChange(d) => (&d.api_version, &d.kind),
            ConfigDocument::BenchmarkSet(d) => (&d.api_version, &d.kind),
            ConfigDocument::Appeals(d) => (&d.api_version, &d.kind),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.metadata().enabled
    }
}
