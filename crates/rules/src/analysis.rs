//! The merged configuration a run executes against.

use serde::{Deserialize, Serialize};
use tracing::debug;

use claimscope_core::PolicyChangeEvent;

use crate::appeals_config::AppealsConfig;
use crate::benchmark_config::{default_baselines, BenchmarkBaseline};
use crate::detection_config::DetectionConfig;
use crate::loader::{ConfigError, Result};
use crate::schema::ConfigDocument;

/// Every setting one analysis run needs, merged from config documents.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisConfig {
    pub detection: DetectionConfig,
    pub policy_events: Vec<PolicyChangeEvent>,
    pub benchmarks: Vec<BenchmarkBaseline>,
    pub appeals: AppealsConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            policy_events: Vec::new(),
            benchmarks: default_baselines(),
            appeals: AppealsConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Merge enabled documents into one config.
    ///
    /// At most one enabled DetectionConfig and one enabled AppealsConfig may
    /// be present; missing kinds fall back to defaults. Policy events and
    /// benchmark baselines accumulate in document order. When any
    /// BenchmarkSet is present the default baselines are not used.
    pub fn from_documents<'a, I>(docs: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ConfigDocument>,
    {
        let mut detection: Option<(&str, DetectionConfig)> = None;
        let mut appeals: Option<(&str, AppealsConfig)> = None;
        let mut policy_events = Vec::new();
        let mut benchmarks: Option<Vec<BenchmarkBaseline>> = None;

        for doc in docs {
            if !doc.is_enabled() {
                debug!(id = %doc.metadata().id, kind = %doc.kind(), "skipping disabled config document");
                continue;
            }
            match doc {
                ConfigDocument::Detection(d) => {
                    if let Some((existing, _)) = &detection {
                        return Err(ConfigError::Validation(format!(
                            "multiple enabled DetectionConfig documents: '{}' and '{}'",
                            existing, d.metadata.id
                        )));
                    }
                    detection = Some((d.metadata.id.as_str(), d.spec.clone()));
                }
                ConfigDocument::Appeals(d) => {
                    if let Some((existing, _)) = &appeals {
                        return Err(ConfigError::Validation(format!(
                            "multiple enabled AppealsConfig documents: '{}' and '{}'",
                            existing, d.metadata.id
                        )));
                    }
                    appeals = Some((d.metadata.id.as_str(), d.spec.clone()));
                }
                ConfigDocument::PolicyChange(d) => policy_events.push(d.spec.clone()),
                ConfigDocument::BenchmarkSet(d) => benchmarks
                    .get_or_insert_with(Vec::new)
                    .extend(d.spec.baselines.iter().cloned()),
            }
        }

        Ok(Self {
            detection: detection.map(|(_, c)| c).unwrap_or_default(),
            policy_events,
            benchmarks: benchmarks.unwrap_or_else(default_baselines),
            appeals: appeals.map(|(_, c)| c).unwrap_or_default(),
        })
    }
}
