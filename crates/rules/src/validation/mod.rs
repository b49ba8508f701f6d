//! Checks on analysis documents, run before any claim is touched.

mod appeals_checks;
mod benchmark_checks;
mod detection_checks;
mod policy_checks;

pub mod fuzzy;

use std::fmt;

use serde::{Deserialize, Serialize};

use claimscope_core::AnalysisError;

use crate::analysis::AnalysisConfig;
use crate::schema::ConfigDocument;

pub use appeals_checks::validate_appeals;
pub use benchmark_checks::validate_benchmarks;
pub use detection_checks::validate_detection;
pub use policy_checks::{validate_policy_event, validate_policy_events};

/// Problems found in the analysis documents. Any error blocks the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field location such as `policy_events[0].pre_window_days`.
    pub path: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)?;
        if let Some(s) = &self.suggestion {
            write!(f, " ({})", s)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
            suggestion: None,
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }

    /// One `InvalidConfiguration` keyed on the first failing path and
    /// listing every error, or the warnings when nothing failed.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, AnalysisError> {
        let Some(first) = self.errors.first() else {
            return Ok(self.warnings);
        };
        let message = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(AnalysisError::invalid_config(first.path.clone(), message))
    }
}

/// Finite and >= 0.
pub(crate) fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Validate a merged [`AnalysisConfig`].
pub fn validate_analysis_config(config: &AnalysisConfig) -> ValidationResult {
    let mut result = ValidationResult::new();
    validate_detection(&config.detection, "detection", &mut result);
    validate_policy_events(&config.policy_events, &mut result);
    validate_benchmarks(&config.benchmarks, "benchmarks", &mut result);
    validate_appeals(&config.appeals, "appeals", &mut result);
    result
}

/// Validate one document: header checks plus its kind-specific spec.
pub fn validate_document(doc: &ConfigDocument) -> ValidationResult {
    let mut result = ValidationResult::new();
    let (api_version, kind) = doc.header();
    if api_version != "v1" {
        result.error(
            "apiVersion",
            format!("apiVersion must be 'v1', got '{}'", api_version),
        );
    }
    let expected = doc.kind().to_string();
    if kind != expected {
        result.error("kind", format!("kind must be '{}', got '{}'", expected, kind));
    }
    let id = &doc.metadata().id;
    if !fuzzy::is_kebab_case(id) {
        result.error(
            "metadata.id",
            format!(
                "id must be kebab-case (lowercase alphanumeric + hyphens), got '{}'",
                id
            ),
        );
    }

    match doc {
        ConfigDocument::Detection(d) => validate_detection(&d.spec, "spec", &mut result),
        ConfigDocument::PolicyChange(d) => validate_policy_event(&d.spec, "spec", &mut result),
        ConfigDocument::BenchmarkSet(d) => {
            validate_benchmarks(&d.spec.baselines, "spec.baselines", &mut result)
        }
        ConfigDocument::Appeals(d) => validate_appeals(&d.spec, "spec", &mut result),
    }
    result
}

#[cfg(test)]
mod tests;
