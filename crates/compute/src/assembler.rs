//! Merges the outputs of one run into an [`AnalysisBundle`].
//!
//! The assembler computes nothing: it checks structural integrity and
//! stamps run metadata.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use claimscope_core::{AnalysisError, FeatureTable, Flag, PolicyChangeEvent, Result, RunWarning};

use crate::appeals::AppealsFunnel;
use crate::benchmark::{BenchmarkComparison, BenchmarkOutcome};
use crate::detection::DetectionOutcome;
use crate::policy::{PolicyImpactReport, PolicyKpi, PolicyOutcome};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub feature_records: usize,
    pub claims: usize,
    pub rules_evaluated: usize,
    pub policy_events: usize,
    pub warning_count: usize,
}

/// Immutable output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisBundle {
    pub flags: Vec<Flag>,
    pub policy_reports: Vec<PolicyImpactReport>,
    pub policy_kpis: Vec<PolicyKpi>,
    pub appeals_funnel: AppealsFunnel,
    pub benchmark_comparisons: Vec<BenchmarkComparison>,
    pub warnings: Vec<RunWarning>,
    pub run_metadata: RunMetadata,
}

impl AnalysisBundle {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn flags_for_rule<'a>(&'a self, rule_name: &'a str) -> impl Iterator<Item = &'a Flag> + 'a {
        self.flags.iter().filter(move |f| f.rule_name == rule_name)
    }
}

/// Everything one run produced, before integrity checks.
pub struct RunParts {
    pub detection: DetectionOutcome,
    pub policy: PolicyOutcome,
    pub policy_kpis: Vec<PolicyKpi>,
    pub appeals: AppealsFunnel,
    pub benchmarks: BenchmarkOutcome,
}

pub struct ResultAssembler<'a> {
    features: &'a FeatureTable,
    events: &'a [PolicyChangeEvent],
    claims: usize,
}

impl<'a> ResultAssembler<'a> {
    pub fn new(features: &'a FeatureTable, events: &'a [PolicyChangeEvent], claims: usize) -> Self {
        Self { features, events, claims }
    }

    /// Verify the parts and merge them. Warnings are ordered detection,
    /// policy, then benchmarks.
    pub fn assemble(&self, parts: RunParts) -> Result<AnalysisBundle> {
        self.check_flags(&parts.detection.flags)?;
        self.check_reports(&parts.policy.reports)?;

        let mut warnings = parts.detection.warnings;
        warnings.extend(parts.policy.warnings);
        warnings.extend(parts.benchmarks.warnings);

        let run_metadata = RunMetadata {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            feature_records: self.features.len(),
            claims: self.claims,
            rules_evaluated: parts.detection.rules_evaluated,
            policy_events: self.events.len(),
            warning_count: warnings.len(),
        };

        info!(
            run_id = %run_metadata.run_id,
            flags = parts.detection.flags.len(),
            policy_reports = parts.policy.reports.len(),
            benchmarks = parts.benchmarks.comparisons.len(),
            warnings = run_metadata.warning_count,
            "analysis bundle assembled"
        );

        Ok(AnalysisBundle {
            flags: parts.detection.flags,
            policy_reports: parts.policy.reports,
            policy_kpis: parts.policy_kpis,
            appeals_funnel: parts.appeals,
            benchmark_comparisons: parts.benchmarks.comparisons,
            warnings,
            run_metadata,
        })
    }

    fn check_flags(&self, flags: &[Flag]) -> Result<()> {
        for flag in flags {
            if !self.features.contains(flag.entity_type, &flag.entity_id) {
                return Err(integrity(format!(
                    "flag {} references unknown {} '{}'",
                    flag.rule_name, flag.entity_type, flag.entity_id
                )));
            }
            if !flag.exceeds_threshold() {
                return Err(integrity(format!(
                    "flag {} for {} '{}' has actual value {} not above threshold {}",
                    flag.rule_name, flag.entity_type, flag.entity_id, flag.actual_value, flag.threshold
                )));
            }
        }
        Ok(())
    }

    fn check_reports(&self, reports: &[PolicyImpactReport]) -> Result<()> {
        if reports.len() != self.events.len() {
            return Err(integrity(format!(
                "{} policy reports for {} configured events",
                reports.len(),
                self.events.len()
            )));
        }
        let expected: BTreeSet<&str> = self.events.iter().map(|e| e.policy_id.as_str()).collect();
        let actual: BTreeSet<&str> = reports.iter().map(|r| r.policy_id.as_str()).collect();
        if expected != actual {
            return Err(integrity(format!(
                "policy reports {:?} do not match configured events {:?}",
                actual, expected
            )));
        }
        Ok(())
    }
}

fn integrity(message: String) -> AnalysisError {
    warn!(%message, "structural integrity check failed");
    AnalysisError::StructuralIntegrity(message)
}

#[cfg(test)]
mod tests {
    use claimscope_core::{EntityType, FeatureRecord, Severity};

    use super::*;
    use crate::appeals::AppealsAnalyzer;
    use claimscope_rules::AppealsConfig;

    fn features() -> FeatureTable {
        FeatureTable::new(vec![FeatureRecord {
            entity_id: "P1".to_string(),
            entity_type: EntityType::Provider,
            total_claims: 10,
            total_allowed: 100.0,
            oon_rate: 0.0,
            denial_rate: 0.0,
            unique_procedure_codes: 1,
            entity_age_days: 100,
            billed_to_allowed_ratio: 1.0,
            service_category: None,
        }])
        .unwrap()
    }

    fn flag(entity_type: EntityType, id: &str, threshold: f64, actual: f64) -> Flag {
        Flag {
            rule_name: "high_volume_provider".to_string(),
            entity_type,
            entity_id: id.to_string(),
            severity: Severity::High,
            feature_values: Default::default(),
            threshold,
            actual_value: actual,
            description: String::new(),
        }
    }

    fn parts(flags: Vec<Flag>) -> RunParts {
        RunParts {
            detection: DetectionOutcome { flags, warnings: Vec::new(), rules_evaluated: 5 },
            policy: PolicyOutcome::default(),
            policy_kpis: Vec::new(),
            appeals: AppealsAnalyzer::new(AppealsConfig::default()).unwrap().analyze(&[]),
            benchmarks: BenchmarkOutcome {
                comparisons: Vec::new(),
                warnings: vec![RunWarning::DegenerateBaseline { metric_name: "oon_rate".to_string() }],
            },
        }
    }

    #[test]
    fn assembles_valid_parts() {
        let features = features();
        let bundle = ResultAssembler::new(&features, &[], 0)
            .assemble(parts(vec![flag(EntityType::Provider, "P1", 5.0, 10.0)]))
            .unwrap();
        assert_eq!(bundle.flags.len(), 1);
        assert_eq!(bundle.run_metadata.rules_evaluated, 5);
        assert_eq!(bundle.run_metadata.feature_records, 1);
        assert_eq!(bundle.run_metadata.warning_count, 1);
        assert_eq!(bundle.flags_for_rule("high_volume_provider").count(), 1);

        let json: serde_json::Value = serde_json::from_str(&bundle.to_json().unwrap()).unwrap();
        assert_eq!(json["flags"][0]["severity"], "high");
        assert_eq!(json["warnings"][0]["kind"], "degenerate_baseline");
    }

    #[test]
    fn unknown_entity_is_an_integrity_error() {
        let features = features();
        let err = ResultAssembler::new(&features, &[], 0)
            .assemble(parts(vec![flag(EntityType::Supplier, "P1", 5.0, 10.0)]))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::StructuralIntegrity(_)));
    }

    #[test]
    fn flag_at_threshold_is_an_integrity_error() {
        let features = features();
        let err = ResultAssembler::new(&features, &[], 0)
            .assemble(parts(vec![flag(EntityType::Provider, "P1", 10.0, 10.0)]))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::StructuralIntegrity(_)));
    }

    #[test]
    fn missing_policy_report_is_an_integrity_error() {
        use chrono::NaiveDate;
        use claimscope_core::ChangeType;

        let features = features();
        let events = vec![PolicyChangeEvent {
            policy_id: "POL-1".to_string(),
            description: String::new(),
            affected_code_prefixes: vec!["CPT-7".to_string()],
            change_type: ChangeType::Removed,
            effective_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            pre_window_days: 84,
            post_window_days: 84,
            rebound_ratio_threshold: 1.1,
        }];
        let err = ResultAssembler::new(&features, &events, 0)
            .assemble(parts(Vec::new()))
            .unwrap_err();
        assert!(matches!(err, AnalysisError::StructuralIntegrity(_)));
    }
}
