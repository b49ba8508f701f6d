//! Rule-based outlier detection over a [`FeatureTable`].
//!
//! Each rule is an independent value implementing [`DetectionRule`]. The
//! [`DetectionEngine`] holds an explicit ordered list of rules, evaluates
//! them in parallel, and sorts the merged flags so the output never depends
//! on scheduling order.
//!
//! Sub-modules:
//! - [`rules`]: the five built-in rules
//! - [`severity`]: excess-ratio severity classification
//! - [`evidence`]: fixed-shape `feature_values` per rule

pub mod evidence;
pub mod rules;
pub mod severity;


use std::cmp::Ordering;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use claimscope_core::{EntityType, FeatureRecord, FeatureTable, Flag, RunWarning};
use claimscope_rules::DetectionConfig;

use self::evidence::Evidence;

pub use rules::{BillingRatioOutlier, NewEntityHighVolume, OonDmeCluster, ZScoreOutlier};

/// What one rule produced: flags, plus a warning for every population it
/// could not evaluate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    pub flags: Vec<Flag>,
    pub warnings: Vec<RunWarning>,
}

impl RuleOutcome {
    /// Record that `rule` could not evaluate (part of) its population.
    pub fn skip(&mut self, rule: &str, entity_type: Option<EntityType>, reason: impl Into<String>) {
        let reason = reason.into();
        info!(rule, entity_type = ?entity_type, reason = %reason, "rule skipped");
        self.warnings.push(RunWarning::skipped_rule(rule, entity_type, reason));
    }
}

/// A single side-effect-free detection rule.
///
/// Rules read only the feature table and config; a rule that cannot
/// compute reports a skip instead of failing.
pub trait DetectionRule: Send + Sync {
    /// Stable rule identifier, copied into every flag.
    fn name(&self) -> &str;

    fn evaluate(&self, features: &FeatureTable, config: &DetectionConfig) -> RuleOutcome;
}

/// Build a flag for `record` with severity derived from the config.
pub(crate) fn build_flag(
    rule: &str,
    record: &FeatureRecord,
    evidence: &impl Evidence,
    threshold: f64,
    actual_value: f64,
    config: &DetectionConfig,
    description: String,
) -> Flag {
    Flag {
        rule_name: rule.to_string(),
        entity_type: record.entity_type,
        entity_id: record.entity_id.clone(),
        severity: severity::classify(actual_value, threshold, &config.severity),
        feature_values: evidence.feature_values(),
        threshold,
        actual_value,
        description,
    }
}

/// Merged result of every rule in the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionOutcome {
    pub flags: Vec<Flag>,
    pub warnings: Vec<RunWarning>,
    pub rules_evaluated: usize,
}

/// Total order over flags: severity desc, actual value desc, then entity
/// id, rule name and entity type ascending.
pub fn flag_order(a: &Flag, b: &Flag) -> Ordering {
    b.severity
        .cmp(&a.severity)
        .then_with(|| b.actual_value.total_cmp(&a.actual_value))
        .then_with(|| a.entity_id.cmp(&b.entity_id))
        .then_with(|| a.rule_name.cmp(&b.rule_name))
        .then_with(|| a.entity_type.cmp(&b.entity_type))
}

/// Ordered collection of detection rules.
pub struct DetectionEngine {
    rules: Vec<Box<dyn DetectionRule>>,
}

impl DetectionEngine {
    pub fn new(rules: Vec<Box<dyn DetectionRule>>) -> Self {
        Self { rules }
    }

    /// The five built-in rules in their canonical order.
    pub fn with_default_rules() -> Self {
        Self::new(vec![
            Box::new(ZScoreOutlier::high_volume()),
            Box::new(ZScoreOutlier::high_cost()),
            Box::new(NewEntityHighVolume),
            Box::new(OonDmeCluster),
            Box::new(BillingRatioOutlier),
        ])
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule against the table and return the sorted flags.
    ///
    /// Warnings keep rule order; flags are re-sorted with [`flag_order`].
    pub fn evaluate(&self, features: &FeatureTable, config: &DetectionConfig) -> DetectionOutcome {
        let start = Instant::now();

        let outcomes: Vec<RuleOutcome> = self
            .rules
            .par_iter()
            .map(|rule| {
                let rule_start = Instant::now();
                let outcome = rule.evaluate(features, config);
                debug!(
                    rule = rule.name(),
                    flags = outcome.flags.len(),
                    elapsed_ms = rule_start.elapsed().as_millis() as u64,
                    "rule evaluated"
                );
                outcome
            })
            .collect();

        let mut flags = Vec::new();
        let mut warnings = Vec::new();
        for outcome in outcomes {
            flags.extend(outcome.flags);
            warnings.extend(outcome.warnings);
        }
        flags.sort_by(flag_order);

        info!(
            rules = self.rules.len(),
            records = features.len(),
            flags = flags.len(),
            skipped = warnings.len(),
            "detection complete in {:.3}s",
            start.elapsed().as_secs_f64()
        );

        DetectionOutcome {
            flags,
            warnings,
            rules_evaluated: self.rules.len(),
        }
    }
}

impl Default for DetectionEngine {
    fn default() -> Self {
        Self::with_default_rules()
    }
}
