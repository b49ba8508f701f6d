//! Non-fatal conditions contained at their unit of work and surfaced next
//! to the normal results.

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    /// A detection rule (or one of its populations) could not compute and
    /// contributed no flags.
    SkippedRule {
        rule_name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        entity_type: Option<EntityType>,
        reason: String,
    },
    /// A policy event whose pre or post window held no claims.
    InsufficientWindowData {
        policy_id: String,
        pre_volume: u64,
        post_volume: u64,
    },
    /// A benchmark baseline of zero, excluded from the comparison.
    DegenerateBaseline { metric_name: String },
    /// A benchmark baseline naming a metric the run did not compute.
    MissingInternalMetric { metric_name: String },
}

impl RunWarning {
    pub fn skipped_rule(
        rule_name: impl Into<String>,
        entity_type: Option<EntityType>,
        reason: impl Into<String>,
    ) -> Self {
        RunWarning::SkippedRule {
            rule_name: rule_name.into(),
            entity_type,
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for RunWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunWarning::SkippedRule { rule_name, entity_type: Some(t), reason } => {
                write!(f, "rule {} skipped for {}: {}", rule_name, t, reason)
            }
            RunWarning::SkippedRule { rule_name, entity_type: None, reason } => {
                write!(f, "rule {} skipped: {}", rule_name, reason)
            }
            RunWarning::InsufficientWindowData { policy_id, pre_volume, post_volume } => write!(
                f,
                "policy {} has insufficient window data (pre={}, post={})",
                policy_id, pre_volume, post_volume
            ),
            RunWarning::DegenerateBaseline { metric_name } => {
                write!(f, "benchmark {} has a zero baseline", metric_name)
            }
            RunWarning::MissingInternalMetric { metric_name } => {
                write!(f, "benchmark {} has no internal metric", metric_name)
            }
        }
    }
}
