//! `billing_ratio_outlier`: billed-to-allowed ratio far above the median
//! of the entity's service-category peers.

use std::collections::BTreeMap;

use claimscope_core::{EntityType, FeatureRecord, FeatureTable};
use claimscope_rules::DetectionConfig;

use crate::algorithms::stats;
use crate::detection::evidence::BillingRatioEvidence;
use crate::detection::{build_flag, DetectionRule, RuleOutcome};

const RULE: &str = "billing_ratio_outlier";

#[derive(Debug, Clone, Copy, Default)]
pub struct BillingRatioOutlier;

/// Peer groups keyed by `(entity_type, service_category)`. Records with no
/// category or a non-finite ratio belong to no group.
fn peer_groups(features: &FeatureTable) -> BTreeMap<(EntityType, &str), Vec<&FeatureRecord>> {
    let mut groups: BTreeMap<(EntityType, &str), Vec<&FeatureRecord>> = BTreeMap::new();
    for record in features.iter() {
        let Some(category) = record.service_category.as_deref() else {
            continue;
        };
        if !record.billed_to_allowed_ratio.is_finite() {
            continue;
        }
        groups.entry((record.entity_type, category)).or_default().push(record);
    }
    groups
}

impl DetectionRule for BillingRatioOutlier {
    fn name(&self) -> &str {
        RULE
    }

    fn evaluate(&self, features: &FeatureTable, config: &DetectionConfig) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let groups = peer_groups(features);
        if groups.is_empty() {
            outcome.skip(RULE, None, "no records with a service category");
            return outcome;
        }

        for ((entity_type, category), members) in groups {
            if members.len() < config.min_peer_group {
                outcome.skip(
                    RULE,
                    Some(entity_type),
                    format!(
                        "peer group '{}' has {} members, below minimum {}",
                        category,
                        members.len(),
                        config.min_peer_group
                    ),
                );
                continue;
            }

            let ratios: Vec<f64> = members.iter().map(|r| r.billed_to_allowed_ratio).collect();
            let median = match stats::median(&ratios) {
                Some(m) if m.abs() >= f64::EPSILON => m,
                _ => {
                    outcome.skip(
                        RULE,
                        Some(entity_type),
                        format!("peer group '{}' has a zero median ratio", category),
                    );
                    continue;
                }
            };

            let threshold = config.billing_ratio_multiplier * median;
            for record in members {
                let ratio = record.billed_to_allowed_ratio;
                if ratio <= threshold {
                    continue;
                }
                let evidence = BillingRatioEvidence {
                    billed_to_allowed_ratio: ratio,
                    peer_median: median,
                    multiplier: config.billing_ratio_multiplier,
                    peer_group_size: ratios.len(),
                    total_claims: record.total_claims,
                };
                let description = format!(
                    "{} {} bills {:.2}x its allowed amount, above {:.1}x the {} peer median of {:.2}",
                    capitalize(entity_type.as_str()),
                    record.entity_id,
                    ratio,
                    config.billing_ratio_multiplier,
                    category,
                    median
                );
                outcome.flags.push(build_flag(
                    RULE, record, &evidence, threshold, ratio, config, description,
                ));
            }
        }
        outcome
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
