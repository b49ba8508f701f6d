//! `oon_dme_cluster`: suppliers billing mostly out of network, from a
//! narrow set of codes, at meaningful volume.

use claimscope_core::{EntityType, FeatureTable};
use claimscope_rules::DetectionConfig;

use crate::detection::evidence::OonClusterEvidence;
use crate::detection::{build_flag, DetectionRule, RuleOutcome};

const RULE: &str = "oon_dme_cluster";

#[derive(Debug, Clone, Copy, Default)]
pub struct OonDmeCluster;

impl DetectionRule for OonDmeCluster {
    fn name(&self) -> &str {
        RULE
    }

    fn evaluate(&self, features: &FeatureTable, config: &DetectionConfig) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        let mut suppliers = features.of_type(EntityType::Supplier).peekable();
        if suppliers.peek().is_none() {
            outcome.skip(RULE, Some(EntityType::Supplier), "no supplier records");
            return outcome;
        }

        let threshold = config.oon_rate_cutoff;
        for record in suppliers {
            // Strict: a flag's actual value must exceed its threshold.
            if !(record.oon_rate > threshold
                && record.unique_procedure_codes <= config.max_unique_codes
                && record.total_claims >= config.min_volume)
            {
                continue;
            }
            let evidence = OonClusterEvidence {
                oon_rate: record.oon_rate,
                unique_procedure_codes: record.unique_procedure_codes,
                total_claims: record.total_claims,
                total_allowed: record.total_allowed,
                entity_age_days: record.entity_age_days,
                max_unique_codes: config.max_unique_codes,
                min_volume: config.min_volume,
            };
            let description = format!(
                "Supplier {} has {:.0}% OON rate, {} claims, only {} unique codes. Possible OON DME billing scheme.",
                record.entity_id,
                record.oon_rate * 100.0,
                record.total_claims,
                record.unique_procedure_codes
            );
            outcome.flags.push(build_flag(
                RULE,
                record,
                &evidence,
                threshold,
                record.oon_rate,
                config,
                description,
            ));
        }
        outcome
    }
}
