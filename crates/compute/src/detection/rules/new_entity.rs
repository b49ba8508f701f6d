//! `new_entity_high_volume`: young entities whose volume already exceeds
//! a high percentile of established entities of the same type.

use claimscope_core::{EntityType, FeatureRecord, FeatureTable};
use claimscope_rules::DetectionConfig;
use tracing::debug;

use crate::algorithms::stats;
use crate::detection::evidence::NewEntityEvidence;
use crate::detection::{build_flag, DetectionRule, RuleOutcome};

const RULE: &str = "new_entity_high_volume";

/// Populations the rule evaluates, each on its own.
const POPULATIONS: [EntityType; 2] = [EntityType::Provider, EntityType::Supplier];

#[derive(Debug, Clone, Copy, Default)]
pub struct NewEntityHighVolume;

impl NewEntityHighVolume {
    fn evaluate_population(
        &self,
        entity_type: EntityType,
        features: &FeatureTable,
        config: &DetectionConfig,
        outcome: &mut RuleOutcome,
    ) {
        let (new, established): (Vec<&FeatureRecord>, Vec<&FeatureRecord>) = features
            .of_type(entity_type)
            .partition(|r| r.entity_age_days < config.new_entity_days);

        if new.is_empty() {
            debug!(rule = RULE, entity_type = %entity_type, "no new entities");
            return;
        }
        if established.is_empty() {
            outcome.skip(RULE, Some(entity_type), format!("no established {}s", entity_type));
            return;
        }

        let volumes: Vec<f64> = established.iter().map(|r| r.total_claims as f64).collect();
        let Some(threshold) =
            stats::percentile(&volumes, config.new_entity_percentile, config.percentile_method)
        else {
            outcome.skip(RULE, Some(entity_type), "percentile undefined");
            return;
        };

        for record in new {
            let actual = record.total_claims as f64;
            if actual <= threshold {
                continue;
            }
            let evidence = NewEntityEvidence {
                total_claims: record.total_claims,
                entity_age_days: record.entity_age_days,
                new_entity_days: config.new_entity_days,
                percentile: config.new_entity_percentile,
                established_count: established.len(),
            };
            let description = format!(
                "New {} {} (age={}d) has {} claims, exceeding the {:.0}th percentile of established {}s ({:.0})",
                entity_type,
                record.entity_id,
                record.entity_age_days,
                record.total_claims,
                config.new_entity_percentile * 100.0,
                entity_type,
                threshold
            );
            outcome
                .flags
                .push(build_flag(RULE, record, &evidence, threshold, actual, config, description));
        }
    }
}

impl DetectionRule for NewEntityHighVolume {
    fn name(&self) -> &str {
        RULE
    }

    fn evaluate(&self, features: &FeatureTable, config: &DetectionConfig) -> RuleOutcome {
        let mut outcome = RuleOutcome::default();
        for entity_type in POPULATIONS {
            self.evaluate_population(entity_type, features, config, &mut outcome);
        }
        outcome
    }
}
