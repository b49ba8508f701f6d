//! Per-entity feature records and the immutable table every detection rule reads.

use serde::{Deserialize, Serialize};

use crate::entity::EntityType;
use crate::error::{AnalysisError, Result};

/// Aggregated features for one entity in one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub entity_id: String,
    pub entity_type: EntityType,
    pub total_claims: u64,
    pub total_allowed: f64,
    /// Fraction of claims billed out of network, 0..1.
    pub oon_rate: f64,
    /// Fraction of claims denied, 0..1.
    pub denial_rate: f64,
    pub unique_procedure_codes: u64,
    /// Days since the entity's first observed claim.
    pub entity_age_days: u64,
    pub billed_to_allowed_ratio: f64,
    #[serde(default)]
    pub service_category: Option<String>,
}

/// Immutable, keyed collection of [`FeatureRecord`]s.
///
/// Records are held sorted by `(entity_type, entity_id)` so iteration is
/// deterministic regardless of the order the producer emitted them in, and
/// lookups binary-search that order.
#[derive(Debug, Clone, Default)]
pub struct FeatureTable {
    records: Vec<FeatureRecord>,
}

fn key(record: &FeatureRecord) -> (EntityType, &str) {
    (record.entity_type, record.entity_id.as_str())
}

impl FeatureTable {
    /// Build a table, rejecting duplicate `(entity_type, entity_id)` keys.
    pub fn new(mut records: Vec<FeatureRecord>) -> Result<Self> {
        records.sort_by(|a, b| key(a).cmp(&key(b)));

        if let Some(pair) = records.windows(2).find(|w| key(&w[0]) == key(&w[1])) {
            return Err(AnalysisError::DuplicateEntity {
                entity_type: pair[1].entity_type.to_string(),
                entity_id: pair[1].entity_id.clone(),
            });
        }

        Ok(Self { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureRecord> {
        self.records.iter()
    }

    /// All records of one entity type, in entity id order.
    pub fn of_type(&self, entity_type: EntityType) -> impl Iterator<Item = &FeatureRecord> {
        self.records
            .iter()
            .filter(move |r| r.entity_type == entity_type)
    }

    pub fn get(&self, entity_type: EntityType, entity_id: &str) -> Option<&FeatureRecord> {
        self.records
            .binary_search_by(|r| key(r).cmp(&(entity_type, entity_id)))
            .ok()
            .map(|pos| &self.records[pos])
    }

    pub fn contains(&self, entity_type: EntityType, entity_id: &str) -> bool {
        self.get(entity_type, entity_id).is_some()
    }
}
