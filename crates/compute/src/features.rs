//! Builds a [`FeatureTable`] from a claims slice.
//!
//! One record per `(provider_type, provider_id)`. Entity age is measured
//! from the entity's first claim to the latest service date in the slice,
//! so every entity is aged against the same "as of" date.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use tracing::info;

use claimscope_core::{Claim, EntityType, FeatureRecord, FeatureTable, Result};

#[derive(Default)]
struct EntityTally<'a> {
    claims: u64,
    allowed: f64,
    billed: f64,
    oon: u64,
    denied: u64,
    codes: BTreeSet<&'a str>,
    categories: BTreeMap<&'static str, u64>,
    first_date: Option<NaiveDate>,
}

impl<'a> EntityTally<'a> {
    fn add(&mut self, claim: &'a Claim) {
        self.claims += 1;
        self.allowed += claim.allowed_amount;
        self.billed += claim.billed_amount;
        self.oon += u64::from(claim.is_oon());
        self.denied += u64::from(claim.denial_flag);
        self.codes.insert(claim.procedure_code.as_str());
        *self.categories.entry(claim.service_category()).or_default() += 1;
        self.first_date = Some(match self.first_date {
            Some(d) => d.min(claim.service_date),
            None => claim.service_date,
        });
    }

    /// Most frequent category; ties resolve alphabetically.
    fn dominant_category(&self) -> Option<String> {
        self.categories
            .iter()
            .fold(None::<(&str, u64)>, |best, (&cat, &n)| match best {
                Some((_, m)) if m >= n => best,
                _ => Some((cat, n)),
            })
            .map(|(cat, _)| cat.to_string())
    }

    fn into_record(self, entity_type: EntityType, entity_id: &str, as_of: NaiveDate) -> FeatureRecord {
        let n = self.claims as f64;
        let age = self
            .first_date
            .map(|first| (as_of - first).num_days().max(0) as u64)
            .unwrap_or(0);
        FeatureRecord {
            entity_id: entity_id.to_string(),
            entity_type,
            total_claims: self.claims,
            total_allowed: self.allowed,
            oon_rate: self.oon as f64 / n,
            denial_rate: self.denied as f64 / n,
            unique_procedure_codes: self.codes.len() as u64,
            entity_age_days: age,
            billed_to_allowed_ratio: if self.allowed > 0.0 { self.billed / self.allowed } else { 0.0 },
            service_category: self.dominant_category(),
        }
    }
}

/// Aggregate per-entity features from claims.
pub fn aggregate(claims: &[Claim]) -> Result<FeatureTable> {
    let Some(as_of) = claims.iter().map(|c| c.service_date).max() else {
        return FeatureTable::new(Vec::new());
    };

    let mut tallies: BTreeMap<(EntityType, &str), EntityTally> = BTreeMap::new();
    for claim in claims {
        tallies
            .entry((claim.provider_type, claim.provider_id.as_str()))
            .or_default()
            .add(claim);
    }

    let records: Vec<FeatureRecord> = tallies
        .into_iter()
        .map(|((entity_type, id), tally)| tally.into_record(entity_type, id, as_of))
        .collect();

    info!(claims = claims.len(), records = records.len(), as_of = %as_of, "features aggregated");
    FeatureTable::new(records)
}
