#![allow(dead_code)]

use chrono::{Duration, NaiveDate};

use claimscope_core::{ChangeType, Claim, EntityType, FeatureRecord, NetworkStatus, PolicyChangeEvent};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn record(entity_type: EntityType, id: &str) -> FeatureRecord {
    FeatureRecord {
        entity_id: id.to_string(),
        entity_type,
        total_claims: 10,
        total_allowed: 1_000.0,
        oon_rate: 0.05,
        denial_rate: 0.05,
        unique_procedure_codes: 6,
        entity_age_days: 365,
        billed_to_allowed_ratio: 1.5,
        service_category: None,
    }
}

/// A mixed population that trips every rule at least once.
pub fn mixed_population() -> Vec<FeatureRecord> {
    let mut records = Vec::new();
    for i in 0..12 {
        records.push(FeatureRecord {
            total_claims: 20 + i,
            total_allowed: 2_000.0 + 50.0 * i as f64,
            billed_to_allowed_ratio: 1.4 + 0.02 * i as f64,
            service_category: Some("E&M".to_string()),
            ..record(EntityType::Provider, &format!("P{:03}", i))
        });
    }
    records.push(FeatureRecord {
        total_claims: 400,
        total_allowed: 90_000.0,
        billed_to_allowed_ratio: 6.0,
        service_category: Some("E&M".to_string()),
        ..record(EntityType::Provider, "P-SPIKE")
    });
    records.push(FeatureRecord {
        total_claims: 60,
        entity_age_days: 30,
        ..record(EntityType::Provider, "P-NEW")
    });
    for i in 0..4 {
        records.push(FeatureRecord {
            total_claims: 30 + i,
            oon_rate: 0.1,
            service_category: Some("DME".to_string()),
            ..record(EntityType::Supplier, &format!("S{:03}", i))
        });
    }
    records.push(FeatureRecord {
        total_claims: 140,
        oon_rate: 0.97,
        unique_procedure_codes: 2,
        entity_age_days: 45,
        service_category: Some("DME".to_string()),
        ..record(EntityType::Supplier, "S-OON")
    });
    records
}

pub fn claim(id: usize, provider: &str, code: &str, service_date: NaiveDate) -> Claim {
    Claim {
        claim_id: format!("CLM-{:05}", id),
        provider_id: provider.to_string(),
        provider_type: EntityType::Provider,
        service_date,
        procedure_code: code.to_string(),
        network_status: NetworkStatus::InNetwork,
        denial_flag: false,
        denial_reason_category: None,
        appeal_flag: false,
        grievance_flag: false,
        billed_amount: 250.0,
        allowed_amount: 100.0,
    }
}

/// `n` claims for `code`, one per day starting at `start` (wrapping every 28 days).
pub fn claims_from(start: NaiveDate, code: &str, n: usize, first_id: usize) -> Vec<Claim> {
    (0..n)
        .map(|i| claim(first_id + i, "P001", code, start + Duration::days((i % 28) as i64)))
        .collect()
}

pub fn event(policy_id: &str, change_type: ChangeType, prefix: &str, effective: NaiveDate) -> PolicyChangeEvent {
    PolicyChangeEvent {
        policy_id: policy_id.to_string(),
        description: format!("{} prior auth change", prefix),
        affected_code_prefixes: vec![prefix.to_string()],
        change_type,
        effective_date: effective,
        pre_window_days: 28,
        post_window_days: 28,
        rebound_ratio_threshold: 1.1,
    }
}
