//! Per-policy KPI roll-up over every claim matched to a policy's prefixes.

use serde::{Deserialize, Serialize};

use claimscope_core::{denial_approval_rates, Claim, PolicyChangeEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyKpi {
    pub policy_id: String,
    pub n_claims: u64,
    pub total_allowed: f64,
    pub avg_allowed: f64,
    pub approval_rate: f64,
    pub denial_rate: f64,
}

/// One row per policy with at least one matched claim, sorted by total
/// allowed descending then policy id. A claim matching several policies
/// counts toward each.
pub fn policy_kpis(events: &[PolicyChangeEvent], claims: &[Claim]) -> Vec<PolicyKpi> {
    let mut kpis: Vec<PolicyKpi> = events
        .iter()
        .filter_map(|event| {
            let matched: Vec<&Claim> = claims
                .iter()
                .filter(|c| c.matches_any_prefix(&event.affected_code_prefixes))
                .collect();
            if matched.is_empty() {
                return None;
            }
            let n = matched.len();
            let total_allowed: f64 = matched.iter().map(|c| c.allowed_amount).sum();
            let (denial_rate, approval_rate) = denial_approval_rates(matched.iter().copied());
            Some(PolicyKpi {
                policy_id: event.policy_id.clone(),
                n_claims: n as u64,
                total_allowed,
                avg_allowed: total_allowed / n as f64,
                approval_rate,
                denial_rate,
            })
        })
        .collect();

    kpis.sort_by(|a, b| {
        b.total_allowed
            .total_cmp(&a.total_allowed)
            .then_with(|| a.policy_id.cmp(&b.policy_id))
    });
    kpis
}
