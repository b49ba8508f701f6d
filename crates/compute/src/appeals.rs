//! Denial → appeal funnel and administrative burden.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use claimscope_core::{AnalysisError, Claim, Result};
use claimscope_rules::AppealsConfig;

/// Category for denied claims that carry no denial reason.
pub const UNCATEGORIZED: &str = "uncategorized";

/// Funnel metrics for one denial-reason category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DenialCategory {
    pub category: String,
    pub denials: u64,
    pub appeals: u64,
    /// `appeals / denials`, 0 when there are no denials.
    pub appeal_rate: f64,
    pub grievances: u64,
    pub billed_amount: f64,
    pub allowed_amount: f64,
}

impl DenialCategory {
    fn empty(category: &str) -> Self {
        Self {
            category: category.to_string(),
            denials: 0,
            appeals: 0,
            appeal_rate: 0.0,
            grievances: 0,
            billed_amount: 0.0,
            allowed_amount: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderAppealProfile {
    pub provider_id: String,
    pub denials: u64,
    pub appeals: u64,
    pub appeal_rate: f64,
    pub top_denial_reason: String,
    pub billed_amount_denied: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppealsFunnel {
    pub total_claims: u64,
    pub total_denials: u64,
    /// Every appealed claim, denied or not. Drives the admin cost.
    pub total_appeals: u64,
    /// Appeals filed against denied claims.
    pub denied_appeals: u64,
    pub total_grievances: u64,
    pub overall_denial_rate: f64,
    pub overall_approval_rate: f64,
    /// `denied_appeals / total_denials`.
    pub overall_appeal_rate: f64,
    pub admin_cost_estimate: f64,
    /// Every category, by denial volume desc then name.
    pub categories: Vec<DenialCategory>,
    /// Up to `top_n_categories` names with at least one denial.
    pub top_categories: Vec<String>,
    pub provider_profiles: Vec<ProviderAppealProfile>,
}

impl AppealsFunnel {
    pub fn category(&self, name: &str) -> Option<&DenialCategory> {
        self.categories.iter().find(|c| c.category == name)
    }
}

fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[derive(Default)]
struct ProviderTally<'a> {
    denials: u64,
    appeals: u64,
    billed: f64,
    reasons: BTreeMap<&'a str, u64>,
}

/// Validated appeals analyzer.
#[derive(Debug, Clone)]
pub struct AppealsAnalyzer {
    config: AppealsConfig,
}

impl AppealsAnalyzer {
    /// Rejects a negative or non-finite `cost_per_appeal`.
    pub fn new(config: AppealsConfig) -> Result<Self> {
        if !(config.cost_per_appeal.is_finite() && config.cost_per_appeal >= 0.0) {
            return Err(AnalysisError::invalid_config(
                "appeals.cost_per_appeal",
                format!("must be finite and non-negative, got {}", config.cost_per_appeal),
            ));
        }
        Ok(Self { config })
    }

    pub fn config(&self) -> &AppealsConfig {
        &self.config
    }

    pub fn analyze(&self, claims: &[Claim]) -> AppealsFunnel {
        let mut categories: BTreeMap<&str, DenialCategory> = self
            .config
            .known_categories
            .iter()
            .map(|c| (c.as_str(), DenialCategory::empty(c)))
            .collect();
        let mut providers: BTreeMap<&str, ProviderTally> = BTreeMap::new();
        let mut total_appeals = 0u64;
        let mut total_grievances = 0u64;

        for claim in claims {
            total_appeals += u64::from(claim.appeal_flag);
            total_grievances += u64::from(claim.grievance_flag);
            if !claim.denial_flag {
                continue;
            }
            let reason = claim.denial_reason_category.as_deref().unwrap_or(UNCATEGORIZED);

            let cat = categories
                .entry(reason)
                .or_insert_with(|| DenialCategory::empty(reason));
            cat.denials += 1;
            cat.appeals += u64::from(claim.appeal_flag);
            cat.grievances += u64::from(claim.grievance_flag);
            cat.billed_amount += claim.billed_amount;
            cat.allowed_amount += claim.allowed_amount;

            let tally = providers.entry(claim.provider_id.as_str()).or_default();
            tally.denials += 1;
            tally.appeals += u64::from(claim.appeal_flag);
            tally.billed += claim.billed_amount;
            *tally.reasons.entry(reason).or_default() += 1;
        }

        let mut categories: Vec<DenialCategory> = categories
            .into_values()
            .map(|mut c| {
                c.appeal_rate = ratio(c.appeals, c.denials);
                c
            })
            .collect();
        // Stable sort keeps name order among equal volumes.
        categories.sort_by(|a, b| b.denials.cmp(&a.denials));

        let mut profiles: Vec<ProviderAppealProfile> = providers
            .into_iter()
            .map(|(provider_id, tally)| {
                // Most frequent reason; BTreeMap order makes ties alphabetical.
                let top_denial_reason = tally
                    .reasons
                    .iter()
                    .fold(None::<(&str, u64)>, |best, (&reason, &n)| match best {
                        Some((_, m)) if m >= n => best,
                        _ => Some((reason, n)),
                    })
                    .map(|(reason, _)| reason.to_string())
                    .unwrap_or_else(|| UNCATEGORIZED.to_string());
                ProviderAppealProfile {
                    provider_id: provider_id.to_string(),
                    denials: tally.denials,
                    appeals: tally.appeals,
                    appeal_rate: ratio(tally.appeals, tally.denials),
                    top_denial_reason,
                    billed_amount_denied: tally.billed,
                }
            })
            .collect();
        profiles.sort_by(|a, b| b.appeals.cmp(&a.appeals));
        profiles.truncate(self.config.top_n_providers);

        let total_claims = claims.len() as u64;
        let total_denials: u64 = categories.iter().map(|c| c.denials).sum();
        let denied_appeals: u64 = categories.iter().map(|c| c.appeals).sum();
        let overall_denial_rate = ratio(total_denials, total_claims);

        let funnel = AppealsFunnel {
            total_claims,
            total_denials,
            total_appeals,
            denied_appeals,
            total_grievances,
            overall_denial_rate,
            overall_approval_rate: if total_claims == 0 { 0.0 } else { 1.0 - overall_denial_rate },
            overall_appeal_rate: ratio(denied_appeals, total_denials),
            admin_cost_estimate: total_appeals as f64 * self.config.cost_per_appeal,
            top_categories: categories
                .iter()
                .filter(|c| c.denials > 0)
                .take(self.config.top_n_categories)
                .map(|c| c.category.clone())
                .collect(),
            categories,
            provider_profiles: profiles,
        };

        info!(
            claims = funnel.total_claims,
            denials = funnel.total_denials,
            appeals = funnel.total_appeals,
            admin_cost = funnel.admin_cost_estimate,
            "appeals funnel computed"
        );
        funnel
    }
}
