//! Claims time-series rows consumed by the policy, appeals, benchmark and
//! feature-aggregation stages.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::EntityType;

/// Network status of the billing entity for a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NetworkStatus {
    #[serde(rename = "INN")]
    InNetwork,
    #[serde(rename = "OON")]
    OutOfNetwork,
}

/// One adjudicated claim line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub claim_id: String,
    pub provider_id: String,
    /// Whether the billing entity is a provider or a supplier.
    #[serde(default = "default_provider_type")]
    pub provider_type: EntityType,
    pub service_date: NaiveDate,
    pub procedure_code: String,
    pub network_status: NetworkStatus,
    pub denial_flag: bool,
    #[serde(default)]
    pub denial_reason_category: Option<String>,
    #[serde(default)]
    pub appeal_flag: bool,
    #[serde(default)]
    pub grievance_flag: bool,
    pub billed_amount: f64,
    pub allowed_amount: f64,
}

fn default_provider_type() -> EntityType {
    EntityType::Provider
}

impl Claim {
    pub fn is_oon(&self) -> bool {
        self.network_status == NetworkStatus::OutOfNetwork
    }

    pub fn matches_any_prefix<S: AsRef<str>>(&self, prefixes: &[S]) -> bool {
        prefixes
            .iter()
            .any(|p| self.procedure_code.starts_with(p.as_ref()))
    }

    pub fn service_category(&self) -> &'static str {
        service_category_for(&self.procedure_code)
    }
}

/// Procedure code prefix → service category, checked in order.
pub const SERVICE_CATEGORIES: &[(&str, &str)] = &[
    ("HCPCS-E", "DME"),
    ("HCPCS-K", "DME"),
    ("CPT-7", "Imaging"),
    ("CPT-99", "E&M"),
    ("CPT-2", "Surgical"),
    ("CPT-3", "Surgical"),
    ("CPT-4", "Surgical"),
    ("CPT-5", "Surgical"),
    ("CPT-6", "Surgical"),
];

/// Category used when no prefix matches.
pub const OTHER_CATEGORY: &str = "Other";

/// Map a procedure code to its service category.
pub fn service_category_for(procedure_code: &str) -> &'static str {
    SERVICE_CATEGORIES
        .iter()
        .find(|(prefix, _)| procedure_code.starts_with(prefix))
        .map(|(_, category)| *category)
        .unwrap_or(OTHER_CATEGORY)
}

/// Denial and approval rate of a claim slice; both 0 for an empty slice.
pub fn denial_approval_rates<'a, I>(claims: I) -> (f64, f64)
where
    I: IntoIterator<Item = &'a Claim>,
{
    let (total, denied) = claims
        .into_iter()
        .fold((0usize, 0usize), |(t, d), c| (t + 1, d + usize::from(c.denial_flag)));
    if total == 0 {
        return (0.0, 0.0);
    }
    let denial_rate = denied as f64 / total as f64;
    (denial_rate, 1.0 - denial_rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_mapping() {
        assert_eq!(service_category_for("HCPCS-E0110"), "DME");
        assert_eq!(service_category_for("CPT-70112"), "Imaging");
        assert_eq!(service_category_for("CPT-99213"), "E&M");
        assert_eq!(service_category_for("CPT-45105"), "Surgical");
        assert_eq!(service_category_for("RX-01020"), OTHER_CATEGORY);
    }

    #[test]
    fn network_status_wire_names() {
        let json = serde_json::to_string(&NetworkStatus::OutOfNetwork).unwrap();
        assert_eq!(json, "\"OON\"");
        let parsed: NetworkStatus = serde_json::from_str("\"INN\"").unwrap();
        assert_eq!(parsed, NetworkStatus::InNetwork);
    }

    #[test]
    fn empty_slice_rates_are_zero() {
        let empty: Vec<Claim> = Vec::new();
        let (denial, approval) = denial_approval_rates(&empty);
        assert_eq!(denial, 0.0);
        assert_eq!(approval, 0.0);
    }
}
