//! Before/after impact of prior-authorization policy changes.
//!
//! For each [`PolicyChangeEvent`], claims matching the event's procedure
//! code prefixes are split into a pre-window and a post-window around the
//! effective date, summarised into [`WindowMetrics`], and compared.

pub mod kpis;

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use claimscope_core::{ChangeType, Claim, PolicyChangeEvent, RunWarning};

pub use kpis::{policy_kpis, PolicyKpi};

/// Claim volume and mix inside one half-open date window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowMetrics {
    pub start: NaiveDate,
    /// Exclusive.
    pub end: NaiveDate,
    pub volume: u64,
    pub total_allowed: f64,
    pub avg_allowed: f64,
    pub denial_rate: f64,
    pub oon_rate: f64,
}

impl WindowMetrics {
    fn collect<'a>(start: NaiveDate, end: NaiveDate, claims: impl Iterator<Item = &'a Claim>) -> Self {
        let mut volume = 0u64;
        let mut total_allowed = 0.0;
        let mut denied = 0u64;
        let mut oon = 0u64;
        for claim in claims.filter(|c| c.service_date >= start && c.service_date < end) {
            volume += 1;
            total_allowed += claim.allowed_amount;
            denied += u64::from(claim.denial_flag);
            oon += u64::from(claim.is_oon());
        }
        let rate = |n: u64| if volume == 0 { 0.0 } else { n as f64 / volume as f64 };
        Self {
            start,
            end,
            volume,
            total_allowed,
            avg_allowed: if volume == 0 { 0.0 } else { total_allowed / volume as f64 },
            denial_rate: rate(denied),
            oon_rate: rate(oon),
        }
    }
}

/// Outcome of one policy event. Comparison fields are `None` when either
/// window is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyImpactReport {
    pub policy_id: String,
    pub description: String,
    pub change_type: ChangeType,
    pub effective_date: NaiveDate,
    /// Claims matching the prefixes on any date.
    pub matched_claims: u64,
    pub pre_metrics: WindowMetrics,
    pub post_metrics: WindowMetrics,
    /// `(post - pre) / pre` as a fraction.
    pub volume_change_pct: Option<f64>,
    pub cost_change_pct: Option<f64>,
    /// Post minus pre, in rate points.
    pub denial_rate_change: Option<f64>,
    pub oon_rate_change: Option<f64>,
    pub rebound_detected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebound_detail: Option<String>,
    pub data_sufficient: bool,
}

impl PolicyImpactReport {
    /// The warning a report with thin windows contributes to a run.
    pub fn insufficiency_warning(&self) -> Option<RunWarning> {
        (!self.data_sufficient).then(|| RunWarning::InsufficientWindowData {
            policy_id: self.policy_id.clone(),
            pre_volume: self.pre_metrics.volume,
            post_volume: self.post_metrics.volume,
        })
    }
}

/// Reports for a list of events, in event order, plus their warnings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyOutcome {
    pub reports: Vec<PolicyImpactReport>,
    pub warnings: Vec<RunWarning>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyImpactAnalyzer;

impl PolicyImpactAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Compare the pre and post windows of one event.
    pub fn analyze(&self, event: &PolicyChangeEvent, claims: &[Claim]) -> PolicyImpactReport {
        let matched: Vec<&Claim> = claims
            .iter()
            .filter(|c| c.matches_any_prefix(&event.affected_code_prefixes))
            .collect();

        let (pre_start, pre_end) = event.pre_window();
        let (post_start, post_end) = event.post_window();
        let pre = WindowMetrics::collect(pre_start, pre_end, matched.iter().copied());
        let post = WindowMetrics::collect(post_start, post_end, matched.iter().copied());

        debug!(
            policy_id = %event.policy_id,
            matched = matched.len(),
            pre_volume = pre.volume,
            post_volume = post.volume,
            "policy windows collected"
        );

        let data_sufficient = pre.volume > 0 && post.volume > 0;
        let mut report = PolicyImpactReport {
            policy_id: event.policy_id.clone(),
            description: event.description.clone(),
            change_type: event.change_type,
            effective_date: event.effective_date,
            matched_claims: matched.len() as u64,
            volume_change_pct: None,
            cost_change_pct: None,
            denial_rate_change: None,
            oon_rate_change: None,
            rebound_detected: false,
            rebound_detail: None,
            data_sufficient,
            pre_metrics: pre,
            post_metrics: post,
        };

        if !data_sufficient {
            warn!(
                policy_id = %event.policy_id,
                pre_volume = report.pre_metrics.volume,
                post_volume = report.post_metrics.volume,
                "insufficient window data, comparisons withheld"
            );
            return report;
        }

        let pre = &report.pre_metrics;
        let post = &report.post_metrics;
        report.volume_change_pct = Some((post.volume as f64 - pre.volume as f64) / pre.volume as f64);
        report.cost_change_pct = (pre.total_allowed > 0.0)
            .then(|| (post.total_allowed - pre.total_allowed) / pre.total_allowed);
        report.denial_rate_change = Some(post.denial_rate - pre.denial_rate);
        report.oon_rate_change = Some(post.oon_rate - pre.oon_rate);

        if event.change_type == ChangeType::Removed {
            let ratio = post.volume as f64 / pre.volume as f64;
            if ratio >= event.rebound_ratio_threshold {
                report.rebound_detail = Some(format!(
                    "post-window volume {} is {:.0}% of pre-window volume {} (rebound at {:.0}%)",
                    post.volume,
                    ratio * 100.0,
                    pre.volume,
                    event.rebound_ratio_threshold * 100.0
                ));
                report.rebound_detected = true;
            }
        }

        info!(
            policy_id = %report.policy_id,
            change_type = ?report.change_type,
            volume_change_pct = ?report.volume_change_pct,
            rebound = report.rebound_detected,
            "policy impact analyzed"
        );
        report
    }

    /// Analyze every event in parallel; reports keep event order.
    pub fn analyze_all(&self, events: &[PolicyChangeEvent], claims: &[Claim]) -> PolicyOutcome {
        let reports: Vec<PolicyImpactReport> =
            events.par_iter().map(|event| self.analyze(event, claims)).collect();
        let warnings = reports.iter().filter_map(|r| r.insufficiency_warning()).collect();
        PolicyOutcome { reports, warnings }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use claimscope_core::{EntityType, NetworkStatus};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn claim(code: &str, service_date: NaiveDate, allowed: f64) -> Claim {
        Claim {
            claim_id: format!("C-{}-{}", code, service_date),
            provider_id: "P1".to_string(),
            provider_type: EntityType::Provider,
            service_date,
            procedure_code: code.to_string(),
            network_status: NetworkStatus::InNetwork,
            denial_flag: false,
            denial_reason_category: None,
            appeal_flag: false,
            grievance_flag: false,
            billed_amount: allowed * 1.5,
            allowed_amount: allowed,
        }
    }

    fn event(change_type: ChangeType) -> PolicyChangeEvent {
        PolicyChangeEvent {
            policy_id: "POL-IMG".to_string(),
            description: "Imaging prior auth".to_string(),
            affected_code_prefixes: vec!["CPT-7".to_string()],
            change_type,
            effective_date: date(2024, 7, 1),
            pre_window_days: 28,
            post_window_days: 28,
            rebound_ratio_threshold: 1.1,
        }
    }

    /// `n` claims spread over the 28 days starting at `start`.
    fn spread(code: &str, start: NaiveDate, n: i64, allowed: f64) -> Vec<Claim> {
        (0..n).map(|i| claim(code, start + Duration::days(i % 28), allowed)).collect()
    }

    #[test]
    fn removal_rebound() {
        let mut claims = spread("CPT-70450", date(2024, 6, 3), 12, 100.0);
        claims.extend(spread("CPT-71046", date(2024, 7, 1), 15, 100.0));
        claims.extend(spread("CPT-99213", date(2024, 7, 1), 40, 100.0));

        let report = PolicyImpactAnalyzer::new().analyze(&event(ChangeType::Removed), &claims);
        assert!(report.data_sufficient);
        assert_eq!(report.matched_claims, 27);
        assert_eq!(report.pre_metrics.volume, 12);
        assert_eq!(report.post_metrics.volume, 15);
        assert!((report.volume_change_pct.unwrap() - 0.25).abs() < 1e-12);
        assert!((report.cost_change_pct.unwrap() - 0.25).abs() < 1e-12);
        assert!(report.rebound_detected);
        assert!(report.rebound_detail.is_some());
        assert!(report.insufficiency_warning().is_none());
    }

    #[test]
    fn added_policy_never_rebounds() {
        let mut claims = spread("CPT-70450", date(2024, 6, 3), 12, 100.0);
        claims.extend(spread("CPT-70450", date(2024, 7, 1), 30, 100.0));
        let report = PolicyImpactAnalyzer::new().analyze(&event(ChangeType::Added), &claims);
        assert!(report.data_sufficient);
        assert!(!report.rebound_detected);
        assert!(report.rebound_detail.is_none());
    }

    #[test]
    fn below_ratio_is_not_rebound() {
        let mut claims = spread("CPT-70450", date(2024, 6, 3), 20, 100.0);
        claims.extend(spread("CPT-70450", date(2024, 7, 1), 21, 100.0));
        let report = PolicyImpactAnalyzer::new().analyze(&event(ChangeType::Removed), &claims);
        assert!(!report.rebound_detected);
        assert!((report.volume_change_pct.unwrap() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn empty_pre_window_withholds_comparisons() {
        let claims = spread("CPT-70450", date(2024, 7, 1), 10, 100.0);
        let report = PolicyImpactAnalyzer::new().analyze(&event(ChangeType::Removed), &claims);
        assert!(!report.data_sufficient);
        assert_eq!(report.pre_metrics.volume, 0);
        assert_eq!(report.volume_change_pct, None);
        assert_eq!(report.cost_change_pct, None);
        assert_eq!(report.denial_rate_change, None);
        assert!(!report.rebound_detected);
        assert_eq!(
            report.insufficiency_warning(),
            Some(RunWarning::InsufficientWindowData {
                policy_id: "POL-IMG".to_string(),
                pre_volume: 0,
                post_volume: 10,
            })
        );
    }

    #[test]
    fn window_edges_are_half_open() {
        let claims = vec![
            claim("CPT-70450", date(2024, 6, 3), 10.0), // first pre day
            claim("CPT-70450", date(2024, 6, 2), 10.0), // before pre window
            claim("CPT-70450", date(2024, 7, 1), 10.0), // effective date -> post
            claim("CPT-70450", date(2024, 7, 29), 10.0), // post end, excluded
        ];
        let report = PolicyImpactAnalyzer::new().analyze(&event(ChangeType::Removed), &claims);
        assert_eq!(report.pre_metrics.volume, 1);
        assert_eq!(report.post_metrics.volume, 1);
        assert_eq!(report.matched_claims, 4);
    }

    #[test]
    fn window_rates() {
        let mut claims = spread("CPT-70450", date(2024, 6, 3), 4, 50.0);
        claims[0].denial_flag = true;
        claims[1].network_status = NetworkStatus::OutOfNetwork;
        claims.extend(spread("CPT-70450", date(2024, 7, 1), 4, 50.0));
        let report = PolicyImpactAnalyzer::new().analyze(&event(ChangeType::Added), &claims);
        assert_eq!(report.pre_metrics.denial_rate, 0.25);
        assert_eq!(report.pre_metrics.oon_rate, 0.25);
        assert_eq!(report.pre_metrics.avg_allowed, 50.0);
        assert_eq!(report.denial_rate_change, Some(-0.25));
    }

    #[test]
    fn analyze_all_keeps_event_order() {
        let mut second = event(ChangeType::Added);
        second.policy_id = "POL-DME".to_string();
        second.affected_code_prefixes = vec!["HCPCS-E".to_string()];
        let claims = spread("CPT-70450", date(2024, 6, 3), 5, 10.0);

        let outcome = PolicyImpactAnalyzer::new().analyze_all(&[event(ChangeType::Removed), second], &claims);
        let ids: Vec<&str> = outcome.reports.iter().map(|r| r.policy_id.as_str()).collect();
        assert_eq!(ids, vec!["POL-IMG", "POL-DME"]);
        assert_eq!(outcome.warnings.len(), 2);
    }

    #[test]
    fn oversized_pre_window_covers_all_history() {
        let mut wide = event(ChangeType::Removed);
        wide.pre_window_days = 200_000_000;
        let mut claims = spread("CPT-70450", date(1990, 1, 1), 3, 10.0);
        claims.extend(spread("CPT-70450", date(2024, 7, 1), 3, 10.0));

        let report = PolicyImpactAnalyzer::new().analyze(&wide, &claims);
        assert_eq!(report.pre_metrics.start, NaiveDate::MIN);
        assert_eq!(report.pre_metrics.volume, 3);
        assert_eq!(report.post_metrics.volume, 3);
    }
}
