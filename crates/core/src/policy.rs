//! Policy change events: authorization requirements toggled on or off for
//! a set of procedure code prefixes.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Added,
    Removed,
}

/// Default rebound ratio: post volume at 110% of pre volume.
pub const DEFAULT_REBOUND_RATIO: f64 = 1.1;

/// Default pre/post window: 12 weeks.
pub const DEFAULT_WINDOW_DAYS: i64 = 84;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyChangeEvent {
    pub policy_id: String,
    #[serde(default)]
    pub description: String,
    pub affected_code_prefixes: Vec<String>,
    pub change_type: ChangeType,
    pub effective_date: NaiveDate,
    /// Signed so that negative sizes survive deserialization and are rejected
    /// by validation instead of failing to parse.
    #[serde(default = "default_window_days")]
    pub pre_window_days: i64,
    #[serde(default = "default_window_days")]
    pub post_window_days: i64,
    #[serde(default = "default_rebound_ratio")]
    pub rebound_ratio_threshold: f64,
}

fn default_window_days() -> i64 {
    DEFAULT_WINDOW_DAYS
}

fn default_rebound_ratio() -> f64 {
    DEFAULT_REBOUND_RATIO
}

impl PolicyChangeEvent {
    /// First day of the pre-window, or `None` when it falls outside the
    /// representable calendar.
    pub fn pre_window_start(&self) -> Option<NaiveDate> {
        shift(self.effective_date, self.pre_window_days.checked_neg()?)
    }

    /// Exclusive end of the post-window, or `None` when out of range.
    pub fn post_window_end(&self) -> Option<NaiveDate> {
        shift(self.effective_date, self.post_window_days)
    }

    /// `[effective_date - pre_window_days, effective_date)`, clamped to
    /// `NaiveDate::MIN`.
    pub fn pre_window(&self) -> (NaiveDate, NaiveDate) {
        (
            self.pre_window_start().unwrap_or(NaiveDate::MIN),
            self.effective_date,
        )
    }

    /// `[effective_date, effective_date + post_window_days)`, clamped to
    /// `NaiveDate::MAX`.
    pub fn post_window(&self) -> (NaiveDate, NaiveDate) {
        (
            self.effective_date,
            self.post_window_end().unwrap_or(NaiveDate::MAX),
        )
    }
}

fn shift(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    Duration::try_days(days).and_then(|d| date.checked_add_signed(d))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_windows_and_ratio() {
        let event: PolicyChangeEvent = serde_json::from_value(serde_json::json!({
            "policy_id": "POL-001",
            "affected_code_prefixes": ["CPT-7"],
            "change_type": "removed",
            "effective_date": "2024-07-01"
        }))
        .unwrap();

        assert_eq!(event.pre_window_days, 84);
        assert_eq!(event.post_window_days, 84);
        assert_eq!(event.rebound_ratio_threshold, 1.1);
        assert_eq!(event.change_type, ChangeType::Removed);
    }

    #[test]
    fn windows_are_half_open_around_effective_date() {
        let event = PolicyChangeEvent {
            policy_id: "POL-002".to_string(),
            description: String::new(),
            affected_code_prefixes: vec!["CPT-7".to_string()],
            change_type: ChangeType::Added,
            effective_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            pre_window_days: 10,
            post_window_days: 5,
            rebound_ratio_threshold: 1.1,
        };
        let (pre_start, pre_end) = event.pre_window();
        let (post_start, post_end) = event.post_window();
        assert_eq!(pre_start, NaiveDate::from_ymd_opt(2024, 2, 20).unwrap());
        assert_eq!(pre_end, post_start);
        assert_eq!(post_end, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
    }

    #[test]
    fn oversized_windows_clamp_instead_of_overflowing() {
        let event = PolicyChangeEvent {
            policy_id: "POL-003".to_string(),
            description: String::new(),
            affected_code_prefixes: vec!["CPT-7".to_string()],
            change_type: ChangeType::Removed,
            effective_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            pre_window_days: 200_000_000,
            post_window_days: i64::MAX,
            rebound_ratio_threshold: 1.1,
        };
        assert_eq!(event.pre_window_start(), None);
        assert_eq!(event.post_window_end(), None);
        assert_eq!(event.pre_window().0, NaiveDate::MIN);
        assert_eq!(event.post_window().1, NaiveDate::MAX);
    }
}
