use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Load `.env` into the process environment if one exists.
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

/// `{PROFILE}_{KEY}` when a profile is active and the prefixed key is
/// set, else `{KEY}`. Empty values count as unset.
fn lookup(profile: &str, key: &str) -> Option<String> {
    let non_empty = |k: &str| env::var(k).ok().filter(|v| !v.is_empty());
    if profile.is_empty() {
        return non_empty(key);
    }
    non_empty(&format!("{}_{}", profile, key)).or_else(|| non_empty(key))
}

/// Parsed lookup. Values that fail to parse are treated as unset.
fn lookup_parsed<T: FromStr>(profile: &str, key: &str) -> Option<T> {
    lookup(profile, key).and_then(|v| v.trim().parse().ok())
}

// ── Top-level config ──────────────────────────────────────────

/// Process-level settings for an analysis run.
///
/// Thresholds and policy definitions live in the YAML analysis documents
/// (see `claimscope-rules`); this only covers where to find them and how
/// the run is executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    /// Directory scanned for analysis config documents.
    pub config_dir: PathBuf,
    /// Rayon worker threads for one run. 0 = rayon's default pool.
    pub worker_threads: usize,
    /// Overrides `AppealsConfig.cost_per_appeal` when set.
    pub cost_per_appeal: Option<f64>,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `CLAIMSCOPE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env::var("CLAIMSCOPE_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let profile = profile.trim().to_uppercase();
        let defaults = Self::default();
        Self {
            config_dir: lookup(&profile, "CLAIMSCOPE_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.config_dir),
            worker_threads: lookup_parsed(&profile, "CLAIMSCOPE_WORKER_THREADS")
                .unwrap_or(defaults.worker_threads),
            cost_per_appeal: lookup_parsed(&profile, "CLAIMSCOPE_COST_PER_APPEAL"),
            profile,
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn log_summary(&self) {
        tracing::info!(
            profile = self.profile_label(),
            config_dir = %self.config_dir.display(),
            worker_threads = self.worker_threads,
            cost_per_appeal_override = ?self.cost_per_appeal,
            "analysis config loaded"
        );
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile: String::new(),
            config_dir: PathBuf::from("config/analysis"),
            worker_threads: 0,
            cost_per_appeal: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiled_keys_win_over_plain_keys() {
        env::set_var("CSTESTA_CLAIMSCOPE_WORKER_THREADS", "6");
        env::set_var("CSTESTA_CLAIMSCOPE_COST_PER_APPEAL", "410.5");

        let config = Config::for_profile("cstesta");
        assert_eq!(config.profile, "CSTESTA");
        assert_eq!(config.worker_threads, 6);
        assert_eq!(config.cost_per_appeal, Some(410.5));
    }

    #[test]
    fn unparseable_values_fall_back_to_defaults() {
        env::set_var("CSTESTB_CLAIMSCOPE_WORKER_THREADS", "many");
        env::set_var("CSTESTB_CLAIMSCOPE_COST_PER_APPEAL", "cheap");

        let config = Config::for_profile("CSTESTB");
        assert_eq!(config.worker_threads, 0);
        assert_eq!(config.cost_per_appeal, None);
    }

    #[test]
    fn default_profile_label() {
        let config = Config::default();
        assert_eq!(config.profile_label(), "default");
        assert_eq!(config.config_dir, PathBuf::from("config/analysis"));
    }
}
