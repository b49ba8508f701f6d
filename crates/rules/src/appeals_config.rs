//! AppealsConfig document kind: administrative cost and ranking settings.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppealsConfig {
    /// Estimated administrative cost of one appeal (USD). Must be >= 0.
    #[serde(default = "default_cost_per_appeal")]
    pub cost_per_appeal: f64,
    #[serde(default = "default_top_n_categories")]
    pub top_n_categories: usize,
    #[serde(default = "default_top_n_providers")]
    pub top_n_providers: usize,
    /// Categories reported even when a run has no denials for them.
    #[serde(default)]
    pub known_categories: Vec<String>,
}

fn default_cost_per_appeal() -> f64 { 350.0 }
fn default_top_n_categories() -> usize { 5 }
fn default_top_n_providers() -> usize { 10 }

impl Default for AppealsConfig {
    fn default() -> Self {
        Self {
            cost_per_appeal: default_cost_per_appeal(),
            top_n_categories: default_top_n_categories(),
            top_n_providers: default_top_n_providers(),
            known_categories: Vec::new(),
        }
    }
}
