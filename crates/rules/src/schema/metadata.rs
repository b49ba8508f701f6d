use serde::{Deserialize, Serialize};

/// `metadata:` block carried by every analysis document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CommonMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Disabled documents still load and validate but are left out of the run.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

impl CommonMetadata {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

fn enabled_by_default() -> bool {
    true
}
