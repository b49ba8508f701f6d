use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{CommonMetadata, ConfigDocument, ConfigKind};

/// Header-only view of a document. `kind` is read first, then the whole
/// value is deserialized again into the matching typed document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigEnvelope {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(flatten)]
    pub rest: serde_yaml::Value,
}

impl ConfigEnvelope {
    pub fn config_kind(&self) -> Result<ConfigKind, String> {
        self.kind.parse()
    }

    pub fn parse_full(&self) -> Result<ConfigDocument, String> {
        let kind = self.config_kind()?;
        let value = serde_yaml::to_value(self).map_err(|e| e.to_string())?;
        Ok(match kind {
            ConfigKind::DetectionConfig => ConfigDocument::Detection(typed(value)?),
            ConfigKind::PolicyChange => ConfigDocument::PolicyChange(typed(value)?),
            ConfigKind::BenchmarkSet => ConfigDocument::BenchmarkSet(typed(value)?),
            ConfigKind::AppealsConfig => ConfigDocument::Appeals(typed(value)?),
        })
    }
}

fn typed<T: DeserializeOwned>(value: serde_yaml::Value) -> Result<T, String> {
    serde_yaml::from_value(value).map_err(|e| e.to_string())
}
