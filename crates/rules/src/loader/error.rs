use std::path::PathBuf;

use claimscope_core::AnalysisError;

use crate::schema::ConfigKind;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Missing id, unknown kind, duplicate id, or conflicting singleton documents.
    #[error("invalid analysis documents: {0}")]
    Validation(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl From<ConfigError> for AnalysisError {
    fn from(e: ConfigError) -> Self {
        AnalysisError::invalid_config("documents", e.to_string())
    }
}

/// Per-file record produced by a directory scan.
#[derive(Debug)]
pub struct LoadResult {
    pub path: PathBuf,
    pub status: LoadStatus,
}

#[derive(Debug)]
pub enum LoadStatus {
    Loaded { id: String, kind: ConfigKind },
    /// Dotfiles and files without a `.yml`/`.yaml` extension.
    Skipped { reason: String },
    Failed { error: String },
}

impl LoadStatus {
    pub fn is_failed(&self) -> bool {
        self.failure().is_some()
    }

    /// The error message when the file failed to load.
    pub fn failure(&self) -> Option<&str> {
        match self {
            LoadStatus::Failed { error } => Some(error),
            _ => None,
        }
    }
}
