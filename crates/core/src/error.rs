use thiserror::Error;

/// Fatal errors for a single analysis invocation.
///
/// Non-fatal conditions (skipped rules, thin policy windows, degenerate
/// baselines) are reported as [`crate::RunWarning`] values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Invalid configuration at {field}: {message}")]
    InvalidConfiguration { field: String, message: String },

    #[error("Duplicate feature record for {entity_type} '{entity_id}'")]
    DuplicateEntity { entity_type: String, entity_id: String },

    #[error("Structural integrity violated: {0}")]
    StructuralIntegrity(String),

    #[error("Thread pool error: {0}")]
    ThreadPool(String),
}

impl AnalysisError {
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        AnalysisError::InvalidConfiguration {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Result alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
