//! Analysis configuration documents.
//!
//! This crate provides:
//! - YAML document kinds (`DetectionConfig`, `PolicyChange`, `BenchmarkSet`,
//!   `AppealsConfig`) with serde deserialization and defaults
//! - Filesystem loader with two-pass envelope → kind dispatch
//! - Merging of loaded documents into one [`AnalysisConfig`]
//! - Pre-run validation with structured errors and warnings

pub mod analysis;
pub mod appeals_config;
pub mod benchmark_config;
pub mod detection_config;
pub mod loader;
pub mod schema;
pub mod validation;

pub use analysis::AnalysisConfig;
pub use appeals_config::AppealsConfig;
pub use benchmark_config::{BenchmarkBaseline, BENCHMARK_METRICS};
pub use detection_config::{DetectionConfig, PercentileMethod, SeverityPolicy};
pub use loader::{ConfigError, ConfigLoader};
