pub mod algorithms;
pub mod appeals;
pub mod assembler;
pub mod benchmark;
pub mod detection;
pub mod engine;
pub mod features;
pub mod policy;

pub use appeals::{AppealsAnalyzer, AppealsFunnel, DenialCategory, ProviderAppealProfile};
pub use assembler::{AnalysisBundle, ResultAssembler, RunMetadata, RunParts};
pub use benchmark::{internal_metrics, BenchmarkComparator, BenchmarkComparison, Direction};
pub use detection::{DetectionEngine, DetectionOutcome, DetectionRule, RuleOutcome};
pub use engine::AnalysisEngine;
pub use policy::{PolicyImpactAnalyzer, PolicyImpactReport, PolicyKpi, WindowMetrics};
