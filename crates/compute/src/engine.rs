use std::time::Instant;

use tracing::{info, warn};

use claimscope_core::{load_dotenv, AnalysisError, Claim, Config, FeatureTable, Result};
use claimscope_rules::validation::validate_analysis_config;
use claimscope_rules::{AnalysisConfig, ConfigLoader};

use crate::appeals::AppealsAnalyzer;
use crate::assembler::{AnalysisBundle, ResultAssembler, RunParts};
use crate::benchmark::{internal_metrics, BenchmarkComparator};
use crate::detection::DetectionEngine;
use crate::policy::{policy_kpis, PolicyImpactAnalyzer};

/// Validated orchestrator for one analysis run.
///
/// Detection and the claim analyzers share no state, so they run as
/// parallel branches; the assembler then checks and merges their output.
pub struct AnalysisEngine {
    config: AnalysisConfig,
    detection: DetectionEngine,
    appeals: AppealsAnalyzer,
    worker_threads: usize,
}

impl AnalysisEngine {
    /// Validate `config` and apply process-level overrides from `env`.
    pub fn new(mut config: AnalysisConfig, env: &Config) -> Result<Self> {
        if let Some(cost) = env.cost_per_appeal {
            info!(cost, "cost_per_appeal overridden from environment");
            config.appeals.cost_per_appeal = cost;
        }

        for warning in validate_analysis_config(&config).into_result()? {
            warn!(path = %warning.path, "{}", warning.message);
        }

        let appeals = AppealsAnalyzer::new(config.appeals.clone())?;
        Ok(Self {
            config,
            detection: DetectionEngine::with_default_rules(),
            appeals,
            worker_threads: env.worker_threads,
        })
    }

    /// Load and validate the documents under `env.config_dir`.
    pub fn from_env(env: &Config) -> Result<Self> {
        env.log_summary();
        let config = ConfigLoader::new(env.config_dir.clone()).load_strict()?;
        Self::new(config, env)
    }

    /// Read `.env` and the `CLAIMSCOPE_*` variables, then load from the
    /// configured directory.
    pub fn from_process_env() -> Result<Self> {
        load_dotenv();
        Self::from_env(&Config::from_env())
    }

    /// Replace the built-in rule list.
    pub fn with_detection(mut self, detection: DetectionEngine) -> Self {
        self.detection = detection;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run every stage against one feature table and claims slice.
    ///
    /// With `worker_threads > 0` the run executes on a dedicated pool;
    /// otherwise on rayon's global pool.
    pub fn run(&self, features: &FeatureTable, claims: &[Claim]) -> Result<AnalysisBundle> {
        if self.worker_threads == 0 {
            return self.run_inner(features, claims);
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.worker_threads)
            .build()
            .map_err(|e| AnalysisError::ThreadPool(e.to_string()))?;
        pool.install(|| self.run_inner(features, claims))
    }

    fn run_inner(&self, features: &FeatureTable, claims: &[Claim]) -> Result<AnalysisBundle> {
        let start = Instant::now();
        info!(
            records = features.len(),
            claims = claims.len(),
            rules = self.detection.len(),
            policy_events = self.config.policy_events.len(),
            "analysis run starting"
        );

        let (detection, (policy, (appeals, benchmarks))) = rayon::join(
            || self.detection.evaluate(features, &self.config.detection),
            || {
                rayon::join(
                    || PolicyImpactAnalyzer::new().analyze_all(&self.config.policy_events, claims),
                    || {
                        rayon::join(
                            || self.appeals.analyze(claims),
                            || {
                                BenchmarkComparator::new()
                                    .compare(&internal_metrics(claims), &self.config.benchmarks)
                            },
                        )
                    },
                )
            },
        );

        let parts = RunParts {
            detection,
            policy,
            policy_kpis: policy_kpis(&self.config.policy_events, claims),
            appeals,
            benchmarks,
        };
        let bundle = ResultAssembler::new(features, &self.config.policy_events, claims.len())
            .assemble(parts)?;

        info!(
            run_id = %bundle.run_metadata.run_id,
            flags = bundle.flags.len(),
            warnings = bundle.warnings.len(),
            "analysis run complete in {:.3}s",
            start.elapsed().as_secs_f64()
        );
        Ok(bundle)
    }
}
