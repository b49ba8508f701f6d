//! Core [`ConfigLoader`] struct: filesystem-backed config document loading.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::analysis::AnalysisConfig;
use crate::schema::{ConfigDocument, ConfigEnvelope};
use crate::validation::validate_document;

use super::error::{ConfigError, LoadResult, LoadStatus, Result};

/// Filesystem-backed config loader.
///
/// Scans a directory (recursively) for `*.yml` / `*.yaml` files, deserializes
/// them into [`ConfigDocument`] instances via two-pass deserialization, runs
/// the per-document checks, and keeps the documents that pass keyed by
/// `metadata.id` so merge order is deterministic.
pub struct ConfigLoader {
    /// Root directory containing config YAML files.
    config_dir: PathBuf,
    /// All loaded documents keyed by `metadata.id`.
    documents: BTreeMap<String, ConfigDocument>,
}

impl ConfigLoader {
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            config_dir,
            documents: BTreeMap::new(),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn documents(&self) -> &BTreeMap<String, ConfigDocument> {
        &self.documents
    }

    /// Recursively scan the config directory and load all YAML files.
    ///
    /// Dotfiles and non-YAML files are skipped. Parse errors are reported
    /// per file but do not abort the scan.
    pub fn load_all(&mut self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let root = self.config_dir.clone();
        self.scan_dir_recursive(&root, &mut results)?;
        Ok(results)
    }

    /// Load every file and fail on the first file that did not parse.
    ///
    /// Used before a run: a malformed policy file must not silently drop
    /// its event from the analysis.
    pub fn load_strict(&mut self) -> Result<AnalysisConfig> {
        let results = self.load_all()?;
        for result in &results {
            if let Some(reason) = result.status.failure() {
                return Err(ConfigError::Validation(format!(
                    "{}: {}",
                    result.path.display(),
                    reason
                )));
            }
        }
        self.analysis_config()
    }

    /// Merge the loaded documents into an [`AnalysisConfig`].
    pub fn analysis_config(&self) -> Result<AnalysisConfig> {
        AnalysisConfig::from_documents(self.documents.values())
    }

    fn scan_dir_recursive(&mut self, dir: &Path, results: &mut Vec<LoadResult>) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read config directory");
                return Ok(());
            }
        };

        // Sorted so duplicate-id resolution does not depend on readdir order.
        let mut paths = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                self.scan_dir_recursive(&path, results)?;
                continue;
            }

            let is_yaml = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| e == "yml" || e == "yaml")
                .unwrap_or(false);

            if !is_yaml {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML file".to_string(),
                    },
                });
                continue;
            }

            let status = match self.load_file(&path) {
                Ok(doc) => {
                    let id = doc.metadata().id.clone();
                    let checks = validate_document(&doc);
                    for w in &checks.warnings {
                        warn!(id = %id, path = %path.display(), field = %w.path, "{}", w.message);
                    }
                    if !checks.is_valid() {
                        let error = checks
                            .errors
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join("; ");
                        warn!(id = %id, path = %path.display(), error = %error, "config document failed validation");
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Failed { error },
                        });
                        continue;
                    }
                    if self.documents.contains_key(&id) {
                        warn!(id = %id, path = %path.display(), "duplicate config document id");
                        LoadStatus::Failed {
                            error: format!("duplicate document id '{}'", id),
                        }
                    } else {
                        let kind = doc.kind();
                        info!(id = %id, kind = %kind, path = %path.display(), "loaded config document");
                        self.documents.insert(id.clone(), doc);
                        LoadStatus::Loaded { id, kind }
                    }
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load config file");
                    LoadStatus::Failed {
                        error: e.to_string(),
                    }
                }
            };
            results.push(LoadResult { path, status });
        }

        Ok(())
    }

    /// Parse a single YAML file into a [`ConfigDocument`].
    pub fn load_file(&self, path: &Path) -> Result<ConfigDocument> {
        let contents = fs::read_to_string(path)?;
        parse_document(&contents)
    }
}

/// Parse YAML text into a [`ConfigDocument`] via two-pass deserialization.
///
/// First pass: deserialize as [`ConfigEnvelope`] to read the `kind` field.
/// Second pass: reconstruct and deserialize into the kind-specific type.
pub fn parse_document(contents: &str) -> Result<ConfigDocument> {
    let envelope: ConfigEnvelope = serde_yaml::from_str(contents)?;

    if envelope.metadata.id.is_empty() {
        return Err(ConfigError::Validation(
            "metadata.id must not be empty".to_string(),
        ));
    }

    envelope.parse_full().map_err(|e| {
        ConfigError::Validation(format!(
            "failed to parse document '{}': {}",
            envelope.metadata.id, e
        ))
    })
}
