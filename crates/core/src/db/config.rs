use serde::{Deserialize, Serialize};

use crate::dataset::DEFAULT_NAMESPACE;
use crate::services::{QueryLimits, ReportConfig, SimilarityConfig};

/// Database location for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Path to the project database file (typically relative to project root).
    pub path: String,
}

impl DbConfig {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// Serializable configuration describing a project.
///
/// This lives at `.lens/project.json` in the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Human-friendly project name.
    pub name: String,
    /// Optional description / notes.
    pub description: Option<String>,
    /// Schema/config version. This is about the config format, not the crate version.
    pub config_version: String,
    /// Database configuration (path is typically relative to project root).
    pub db: DbConfig,
    /// Namespace used when deriving dataset ids for new deployments.
    #[serde(default = "default_namespace")]
    pub default_namespace: String,
    /// Thresholds for name-similarity inference.
    #[serde(default)]
    pub heuristics: SimilarityConfig,
    /// Row caps for generated queries.
    #[serde(default)]
    pub query_limits: QueryLimits,
}

impl ProjectConfig {
    /// Create a new project configuration using the given name and db path.
    pub fn new(name: impl Into<String>, db_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            config_version: "0.1.0".to_string(),
            db: DbConfig::new(db_path),
            default_namespace: default_namespace(),
            heuristics: SimilarityConfig::default(),
            query_limits: QueryLimits::default(),
        }
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig { heuristics: self.heuristics.clone(), limits: self.query_limits.clone() }
    }
}
