use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};

use crate::db::{
    emission_cache_key, open_project_db, DeploymentRecord, ProjectConfig, ProjectDb, ProjectLayout,
};
use crate::model::Address;
use crate::services::ReportConfig;

/// An opened project: where it lives, how it is tuned, and its deployment cache.
#[derive(Debug)]
pub struct ProjectContext {
    pub layout: ProjectLayout,
    pub config: ProjectConfig,
    pub db_path: PathBuf,
    pub db: ProjectDb,
}

impl ProjectContext {
    /// Load project config and open the database for a given root.
    pub fn from_root(root: impl AsRef<Path>) -> Result<Self> {
        let layout = ProjectLayout::new(root);
        let (config, db_path, db) = open_project_db(&layout)?;
        Ok(Self { layout, config, db_path, db })
    }

    pub fn report_config(&self) -> ReportConfig {
        self.config.report_config()
    }

    /// Emission cache key for `source` and `abi_json` under this project's heuristics.
    pub fn emission_cache_key(&self, source: &str, abi_json: &str) -> String {
        emission_cache_key(source, abi_json, &self.config.heuristics)
    }

    /// The recorded deployment at `address` with its row id.
    pub fn deployment(&self, address: &Address) -> Result<(i64, DeploymentRecord)> {
        self.db
            .find_deployment(address)
            .context("Failed to look up deployment")?
            .ok_or_else(|| anyhow!("No deployment recorded at {address}"))
    }

    /// Where the exported report for `address` lives.
    pub fn report_path(&self, address: &Address) -> PathBuf {
        self.layout.report_path(&address.to_string())
    }
}
