use std::path::PathBuf;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

use crate::db::{ProjectConfig, ProjectDb, ProjectLayout};
use crate::services::SimilarityConfig;

/// Load the project config JSON from disk for a given layout.
pub fn load_project_config(layout: &ProjectLayout) -> Result<ProjectConfig> {
    let config_json = std::fs::read_to_string(&layout.project_config_path).with_context(|| {
        format!("Failed to read project config at {}", layout.project_config_path.display())
    })?;
    let config: ProjectConfig =
        serde_json::from_str(&config_json).context("Failed to parse project config JSON")?;
    Ok(config)
}

/// Load the project config when `layout` is a project, otherwise `None`.
pub fn load_project_config_if_present(layout: &ProjectLayout) -> Result<Option<ProjectConfig>> {
    if layout.is_project() {
        load_project_config(layout).map(Some)
    } else {
        Ok(None)
    }
}

/// Resolve the DB path (respecting relative/absolute config) and open a ProjectDb.
pub fn open_project_db(layout: &ProjectLayout) -> Result<(ProjectConfig, PathBuf, ProjectDb)> {
    let config = load_project_config(layout)?;
    let config_db_path = std::path::Path::new(&config.db.path);
    let db_path = if config_db_path.is_absolute() {
        config_db_path.to_path_buf()
    } else {
        layout.root.join(config_db_path)
    };
    let db = ProjectDb::open(&db_path)
        .with_context(|| format!("Failed to open project database at {}", db_path.display()))?;
    Ok((config, db_path, db))
}

/// SHA-256 of contract source, hex encoded.
pub fn source_hash(source: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(source.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Key under which an emission map is cached.
///
/// Covers every input of correlation: the source, the ABI the function and
/// event names come from, and the similarity thresholds. Changing any of them
/// misses the cache.
pub fn emission_cache_key(source: &str, abi_json: &str, heuristics: &SimilarityConfig) -> String {
    let mut hasher = Sha256::new();
    for part in [source, abi_json] {
        hasher.update((part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    hasher.update(heuristics.min_contained_stem_len.to_le_bytes());
    hasher.update(heuristics.max_short_stem_len.to_le_bytes());
    hasher.update(heuristics.min_char_overlap.to_le_bytes());
    format!("{:x}", hasher.finalize())
}
