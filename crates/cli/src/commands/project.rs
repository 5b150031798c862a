use std::fs;

use anyhow::{Context, Result};
use lens_core::db::{open_project_db, ProjectConfig, ProjectDb, ProjectLayout};
use serde::Serialize;

use crate::commands::print_dir_status;
use crate::{canonicalize_or_current, infer_project_name};

#[derive(Serialize)]
pub struct ProjectInfoSnapshot {
    pub name: String,
    pub root: String,
    pub config_file: String,
    pub config_version: String,
    pub db_path: String,
    pub default_namespace: String,
    pub heuristics: lens_core::services::SimilarityConfig,
    pub query_limits: lens_core::services::QueryLimits,
    pub reports_dir: String,
    pub deployments: usize,
}

/// Initialize a new project at `root`.
pub fn init_project_command(
    root: &str,
    name: Option<String>,
    namespace: Option<String>,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    let project_name = match name {
        Some(n) => n,
        None => infer_project_name(&root_path),
    };

    fs::create_dir_all(&layout.meta_dir)
        .with_context(|| format!("Failed to create meta dir: {}", layout.meta_dir.display()))?;
    fs::create_dir_all(&layout.reports_dir).with_context(|| {
        format!("Failed to create reports dir: {}", layout.reports_dir.display())
    })?;

    let mut config = ProjectConfig::new(&project_name, layout.db_path_relative_string());
    if let Some(ns) = namespace {
        config.default_namespace = ns;
    }

    let json = serde_json::to_string_pretty(&config)?;
    fs::write(&layout.project_config_path, json).with_context(|| {
        format!("Failed to write project config: {}", layout.project_config_path.display())
    })?;

    // Create the project database immediately so follow-on commands can rely on it.
    ProjectDb::open(&layout.db_path).with_context(|| {
        format!("Failed to initialize project database at {}", layout.db_path.display())
    })?;

    println!("Initialized abi-lens project:");
    println!("  Name: {}", project_name);
    println!("  Root: {}", layout.root.display());
    println!("  Config: {}", layout.project_config_path.display());
    println!("  DB path (relative): {}", config.db.path);
    println!("  Dataset namespace: {}", config.default_namespace);
    println!("  Reports dir: {}", layout.reports_dir.display());

    Ok(())
}

/// Show basic information about an existing project.
pub fn project_info_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let layout = ProjectLayout::new(&root_path);

    let (config, _db_path, db) = open_project_db(&layout)?;
    let deployments = db.list_deployments().context("Failed to list deployments")?;

    if json {
        let snapshot = ProjectInfoSnapshot {
            name: config.name.clone(),
            root: layout.root.display().to_string(),
            config_file: layout.project_config_path.display().to_string(),
            config_version: config.config_version.clone(),
            db_path: config.db.path.clone(),
            default_namespace: config.default_namespace.clone(),
            heuristics: config.heuristics.clone(),
            query_limits: config.query_limits.clone(),
            reports_dir: layout.reports_dir.display().to_string(),
            deployments: deployments.len(),
        };
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!("abi-lens Project Info");
    println!("=====================");
    println!("Name: {}", config.name);
    println!("Root: {}", layout.root.display());
    println!("Config file: {}", layout.project_config_path.display());
    println!("Config version: {}", config.config_version);
    println!("DB path (config): {}", config.db.path);
    println!("Dataset namespace: {}", config.default_namespace);
    println!();

    println!("Directories:");
    print_dir_status("Meta dir (.lens)", &layout.meta_dir);
    print_dir_status("Reports dir", &layout.reports_dir);
    println!();
    println!("Deployments: {}", deployments.len());
    for d in &deployments {
        println!("- {} at {}", d.contract_name, d.address);
    }

    Ok(())
}
