use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use lens_core::db::{load_project_config_if_present, ProjectConfig, ProjectLayout};
use lens_core::model::{Address, GeneratedQuery, Interface};

use crate::canonicalize_or_current;

/// Read and parse an ABI file (bare array or compiler artifact).
pub fn read_interface(path: &str) -> Result<(String, Interface)> {
    let body =
        fs::read_to_string(path).with_context(|| format!("Failed to read ABI file {path}"))?;
    let interface = Interface::from_json_str(&body)
        .with_context(|| format!("Failed to parse ABI file {path}"))?;
    Ok((body, interface))
}

pub fn read_source(path: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read source file {path}"))
}

pub fn parse_address(input: &str) -> Result<Address> {
    Address::parse(input).with_context(|| format!("Invalid contract address '{input}'"))
}

/// The project config under `root` when it is a project, else `None`.
pub fn project_config_for(root: &str) -> Result<Option<ProjectConfig>> {
    let root_path = canonicalize_or_current(root)?;
    load_project_config_if_present(&ProjectLayout::new(&root_path))
}

/// Write a query menu as JSON or YAML, chosen by the file extension.
pub fn write_queries_file(path: &Path, queries: &[GeneratedQuery]) -> Result<()> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
    let body = match ext {
        "json" => serde_json::to_string_pretty(queries).context("Failed to serialize queries")?,
        "yaml" | "yml" => {
            serde_yaml::to_string(queries).context("Failed to serialize queries to YAML")?
        }
        other => {
            return Err(anyhow!(
                "Unsupported output extension '{other}' for {} (expected .json, .yaml or .yml)",
                path.display()
            ))
        }
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, body).with_context(|| format!("Failed to write {}", path.display()))
}

/// Helper to print whether a directory exists.
pub fn print_dir_status(label: &str, path: &Path) {
    let exists = path.is_dir();
    println!("- {label}: {} ({})", if exists { "OK" } else { "MISSING" }, path.display());
}
