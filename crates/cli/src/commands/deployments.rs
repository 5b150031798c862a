use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use lens_core::analysis::categorize;
use lens_core::dataset::{extract_contract_name, DatasetId};
use lens_core::db::{DeploymentRecord, ProjectContext};
use lens_core::services::{correlate_with, ContractReport, EmissionStatus};
use tracing::{debug, info};

use crate::canonicalize_or_current;
use crate::commands::{parse_address, read_interface, read_source};

fn print_report(report: &ContractReport) {
    println!("Contract: {}", report.contract_name);
    if let Some(address) = &report.address {
        println!("  Address: {address}");
    }
    if let Some(dataset) = &report.dataset {
        println!("  Dataset: {dataset}");
    }
    println!(
        "  Reads: {}  Writes: {}  Events: {}",
        report.interface.read_functions.len(),
        report.interface.write_functions.len(),
        report.interface.events.len()
    );
    println!("  Emissions:");
    for f in &report.functions {
        match &f.status {
            EmissionStatus::Known { events, tables } => {
                println!("    - {} -> {} [{}]", f.function, events.join(", "), tables.join(", "))
            }
            EmissionStatus::Unknown => println!("    - {} -> unknown", f.function),
        }
    }
    if !report.queries.is_empty() {
        println!("  Queries:");
        for q in &report.queries {
            println!("    - {}", q.name);
        }
    }
}

/// Record a deployment, compute (or reuse) its emission map, and export its report.
#[allow(clippy::too_many_arguments)]
pub fn record_deployment_command(
    root: &str,
    abi: &str,
    source: &str,
    address: &str,
    tx: &str,
    name: Option<String>,
    dataset: Option<String>,
    json: bool,
) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;

    let (abi_json, interface) = read_interface(abi)?;
    let source_text = read_source(source)?;
    let address = parse_address(address)?;

    let contract_name = match name.or_else(|| extract_contract_name(&source_text)) {
        Some(n) => n,
        None => return Err(anyhow!("No contract definition found in {source}; pass --name")),
    };
    let dataset = match dataset {
        Some(d) => d
            .parse::<DatasetId>()
            .with_context(|| format!("Invalid dataset id '{d}'"))?
            .to_string(),
        None => DatasetId::for_contract_now(&ctx.config.default_namespace, &contract_name)
            .to_string(),
    };

    let cache_key = ctx.emission_cache_key(&source_text, &abi_json);
    let cached = ctx
        .db
        .cached_emission_map(&address, &cache_key)
        .context("Failed to read emission cache")?;

    let record = DeploymentRecord::new(&contract_name, address, tx, abi_json, &source_text)
        .with_dataset(Some(dataset.clone()));
    let id = ctx.db.insert_deployment(&record).context("Failed to insert deployment")?;

    let categorized = categorize(&interface);
    let config = ctx.report_config();
    let emissions = match cached {
        Some(map) => {
            debug!(%address, "reusing cached emission map");
            map
        }
        None => correlate_with(
            &source_text,
            &categorized.write_function_names(),
            &categorized.event_names(),
            &config.heuristics,
        ),
    };
    ctx.db.store_emission_map(id, &cache_key, &emissions).context("Failed to store emission map")?;

    let report = ContractReport::assemble(
        &contract_name,
        categorized,
        emissions,
        Some(&dataset),
        Some(&address),
        &config,
    );
    let report_path = ctx.report_path(&address);
    write_report(&report_path, &report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Recorded deployment #{id}");
    print_report(&report);
    println!("  Report: {}", report_path.display());
    Ok(())
}

fn write_report(path: &Path, report: &ContractReport) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    fs::write(path, body).with_context(|| format!("Failed to write report {}", path.display()))
}

/// List all deployments recorded in the project database.
pub fn list_deployments_command(root: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let deployments = ctx.db.list_deployments().context("Failed to list deployments")?;

    if json {
        let serialized = serde_json::to_string_pretty(&deployments)
            .context("Failed to serialize deployments to JSON")?;
        println!("{}", serialized);
        return Ok(());
    }

    println!("Deployments ({}):", deployments.len());
    if deployments.is_empty() {
        println!("  (none)");
        return Ok(());
    }
    for d in deployments {
        let dataset = d.dataset.as_deref().unwrap_or("-");
        println!(
            "  - {} at {} dataset={} tx={} ({})",
            d.contract_name, d.address, dataset, d.transaction_hash, d.created_at
        );
    }

    Ok(())
}

/// Show the full report for one recorded deployment.
pub fn show_deployment_command(root: &str, address: &str, json: bool) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let address = parse_address(address)?;

    let (id, record) = ctx.deployment(&address)?;
    let interface = record
        .interface()
        .with_context(|| format!("Stored ABI for {address} is not valid"))?;
    let emissions = ctx
        .db
        .load_emission_map(id)
        .context("Failed to load emission map")?
        .unwrap_or_default();

    let report = ContractReport::assemble(
        &record.contract_name,
        categorize(&interface),
        emissions,
        record.dataset.as_deref(),
        Some(&record.address),
        &ctx.report_config(),
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_report(&report);
    println!("  Transaction: {}", record.transaction_hash);
    println!("  Recorded at: {}", record.created_at);
    Ok(())
}

/// Forget one deployment and delete its exported report.
pub fn remove_deployment_command(root: &str, address: &str) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let address = parse_address(address)?;

    let removed = ctx.db.remove_deployment(&address).context("Failed to remove deployment")?;
    if !removed {
        return Err(anyhow!("No deployment recorded at {address}"));
    }

    let report_path = ctx.report_path(&address);
    if report_path.exists() {
        fs::remove_file(&report_path)
            .with_context(|| format!("Failed to delete report {}", report_path.display()))?;
    }

    info!(%address, "removed deployment");
    println!("Removed deployment at {address}");
    Ok(())
}

/// Forget every recorded deployment. Exported reports are left on disk.
pub fn clear_deployments_command(root: &str) -> Result<()> {
    let root_path = canonicalize_or_current(root)?;
    let ctx = ProjectContext::from_root(&root_path)?;
    let removed = ctx.db.clear_deployments().context("Failed to clear deployments")?;
    println!("Cleared {removed} deployment(s)");
    Ok(())
}
