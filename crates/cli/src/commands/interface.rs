use std::path::Path;

use anyhow::{anyhow, Context, Result};
use lens_core::analysis::{categorize, Diagnostic};
use lens_core::dataset::{extract_contract_name, DatasetId, DEFAULT_NAMESPACE};
use lens_core::model::{Emission, GeneratedQuery};
use lens_core::naming::to_storage_table_name;
use lens_core::services::{
    correlate_with, generate_analytical_queries_with, generate_exploration_queries_with,
};
use serde::Serialize;

use crate::commands::{
    parse_address, project_config_for, read_interface, read_source, write_queries_file,
};

#[derive(Serialize)]
pub struct CorrelationEntry {
    pub function: String,
    /// `None` when nothing is known about the function's events.
    pub events: Option<Vec<String>>,
    pub tables: Vec<String>,
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        match diagnostic {
            Diagnostic::UnrecognizedMutability { function, value } => {
                println!("  ! {function}: unrecognized state mutability '{value}' (skipped)")
            }
        }
    }
}

/// Split an ABI into read functions, write functions, and events.
pub fn categorize_command(abi: &str, json: bool) -> Result<()> {
    let (_body, interface) = read_interface(abi)?;
    let categorized = categorize(&interface);

    if json {
        println!("{}", serde_json::to_string_pretty(&categorized)?);
        return Ok(());
    }

    println!("Read functions ({}):", categorized.read_functions.len());
    for f in &categorized.read_functions {
        println!("  - {} [{}]", f.name, f.mutability());
    }
    println!("Write functions ({}):", categorized.write_functions.len());
    for f in &categorized.write_functions {
        println!("  - {} [{}]", f.name, f.mutability());
    }
    println!("Events ({}):", categorized.events.len());
    for e in &categorized.events {
        println!("  - {} -> {}", e.name, to_storage_table_name(&e.name));
    }
    if !categorized.diagnostics.is_empty() {
        println!("Diagnostics:");
        print_diagnostics(&categorized.diagnostics);
    }

    Ok(())
}

/// Work out which events each write function emits.
pub fn correlate_command(root: &str, abi: &str, source: &str, json: bool) -> Result<()> {
    let (_body, interface) = read_interface(abi)?;
    let source_text = read_source(source)?;
    let heuristics = project_config_for(root)?.map(|c| c.heuristics).unwrap_or_default();

    let categorized = categorize(&interface);
    let emissions = correlate_with(
        &source_text,
        &categorized.write_function_names(),
        &categorized.event_names(),
        &heuristics,
    );

    let entries: Vec<CorrelationEntry> = categorized
        .write_functions
        .iter()
        .map(|f| match emissions.lookup(&f.name) {
            Emission::Known(events) => CorrelationEntry {
                function: f.name.clone(),
                events: Some(events.to_vec()),
                tables: events.iter().map(|e| to_storage_table_name(e)).collect(),
            },
            Emission::Unknown => {
                CorrelationEntry { function: f.name.clone(), events: None, tables: Vec::new() }
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    println!("Emissions ({} write functions):", entries.len());
    for entry in &entries {
        match &entry.events {
            Some(events) => println!(
                "  - {} -> {} [{}]",
                entry.function,
                events.join(", "),
                entry.tables.join(", ")
            ),
            None => println!("  - {} -> unknown", entry.function),
        }
    }

    Ok(())
}

/// Generate SQL against the dataset indexing a contract's events.
pub fn queries_command(
    root: &str,
    abi: &str,
    dataset: &str,
    address: Option<&str>,
    explore: bool,
    out: Option<&str>,
    json: bool,
) -> Result<()> {
    let (_body, interface) = read_interface(abi)?;
    let address = address.map(parse_address).transpose()?;
    let limits = project_config_for(root)?.map(|c| c.query_limits).unwrap_or_default();

    let categorized = categorize(&interface);
    let queries: Vec<GeneratedQuery> = if explore {
        generate_exploration_queries_with(&categorized.events, dataset, address.as_ref(), &limits)
    } else {
        generate_analytical_queries_with(&categorized.events, dataset, address.as_ref(), &limits)
    };

    if let Some(out) = out {
        let out_path = Path::new(out);
        write_queries_file(out_path, &queries)?;
        println!("Wrote {} queries to {}", queries.len(), out_path.display());
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&queries)?);
        return Ok(());
    }

    if queries.is_empty() {
        println!("No events in ABI; nothing to query.");
        return Ok(());
    }
    for query in &queries {
        println!("-- {}: {}", query.name, query.description);
        println!("{};", query.query_text);
        println!();
    }

    Ok(())
}

/// Print the dataset id a freshly deployed contract would be indexed under.
pub fn dataset_name_command(
    source: &str,
    namespace: Option<&str>,
    timestamp_ms: Option<i64>,
) -> Result<()> {
    let source_text = read_source(source)?;
    let contract = extract_contract_name(&source_text)
        .ok_or_else(|| anyhow!("No contract definition found in {source}"))
        .context("Failed to derive dataset name")?;
    let namespace = namespace.unwrap_or(DEFAULT_NAMESPACE);
    let id = match timestamp_ms {
        Some(ts) => DatasetId::for_contract(namespace, &contract, ts),
        None => DatasetId::for_contract_now(namespace, &contract),
    };
    println!("{id}");
    Ok(())
}
