//! One-shot pipeline over a deployed contract: categorize, correlate, and
//! synthesize queries, bundled for display or caching.

use serde::{Deserialize, Serialize};

use crate::analysis::{categorize, CategorizedInterface};
use crate::model::{Address, Emission, EmissionMap, GeneratedQuery, Interface};
use crate::naming::to_storage_table_name;
use crate::services::correlation::correlate_with;
use crate::services::inference::SimilarityConfig;
use crate::services::queries::{generate_analytical_queries_with, QueryLimits};

/// Tuning knobs for a report; usually taken from the project config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub heuristics: SimilarityConfig,
    pub limits: QueryLimits,
}

/// What the report knows about one write function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EmissionStatus {
    Known { events: Vec<String>, tables: Vec<String> },
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionEmission {
    pub function: String,
    #[serde(flatten)]
    pub status: EmissionStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractReport {
    pub contract_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<String>,
    pub interface: CategorizedInterface,
    pub emissions: EmissionMap,
    pub functions: Vec<FunctionEmission>,
    /// Empty when no dataset is known.
    pub queries: Vec<GeneratedQuery>,
}

impl ContractReport {
    /// Run the full pipeline.
    pub fn build(
        contract_name: &str,
        source: &str,
        interface: &Interface,
        dataset: Option<&str>,
        address: Option<&Address>,
        config: &ReportConfig,
    ) -> Self {
        let categorized = categorize(interface);
        let emissions = correlate_with(
            source,
            &categorized.write_function_names(),
            &categorized.event_names(),
            &config.heuristics,
        );
        Self::assemble(contract_name, categorized, emissions, dataset, address, config)
    }

    /// Build from an emission map computed earlier (e.g. loaded from cache).
    pub fn assemble(
        contract_name: &str,
        categorized: CategorizedInterface,
        emissions: EmissionMap,
        dataset: Option<&str>,
        address: Option<&Address>,
        config: &ReportConfig,
    ) -> Self {
        let functions = categorized
            .write_functions
            .iter()
            .map(|f| FunctionEmission {
                function: f.name.clone(),
                status: match emissions.lookup(&f.name) {
                    Emission::Known(events) => EmissionStatus::Known {
                        events: events.to_vec(),
                        tables: events.iter().map(|e| to_storage_table_name(e)).collect(),
                    },
                    Emission::Unknown => EmissionStatus::Unknown,
                },
            })
            .collect();

        let queries = match dataset {
            Some(ds) => {
                generate_analytical_queries_with(&categorized.events, ds, address, &config.limits)
            }
            None => Vec::new(),
        };

        Self {
            contract_name: contract_name.to_string(),
            address: address.copied(),
            dataset: dataset.map(str::to_string),
            interface: categorized,
            emissions,
            functions,
            queries,
        }
    }

    /// Write functions with no detected event.
    pub fn unknown_functions(&self) -> Vec<&str> {
        self.functions
            .iter()
            .filter(|f| f.status == EmissionStatus::Unknown)
            .map(|f| f.function.as_str())
            .collect()
    }
}
