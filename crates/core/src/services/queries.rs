//! SQL generation against the indexed event tables of a dataset.
//!
//! Tables are addressed as `"<dataset>".<table>`, with table and column names
//! derived by [`crate::naming`]. Every query carries a row cap from
//! [`QueryLimits`]. Nothing here executes SQL.

use serde::{Deserialize, Serialize};

use crate::model::{Address, ChartKind, Event, GeneratedQuery};
use crate::naming::{storage_column_for, to_storage_table_name};

/// Row caps applied to generated queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryLimits {
    /// Time-series and count-over-time queries.
    pub series_rows: usize,
    /// "Recent events" queries.
    pub recent_rows: usize,
    /// Group-by-first-column queries.
    pub grouped_rows: usize,
    /// Event timeline query.
    pub timeline_rows: usize,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self { series_rows: 50, recent_rows: 10, grouped_rows: 10, timeline_rows: 20 }
    }
}

/// `WHERE` clause restricting rows to one contract, or an empty string.
///
/// Addresses are stored as 20 raw bytes, so the filter decodes lowercase hex.
pub fn address_filter(address: Option<&Address>) -> String {
    match address {
        Some(addr) => format!("WHERE address = decode('{}', 'hex')", addr.to_query_hex()),
        None => String::new(),
    }
}

fn table_ref(dataset: &str, event: &Event) -> String {
    format!("\"{}\".{}", dataset.replace('"', "\"\""), to_storage_table_name(&event.name))
}

fn compose(clauses: &[&str], sep: &str) -> String {
    clauses.iter().filter(|c| !c.is_empty()).copied().collect::<Vec<_>>().join(sep)
}

fn counts_by_type(events: &[Event], dataset: &str, filter: &str, sep: &str) -> GeneratedQuery {
    let query_text = events
        .iter()
        .map(|event| {
            let select = format!("SELECT '{}' as event_type, COUNT(*) as count", event.name);
            let from = format!("FROM {}", table_ref(dataset, event));
            compose(&[&select, &from, filter], sep)
        })
        .collect::<Vec<_>>()
        .join("\nUNION ALL\n");

    GeneratedQuery {
        name: "Event counts by type".to_string(),
        description: "Compare how often each event type was emitted".to_string(),
        query_text,
        charts: vec![ChartKind::Bar, ChartKind::Pie],
    }
}

/// Chart-oriented queries with default row caps.
pub fn generate_analytical_queries(
    events: &[Event],
    dataset: &str,
    contract_address: Option<&Address>,
) -> Vec<GeneratedQuery> {
    generate_analytical_queries_with(events, dataset, contract_address, &QueryLimits::default())
}

/// One time-series query per event (plotting its first integer parameter, or
/// counting rows per block when it has none), then a single counts-by-type
/// comparison when there are two or more events.
pub fn generate_analytical_queries_with(
    events: &[Event],
    dataset: &str,
    contract_address: Option<&Address>,
    limits: &QueryLimits,
) -> Vec<GeneratedQuery> {
    let filter = address_filter(contract_address);
    let limit = format!("LIMIT {}", limits.series_rows);
    let mut queries = Vec::with_capacity(events.len() + 1);

    for event in events {
        let from = format!("FROM {}", table_ref(dataset, event));
        let query = match event.first_numeric_input() {
            Some((index, param)) => {
                let column = storage_column_for(param, index);
                GeneratedQuery {
                    name: format!("{} over time", event.name),
                    description: format!("{} values of {} by block", column, event.name),
                    query_text: compose(
                        &[
                            &format!("SELECT block_num, {column}"),
                            &from,
                            &filter,
                            "ORDER BY block_num ASC",
                            &limit,
                        ],
                        " ",
                    ),
                    charts: vec![ChartKind::Line],
                }
            }
            None => GeneratedQuery {
                name: format!("{} count over time", event.name),
                description: format!("{} events per block", event.name),
                query_text: compose(
                    &[
                        "SELECT block_num, COUNT(*) as event_count",
                        &from,
                        &filter,
                        "GROUP BY block_num",
                        "ORDER BY block_num ASC",
                        &limit,
                    ],
                    " ",
                ),
                charts: vec![ChartKind::Line],
            },
        };
        queries.push(query);
    }

    if events.len() >= 2 {
        queries.push(counts_by_type(events, dataset, &filter, " "));
    }

    queries
}

/// Exploration queries for a SQL editor with default row caps.
pub fn generate_exploration_queries(
    events: &[Event],
    dataset: &str,
    contract_address: Option<&Address>,
) -> Vec<GeneratedQuery> {
    generate_exploration_queries_with(events, dataset, contract_address, &QueryLimits::default())
}

/// Per event: the most recent rows and, when it has parameters, a breakdown by
/// the first one. Then a counts-by-type comparison (two or more events) and a
/// timeline of the first event.
pub fn generate_exploration_queries_with(
    events: &[Event],
    dataset: &str,
    contract_address: Option<&Address>,
    limits: &QueryLimits,
) -> Vec<GeneratedQuery> {
    let Some(first) = events.first() else {
        return Vec::new();
    };
    let filter = address_filter(contract_address);
    let mut queries = Vec::new();

    for event in events {
        let from = format!("FROM {}", table_ref(dataset, event));
        let columns: Vec<String> =
            event.inputs.iter().enumerate().map(|(i, p)| storage_column_for(p, i)).collect();
        let mut selected = vec!["block_num".to_string(), "timestamp".to_string()];
        selected.extend(columns.iter().cloned());

        queries.push(GeneratedQuery {
            name: format!("Recent {} events", event.name),
            description: format!("The most recent {} events from the contract", event.name),
            query_text: compose(
                &[
                    &format!("SELECT {}", selected.join(", ")),
                    &from,
                    &filter,
                    "ORDER BY block_num DESC",
                    &format!("LIMIT {}", limits.recent_rows),
                ],
                "\n",
            ),
            charts: Vec::new(),
        });

        if let Some(column) = columns.first() {
            queries.push(GeneratedQuery {
                name: format!("{} by {}", event.name, column),
                description: format!("Group {} events by {}", event.name, column),
                query_text: compose(
                    &[
                        &format!("SELECT {column}, COUNT(*) as count"),
                        &from,
                        &filter,
                        &format!("GROUP BY {column}"),
                        "ORDER BY count DESC",
                        &format!("LIMIT {}", limits.grouped_rows),
                    ],
                    "\n",
                ),
                charts: vec![ChartKind::Bar],
            });
        }
    }

    if events.len() >= 2 {
        queries.push(counts_by_type(events, dataset, &filter, "\n"));
    }

    queries.push(GeneratedQuery {
        name: "Event timeline".to_string(),
        description: format!("{} events over time with timestamps", first.name),
        query_text: compose(
            &[
                "SELECT block_num, timestamp, COUNT(*) as event_count",
                &format!("FROM {}", table_ref(dataset, first)),
                &filter,
                "GROUP BY block_num, timestamp",
                "ORDER BY block_num DESC",
                &format!("LIMIT {}", limits.timeline_rows),
            ],
            "\n",
        ),
        charts: vec![ChartKind::Line],
    });

    queries
}
