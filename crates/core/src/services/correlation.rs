//! Function -> event correlation: source scan first, name inference to fill gaps.

use tracing::debug;

use crate::model::EmissionMap;
use crate::naming::to_storage_table_name;
use crate::services::inference::{infer_emissions, SimilarityConfig};
use crate::services::source_scan::parse_emissions;

/// Correlate with the default similarity thresholds.
pub fn correlate(
    source: &str,
    mutating_function_names: &[String],
    event_names: &[String],
) -> EmissionMap {
    correlate_with(source, mutating_function_names, event_names, &SimilarityConfig::default())
}

/// Build the emission map for the mutating functions of a contract.
///
/// Inference seeds the map; any mutating function the source scan resolved to
/// at least one event is replaced by the scanned list. Keys are always a
/// subset of `mutating_function_names`. A function missing from the result is
/// unknown.
pub fn correlate_with(
    source: &str,
    mutating_function_names: &[String],
    event_names: &[String],
    config: &SimilarityConfig,
) -> EmissionMap {
    debug!(functions = ?mutating_function_names, events = ?event_names, "correlating functions to events");

    let parsed = parse_emissions(source);
    debug!(parsed = ?parsed, "source scan result");

    let inferred = infer_emissions(mutating_function_names, event_names, config);
    debug!(inferred = ?inferred, "name inference result");

    let mut merged = inferred;
    for name in mutating_function_names {
        if let Some(events) = parsed.get(name) {
            if !events.is_empty() {
                merged.set(name.clone(), events.to_vec());
            }
        }
    }

    for name in mutating_function_names {
        match merged.get(name) {
            Some(events) => {
                let tables: Vec<String> = events.iter().map(|e| to_storage_table_name(e)).collect();
                debug!(function = %name, ?events, ?tables, "mapped");
            }
            None => debug!(function = %name, "no emitted events detected"),
        }
    }

    merged
}
