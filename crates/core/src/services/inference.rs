//! Name-similarity inference of function -> event emission.
//!
//! Used when the source scan cannot tell which events a function emits. The
//! rules are deliberately loose; callers treat the result as a hint.

use serde::{Deserialize, Serialize};

use crate::model::EmissionMap;

/// Leading verbs recognized in function names, checked in this order.
pub const COMMON_VERBS: &[&str] = &[
    "increment",
    "decrement",
    "set",
    "get",
    "add",
    "remove",
    "update",
    "delete",
    "create",
    "mint",
    "burn",
    "transfer",
    "approve",
    "withdraw",
    "deposit",
    "ret",
    "return",
    "fetch",
    "retrieve",
    "call",
    "execute",
    "send",
    "receive",
    "claim",
    "stake",
    "unstake",
    "swap",
    "buy",
    "sell",
    "pay",
    "refund",
];

/// Tunable thresholds for the similarity rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimilarityConfig {
    /// Shortest event stem allowed to match as a substring of a function stem.
    pub min_contained_stem_len: usize,
    /// Both stems must be at most this long for the character-overlap rule.
    pub max_short_stem_len: usize,
    /// Required share of function-stem characters found in the event stem.
    pub min_char_overlap: f64,
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self { min_contained_stem_len: 3, max_short_stem_len: 5, min_char_overlap: 0.6 }
    }
}

/// Lowercased function name reduced to its leading verb when it has one:
/// `incrementMe` -> `increment`, `retFunc` -> `ret`, `foo` -> `foo`.
pub fn function_stem(function_name: &str) -> String {
    let lower = function_name.to_lowercase();
    match COMMON_VERBS.iter().find(|verb| lower.starts_with(*verb)) {
        Some(verb) => verb.to_string(),
        None => lower,
    }
}

/// Lowercased event name without a past-tense suffix:
/// `Incremented` -> `increment`, `Approved` -> `approv`, `Paid` -> `pai`.
pub fn event_stem(event_name: &str) -> String {
    let lower = event_name.to_lowercase();
    if let Some(stripped) = lower.strip_suffix("ed") {
        stripped.to_string()
    } else if let Some(stripped) = lower.strip_suffix('d') {
        stripped.to_string()
    } else {
        lower
    }
}

/// Share of `func_stem`'s characters (with repeats) that occur anywhere in
/// `event_stem`, over the longer stem's length.
fn char_overlap(func_stem: &str, event_stem: &str) -> f64 {
    let longest = func_stem.chars().count().max(event_stem.chars().count());
    if longest == 0 {
        return 0.0;
    }
    let common = func_stem.chars().filter(|c| event_stem.contains(*c)).count();
    common as f64 / longest as f64
}

/// Whether `event_name` looks like something `function_name` would emit.
pub fn is_candidate(function_name: &str, event_name: &str, config: &SimilarityConfig) -> bool {
    let func_stem = function_stem(function_name);
    let event_lower = event_name.to_lowercase();
    let ev_stem = event_stem(event_name);

    if func_stem == ev_stem {
        return true;
    }
    if event_lower.contains(&func_stem) {
        return true;
    }
    if func_stem.contains(&ev_stem) && ev_stem.chars().count() >= config.min_contained_stem_len {
        return true;
    }
    let short = config.max_short_stem_len;
    if func_stem.chars().count() <= short && ev_stem.chars().count() <= short {
        return char_overlap(&func_stem, &ev_stem) >= config.min_char_overlap;
    }
    false
}

/// Candidate events for each function. Functions without a candidate are absent.
pub fn infer_emissions(
    function_names: &[String],
    event_names: &[String],
    config: &SimilarityConfig,
) -> EmissionMap {
    let mut map = EmissionMap::new();
    for function in function_names {
        let matched: Vec<String> = event_names
            .iter()
            .filter(|event| is_candidate(function, event, config))
            .cloned()
            .collect();
        if !matched.is_empty() {
            map.set(function.clone(), matched);
        }
    }
    map
}
