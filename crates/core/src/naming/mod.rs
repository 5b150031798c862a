//! Identifier conversion between ABI naming (camel/Pascal case) and the
//! indexing engine's storage naming (snake_case).
//!
//! Table names never gain a leading underscore from a leading capital;
//! column names do. The two rules differ on purpose to match what the
//! indexer produces for events versus parameters.

use crate::model::Parameter;

/// Storage table name for an event, e.g. `ValueReturned` -> `value_returned`.
pub fn to_storage_table_name(event_name: &str) -> String {
    snake_case(event_name, false)
}

/// Storage column name for a parameter, e.g. `newValue` -> `new_value`.
///
/// A leading capital keeps its underscore: `Value` -> `_value`.
pub fn to_storage_column_name(param_name: &str) -> String {
    snake_case(param_name, true)
}

/// Storage column for a parameter at `index`, using `param{index}` when the
/// parameter is anonymous.
pub fn storage_column_for(param: &Parameter, index: usize) -> String {
    to_storage_column_name(&param.display_name(index))
}

fn snake_case(input: &str, underscore_leading_capital: bool) -> String {
    let mut out = String::with_capacity(input.len() + 4);
    for (i, ch) in input.chars().enumerate() {
        if ch.is_uppercase() && (i > 0 || underscore_leading_capital) {
            out.push('_');
        }
        out.extend(ch.to_lowercase());
    }
    out
}
