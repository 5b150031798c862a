//! Interface categorization: split an ABI into read functions, write
//! functions, and events.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::model::{AbiItem, Event, Function, Interface, Mutability};

/// Problems noticed while categorizing. These never change the buckets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// The function was left out of both buckets.
    UnrecognizedMutability { function: String, value: String },
}

/// Result of categorizing an interface. Each bucket keeps declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedInterface {
    pub read_functions: Vec<Function>,
    pub write_functions: Vec<Function>,
    pub events: Vec<Event>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl CategorizedInterface {
    pub fn write_function_names(&self) -> Vec<String> {
        self.write_functions.iter().map(|f| f.name.clone()).collect()
    }

    pub fn read_function_names(&self) -> Vec<String> {
        self.read_functions.iter().map(|f| f.name.clone()).collect()
    }

    pub fn event_names(&self) -> Vec<String> {
        self.events.iter().map(|e| e.name.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.read_functions.is_empty() && self.write_functions.is_empty() && self.events.is_empty()
    }
}

/// Partition `interface` by function mutability and collect its events.
pub fn categorize(interface: &Interface) -> CategorizedInterface {
    let mut out = CategorizedInterface::default();

    for item in &interface.items {
        match item {
            AbiItem::Function(function) => match function.mutability() {
                Mutability::Pure | Mutability::View => out.read_functions.push(function.clone()),
                Mutability::Nonpayable | Mutability::Payable => {
                    out.write_functions.push(function.clone())
                }
                Mutability::Unrecognized(value) => {
                    warn!(function = %function.name, mutability = %value, "unrecognized state mutability; skipping function");
                    out.diagnostics.push(Diagnostic::UnrecognizedMutability {
                        function: function.name.clone(),
                        value,
                    });
                }
            },
            AbiItem::Event(event) => out.events.push(event.clone()),
            AbiItem::Other => {}
        }
    }

    out
}
