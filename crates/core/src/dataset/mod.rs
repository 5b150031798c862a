//! Dataset identifiers (`namespace/name@version`) and naming a dataset after
//! the contract found in source.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::services::source_scan::{tokenize, TokenKind};

/// Namespace used for freshly deployed contracts unless configured otherwise.
pub const DEFAULT_NAMESPACE: &str = "eth_global";

/// Version tag given to datasets of freshly deployed contracts.
pub const DEV_VERSION: &str = "dev";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DatasetError {
    #[error("Dataset id '{0}' must look like namespace/name@version")]
    Malformed(String),
    #[error("Dataset id '{0}' has an empty {1}")]
    EmptyComponent(String, &'static str),
}

/// A versioned dataset reference as understood by the query engine.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DatasetId {
    pub namespace: String,
    pub name: String,
    pub version: String,
}

impl DatasetId {
    /// `namespace/<lowercased contract>_<timestamp_ms>@dev`.
    pub fn for_contract(namespace: &str, contract_name: &str, timestamp_ms: i64) -> Self {
        Self {
            namespace: namespace.to_string(),
            name: format!("{}_{}", contract_name.to_lowercase(), timestamp_ms),
            version: DEV_VERSION.to_string(),
        }
    }

    pub fn for_contract_now(namespace: &str, contract_name: &str) -> Self {
        Self::for_contract(namespace, contract_name, Utc::now().timestamp_millis())
    }
}

impl FromStr for DatasetId {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, rest) =
            s.split_once('/').ok_or_else(|| DatasetError::Malformed(s.to_string()))?;
        let (name, version) =
            rest.rsplit_once('@').ok_or_else(|| DatasetError::Malformed(s.to_string()))?;
        for (value, label) in [(namespace, "namespace"), (name, "name"), (version, "version")] {
            if value.trim().is_empty() {
                return Err(DatasetError::EmptyComponent(s.to_string(), label));
            }
        }
        Ok(Self {
            namespace: namespace.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        })
    }
}

impl TryFrom<String> for DatasetId {
    type Error = DatasetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DatasetId> for String {
    fn from(value: DatasetId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.namespace, self.name, self.version)
    }
}

/// Name of the first `contract Name { ... }` (or `contract Name is Base { ... }`)
/// in `source`. Contract names must start with an uppercase letter.
pub fn extract_contract_name(source: &str) -> Option<String> {
    let tokens = tokenize(source);
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind != TokenKind::Ident("contract") {
            continue;
        }
        let Some(TokenKind::Ident(name)) = tokens.get(i + 1).map(|t| t.kind) else {
            continue;
        };
        if !name.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
            continue;
        }
        match tokens.get(i + 2).map(|t| t.kind) {
            Some(TokenKind::Punct('{')) => return Some(name.to_string()),
            Some(TokenKind::Ident("is"))
                if tokens[i + 3..].iter().any(|t| t.kind == TokenKind::Punct('{')) =>
            {
                return Some(name.to_string())
            }
            _ => continue,
        }
    }
    None
}
