use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::db::util::source_hash;
use crate::model::{Address, Interface, ModelError};

/// A contract deployment known to the project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub contract_name: String,
    pub address: Address,
    pub transaction_hash: String,
    /// Dataset the indexer materializes this contract's events into, if known.
    pub dataset: Option<String>,
    /// The ABI exactly as returned by the deployer.
    pub abi_json: String,
    /// SHA-256 of the source the contract was compiled from.
    pub source_hash: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
}

impl DeploymentRecord {
    /// Record a deployment made now from `source`.
    pub fn new(
        contract_name: impl Into<String>,
        address: Address,
        transaction_hash: impl Into<String>,
        abi_json: impl Into<String>,
        source: &str,
    ) -> Self {
        Self {
            contract_name: contract_name.into(),
            address,
            transaction_hash: transaction_hash.into(),
            dataset: None,
            abi_json: abi_json.into(),
            source_hash: source_hash(source),
            created_at: Utc::now().to_rfc3339(),
        }
    }

    pub fn with_dataset(mut self, dataset: Option<String>) -> Self {
        self.dataset = dataset;
        self
    }

    /// Parse the stored ABI.
    pub fn interface(&self) -> Result<Interface, ModelError> {
        Interface::from_json_str(&self.abi_json)
    }
}
