//! lens-core
//!
//! Core library for mapping a smart contract's interface onto the event
//! tables an indexer materializes for it.
//!
//! Given a JSON ABI and the contract source, this crate splits the interface
//! into reads, writes, and events ([`analysis`]), works out which events each
//! write emits ([`services::correlate`]), and writes SQL against the indexed
//! dataset ([`services::generate_analytical_queries`]). Project persistence
//! lives in [`db`].
//!
//! All substantive logic stays here so it is testable and reusable from
//! multiple frontends.

pub mod analysis;
pub mod dataset;
pub mod db;
pub mod model;
pub mod naming;
pub mod services;

/// Returns the library version as encoded at compile time.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
