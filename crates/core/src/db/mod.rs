//! Project database integration and project layout definitions.
//!
//! A project is a directory with a `.lens/` metadata folder holding:
//! - `project.json`: [`ProjectConfig`], including inference thresholds and query row caps.
//! - `project.db`: [`ProjectDb`], the recorded deployments and their cached emission maps.

mod config;
mod context;
mod layout;
mod models;
mod project_db;
pub mod util;

pub use config::{DbConfig, ProjectConfig};
pub use context::ProjectContext;
pub use layout::ProjectLayout;
pub use models::DeploymentRecord;
pub use project_db::{current_schema_version, DbError, DbResult, ProjectDb, CURRENT_SCHEMA_VERSION};
pub use util::{
    emission_cache_key, load_project_config, load_project_config_if_present, open_project_db,
    source_hash,
};
