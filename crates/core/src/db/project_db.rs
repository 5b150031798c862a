use std::path::Path;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::{debug, info};

use crate::db::DeploymentRecord;
use crate::model::{Address, EmissionMap};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for project database operations.
#[derive(Debug, Error)]
pub enum DbError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for DB operations.
pub type DbResult<T> = Result<T, DbError>;

/// SQLite-backed project database.
///
/// Holds the deployments recorded for a project and, per deployment, the
/// emission map last computed from its source.
#[derive(Debug)]
pub struct ProjectDb {
    conn: Connection,
}

fn map_deployment(row: &rusqlite::Row<'_>) -> rusqlite::Result<DeploymentRecord> {
    let address: String = row.get(1)?;
    let address = Address::parse(&address)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?;
    Ok(DeploymentRecord {
        contract_name: row.get(0)?,
        address,
        transaction_hash: row.get(2)?,
        dataset: row.get(3)?,
        abi_json: row.get(4)?,
        source_hash: row.get(5)?,
        created_at: row.get(6)?,
    })
}

impl ProjectDb {
    /// Open (or create) a project database at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Expose a reference to the underlying connection for advanced callers.
    /// For most code, prefer higher-level helpers.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Insert a deployment and return its row id.
    ///
    /// Recording an address that is already known replaces the stored record
    /// and drops its cached emission map.
    pub fn insert_deployment(&self, record: &DeploymentRecord) -> DbResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let address = record.address.to_string();
        tx.execute(
            r#"
            INSERT INTO deployments (contract_name, address, transaction_hash, dataset, abi_json, source_hash, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(address) DO UPDATE SET
                contract_name = excluded.contract_name,
                transaction_hash = excluded.transaction_hash,
                dataset = excluded.dataset,
                abi_json = excluded.abi_json,
                source_hash = excluded.source_hash,
                created_at = excluded.created_at,
                emissions_key = NULL
            "#,
            params![
                record.contract_name,
                address,
                record.transaction_hash,
                record.dataset,
                record.abi_json,
                record.source_hash,
                record.created_at
            ],
        )?;
        let id: i64 =
            tx.query_row("SELECT id FROM deployments WHERE address = ?1", params![address], |row| {
                row.get(0)
            })?;
        tx.execute("DELETE FROM emissions WHERE deployment_id = ?1", params![id])?;
        tx.commit()?;
        debug!(id, %address, contract = %record.contract_name, "recorded deployment");
        Ok(id)
    }

    /// List all deployments (ordered by id).
    pub fn list_deployments(&self) -> DbResult<Vec<DeploymentRecord>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT contract_name, address, transaction_hash, dataset, abi_json, source_hash, created_at
            FROM deployments
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([], map_deployment)?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Look up a deployment by address.
    pub fn find_deployment(&self, address: &Address) -> DbResult<Option<(i64, DeploymentRecord)>> {
        let found = self
            .conn
            .query_row(
                r#"
                SELECT contract_name, address, transaction_hash, dataset, abi_json, source_hash, created_at, id
                FROM deployments
                WHERE address = ?1
                "#,
                params![address.to_string()],
                |row| Ok((row.get::<_, i64>(7)?, map_deployment(row)?)),
            )
            .optional()?;
        Ok(found)
    }

    /// Forget a deployment and its cached emission map. Returns whether the
    /// address was recorded.
    pub fn remove_deployment(&self, address: &Address) -> DbResult<bool> {
        let tx = self.conn.unchecked_transaction()?;
        let address = address.to_string();
        tx.execute(
            "DELETE FROM emissions WHERE deployment_id IN (SELECT id FROM deployments WHERE address = ?1)",
            params![address],
        )?;
        let removed = tx.execute("DELETE FROM deployments WHERE address = ?1", params![address])?;
        tx.commit()?;
        debug!(%address, removed, "removed deployment");
        Ok(removed > 0)
    }

    /// Forget every deployment. Returns how many were removed.
    pub fn clear_deployments(&self) -> DbResult<usize> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM emissions", [])?;
        let removed = tx.execute("DELETE FROM deployments", [])?;
        tx.commit()?;
        info!(removed, "cleared deployment history");
        Ok(removed)
    }

    /// Replace the emission map stored for a deployment, tagging it with the
    /// cache key of the inputs it was computed from (see
    /// [`crate::db::emission_cache_key`]).
    pub fn store_emission_map(
        &self,
        deployment_id: i64,
        cache_key: &str,
        map: &EmissionMap,
    ) -> DbResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM emissions WHERE deployment_id = ?1", params![deployment_id])?;

        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO emissions (deployment_id, function, idx, event)
                VALUES (?1, ?2, ?3, ?4)
                "#,
            )?;
            for (function, events) in map.iter() {
                for (idx, event) in events.iter().enumerate() {
                    stmt.execute(params![deployment_id, function, idx as i64, event])?;
                }
            }
        }

        tx.execute(
            "UPDATE deployments SET emissions_key = ?1 WHERE id = ?2",
            params![cache_key, deployment_id],
        )?;
        tx.commit()?;
        info!(deployment_id, functions = map.len(), "cached emission map");
        Ok(())
    }

    /// Load the stored emission map for a deployment, or `None` when nothing
    /// has been stored since the deployment was recorded.
    pub fn load_emission_map(&self, deployment_id: i64) -> DbResult<Option<EmissionMap>> {
        let stored: Option<Option<String>> = self
            .conn
            .query_row(
                "SELECT emissions_key FROM deployments WHERE id = ?1",
                params![deployment_id],
                |row| row.get(0),
            )
            .optional()?;
        if !matches!(stored, Some(Some(_))) {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(
            r#"
            SELECT function, event
            FROM emissions
            WHERE deployment_id = ?1
            ORDER BY function, idx
            "#,
        )?;
        let rows = stmt.query_map(params![deployment_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut map = EmissionMap::new();
        for row in rows {
            let (function, event) = row?;
            map.push_unique(&function, &event);
        }
        Ok(Some(map))
    }

    /// The stored emission map for `address`, if it was stored under `cache_key`.
    pub fn cached_emission_map(
        &self,
        address: &Address,
        cache_key: &str,
    ) -> DbResult<Option<EmissionMap>> {
        let row: Option<(i64, Option<String>)> = self
            .conn
            .query_row(
                "SELECT id, emissions_key FROM deployments WHERE address = ?1",
                params![address.to_string()],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        match row {
            Some((id, Some(key))) if key == cache_key => self.load_emission_map(id),
            Some(_) => {
                debug!(%address, "emission cache is stale");
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

/// Apply schema migrations to bring the database to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: deployments
/// - 2: emissions cache
fn apply_migrations(conn: &Connection) -> DbResult<()> {
    let current_version = current_schema_version(conn)?;

    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(DbError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version == 0 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS deployments (
                id               INTEGER PRIMARY KEY AUTOINCREMENT,
                contract_name    TEXT NOT NULL,
                address          TEXT NOT NULL UNIQUE,
                transaction_hash TEXT NOT NULL,
                dataset          TEXT,
                abi_json         TEXT NOT NULL,
                source_hash      TEXT NOT NULL,
                created_at       TEXT NOT NULL
            );

            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            ALTER TABLE deployments ADD COLUMN emissions_key TEXT;

            CREATE TABLE IF NOT EXISTS emissions (
                deployment_id INTEGER NOT NULL REFERENCES deployments(id) ON DELETE CASCADE,
                function      TEXT NOT NULL,
                idx           INTEGER NOT NULL,
                event         TEXT NOT NULL,
                PRIMARY KEY (deployment_id, function, idx)
            );

            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
pub fn current_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
