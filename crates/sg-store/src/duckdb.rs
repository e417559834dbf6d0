//! DuckDB version store implementation
//!
//! [`DuckDbVersionStore`] owns a DuckDB [`Connection`] and keeps one row per
//! package in a table it creates on first use.

use crate::error::{StoreError, StoreResult};
use crate::record::PackageVersionRecord;
use crate::traits::VersionStore;
use chrono::NaiveDateTime;
use duckdb::Connection;
use sg_core::sql_utils::{qualified_table, quote_ident};
use sg_core::{PackageName, StoreConfig};
use std::path::Path;

/// Timestamp layouts DuckDB produces when casting `TIMESTAMP` to `VARCHAR`.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

/// Version store backed by a DuckDB database.
///
/// Single-threaded, no `Mutex` needed because migrations run one at a time.
pub struct DuckDbVersionStore {
    conn: Connection,
    schema: Option<String>,
    table: String,
}

impl DuckDbVersionStore {
    /// Open (or create) the database at `path` with the default table.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError::Unavailable(format!("{e}: {}", path.display())))?;
        Ok(Self::with_connection(conn, &StoreConfig::default()))
    }

    /// Create an in-memory store with the default table.
    ///
    /// Useful for unit tests that don't need persistence.
    pub fn open_memory() -> StoreResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(Self::with_connection(conn, &StoreConfig::default()))
    }

    /// Open the store described by `config` (handles the `:memory:` path).
    pub fn from_config(config: &StoreConfig) -> StoreResult<Self> {
        if config.table.trim().is_empty() {
            return Err(sg_core::CoreError::ConfigInvalid {
                message: "store.table cannot be empty".to_string(),
            }
            .into());
        }

        let conn = if config.is_memory() {
            Connection::open_in_memory()
        } else {
            Connection::open(&config.path)
        }
        .map_err(|e| StoreError::Unavailable(format!("{e}: {}", config.path)))?;

        Ok(Self::with_connection(conn, config))
    }

    /// Wrap an existing connection, taking table and schema names from
    /// `config`. The path in `config` is ignored.
    pub fn with_connection(conn: Connection, config: &StoreConfig) -> Self {
        Self {
            conn,
            schema: config.schema.clone(),
            table: config.table.clone(),
        }
    }

    /// Borrow the underlying DuckDB connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Fully quoted name of the version table.
    pub fn table_name(&self) -> String {
        qualified_table(self.schema.as_deref(), &self.table)
    }

    /// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
    /// error.
    fn transaction<F, T>(&self, body: F) -> StoreResult<T>
    where
        F: FnOnce(&Connection) -> StoreResult<T>,
    {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| StoreError::Transaction(format!("BEGIN failed: {e}")))?;

        let result = body(&self.conn);

        match &result {
            Ok(_) => {
                if let Err(commit_err) = self.conn.execute_batch("COMMIT") {
                    let _ = self.conn.execute_batch("ROLLBACK");
                    return Err(StoreError::Transaction(format!(
                        "COMMIT failed: {commit_err}"
                    )));
                }
            }
            Err(_) => {
                let _ = self.conn.execute_batch("ROLLBACK");
            }
        }
        result
    }
}

impl VersionStore for DuckDbVersionStore {
    fn ensure_schema(&self) -> StoreResult<()> {
        let mut ddl = String::new();
        if let Some(schema) = &self.schema {
            ddl.push_str(&format!("CREATE SCHEMA IF NOT EXISTS {};\n", quote_ident(schema)));
        }
        ddl.push_str(&format!(
            "CREATE TABLE IF NOT EXISTS {} (
                 package    VARCHAR PRIMARY KEY,
                 version    VARCHAR NOT NULL,
                 applied_at TIMESTAMP NOT NULL DEFAULT now()
             );",
            self.table_name()
        ));

        self.conn.execute_batch(&ddl).map_err(|e| {
            StoreError::Unavailable(format!(
                "failed to create version table {}: {e}",
                self.table_name()
            ))
        })
    }

    fn get_version(&self, package: &PackageName) -> StoreResult<Option<String>> {
        self.ensure_schema()?;

        let sql = format!("SELECT version FROM {} WHERE package = ?", self.table_name());
        match self
            .conn
            .query_row(&sql, duckdb::params![package.as_str()], |row| {
                row.get::<_, String>(0)
            }) {
            Ok(version) => Ok(Some(version)),
            Err(duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(StoreError::Query(format!(
                "read version of '{package}': {e}"
            ))),
        }
    }

    fn set_version(&self, package: &PackageName, version: Option<&str>) -> StoreResult<()> {
        self.ensure_schema()?;

        // DuckDB checks primary keys eagerly: a delete + insert of one key
        // fails inside a transaction, hence the upsert.
        let table = self.table_name();
        self.transaction(|conn| {
            match version {
                Some(version) => conn.execute(
                    &format!(
                        "INSERT INTO {table} (package, version, applied_at) VALUES (?, ?, now())
                         ON CONFLICT (package) DO UPDATE
                         SET version = excluded.version, applied_at = excluded.applied_at"
                    ),
                    duckdb::params![package.as_str(), version],
                ),
                None => conn.execute(
                    &format!("DELETE FROM {table} WHERE package = ?"),
                    duckdb::params![package.as_str()],
                ),
            }
            .map_err(|e| StoreError::Query(format!("replace version of '{package}': {e}")))?;
            Ok(())
        })?;

        log::debug!(
            "Recorded {package} at {}",
            version.unwrap_or("<uninstalled>")
        );
        Ok(())
    }

    fn list_versions(&self) -> StoreResult<Vec<PackageVersionRecord>> {
        self.ensure_schema()?;

        let sql = format!(
            "SELECT package, version, CAST(applied_at AS VARCHAR) FROM {} ORDER BY package",
            self.table_name()
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter()
            .map(|(package, version, applied_at)| {
                let package = PackageName::try_new(package)
                    .ok_or_else(|| StoreError::Query("empty package name in store".to_string()))?;
                Ok(PackageVersionRecord {
                    package,
                    version,
                    applied_at: parse_timestamp(&applied_at)?,
                })
            })
            .collect()
    }

    fn store_type(&self) -> &'static str {
        "duckdb"
    }
}

fn parse_timestamp(value: &str) -> StoreResult<NaiveDateTime> {
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| StoreError::Query(format!("unrecognized timestamp '{value}'")))
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
