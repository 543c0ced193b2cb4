//! The migration runner.
//!
//! Applies the pending entries of a registry (normally
//! [`schema::MIGRATIONS`](crate::sqlite::schema::MIGRATIONS)) in version
//! order, one transaction per migration, recording each applied version in the
//! `schema_migrations` table. A failure rolls back the failing migration and
//! stops the run; earlier migrations stay committed and are skipped next time.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::sqlite::schema::{MIGRATIONS_TABLE, MIGRATIONS_TABLE_DDL};
use crate::sqlite::timestamps::{format_datetime, get_datetime, now};

/// One versioned schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// Strictly increasing, contiguous, starting at 1.
    pub version: i64,
    pub name: &'static str,
    /// Schema script; may contain several statements.
    pub sql: &'static str,
}

/// A row of the bookkeeping table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationRecord {
    pub version: i64,
    pub applied_at: DateTime<Utc>,
}

/// Outcome of a migration run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Highest applied version before the run (0 for a fresh database).
    pub from_version: i64,
    /// Highest applied version after the run.
    pub to_version: i64,
    /// Versions applied by this run, ascending.
    pub applied: Vec<i64>,
}

impl MigrationReport {
    /// Returns `true` if the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

fn migration_err(version: i64, name: &str, reason: impl Into<String>) -> StorageError {
    StorageError::Migration {
        version,
        name: name.to_string(),
        reason: reason.into(),
    }
}

/// Checks that registry versions are contiguous and start at 1.
pub fn validate_registry(registry: &[Migration]) -> Result<()> {
    for (expected, migration) in (1..).zip(registry) {
        if migration.version != expected {
            return Err(migration_err(
                migration.version,
                migration.name,
                format!("registry out of order: expected version {expected}"),
            ));
        }
    }
    Ok(())
}

/// Creates the bookkeeping table if it does not exist.
fn ensure_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(MIGRATIONS_TABLE_DDL)
        .map_err(|e| migration_err(0, MIGRATIONS_TABLE, e.to_string()))
}

/// Returns the highest applied version, or 0 when none has been applied.
pub fn current_version(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
        [],
        |row| row.get(0),
    )
    .map_err(|e| migration_err(0, MIGRATIONS_TABLE, e.to_string()))
}

/// Lists the bookkeeping rows in version order.
pub fn applied_migrations(conn: &Connection) -> Result<Vec<MigrationRecord>> {
    let mut stmt = conn
        .prepare("SELECT version, applied_at FROM schema_migrations ORDER BY version ASC")
        .map_err(|e| migration_err(0, MIGRATIONS_TABLE, e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok(MigrationRecord {
                version: row.get("version")?,
                applied_at: get_datetime(row, "applied_at")?,
            })
        })
        .map_err(|e| migration_err(0, MIGRATIONS_TABLE, e.to_string()))?;

    let mut records = Vec::new();
    for row in rows {
        records.push(row.map_err(|e| migration_err(0, MIGRATIONS_TABLE, e.to_string()))?);
    }
    Ok(records)
}

/// Applies one migration and its bookkeeping row atomically.
fn apply_one(conn: &Connection, migration: &Migration) -> Result<()> {
    let fail = |e: rusqlite::Error| migration_err(migration.version, migration.name, e.to_string());

    // Rolled back on drop if anything below fails.
    let tx = conn.unchecked_transaction().map_err(fail)?;
    tx.execute_batch(migration.sql).map_err(fail)?;
    tx.execute(
        "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
        params![migration.version, format_datetime(&now())],
    )
    .map_err(fail)?;
    tx.commit().map_err(fail)
}

/// Applies every registry entry newer than the current version.
pub fn run_migrations(conn: &Connection, registry: &[Migration]) -> Result<MigrationReport> {
    validate_registry(registry)?;
    ensure_migrations_table(conn)?;

    let from_version = current_version(conn)?;
    let mut report = MigrationReport {
        from_version,
        to_version: from_version,
        applied: Vec::new(),
    };

    for migration in registry {
        if migration.version <= from_version {
            debug!(
                version = migration.version,
                name = migration.name,
                "migration already applied, skipping"
            );
            continue;
        }

        debug!(version = migration.version, name = migration.name, "applying migration");
        apply_one(conn, migration)?;
        report.applied.push(migration.version);
        report.to_version = migration.version;
    }

    if report.is_noop() {
        debug!(version = report.to_version, "schema up to date");
    } else {
        info!(
            from = report.from_version,
            to = report.to_version,
            applied = report.applied.len(),
            "schema migrated"
        );
    }
    Ok(report)
}
