//! `wl migrate` -- bring the schema up to date.

use anyhow::{Context, Result};
use serde_json::json;

use worklog_storage::{Repository, SqliteStore};
use worklog_storage::sqlite::schema::latest_version;

use crate::context::RuntimeContext;
use crate::output::{output_json, output_table};

/// Execute the `wl migrate` command.
///
/// Opening the store already applies pending migrations; the explicit run
/// here only confirms there is nothing left.
pub fn run(ctx: &RuntimeContext, store: &SqliteStore) -> Result<()> {
    let report = store.run_migrations().context("failed to run migrations")?;
    let records = store
        .applied_migrations()
        .context("failed to read migration history")?;
    let version = records.last().map_or(0, |r| r.version);

    if ctx.json {
        let applied: Vec<_> = records
            .iter()
            .map(|r| json!({ "version": r.version, "applied_at": r.applied_at }))
            .collect();
        output_json(&json!({
            "database": ctx.db_path,
            "version": version,
            "latest": latest_version(),
            "pending_applied": report.applied,
            "migrations": applied,
        }));
    } else {
        println!("{}: schema version {version}", ctx.db_path.display());
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|r| vec![r.version.to_string(), r.applied_at.to_rfc3339()])
            .collect();
        output_table(&["VERSION", "APPLIED AT"], &rows);
    }
    Ok(())
}
