//! Hash-based ID assignment.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use worklog_core::idgen::{self, adaptive_defaults};

use crate::error::{Result, StorageError, query_err};

/// Picks an unused ID for a new row of `table`.
///
/// The hash length grows with the table size; colliding candidates are
/// retried with an increasing nonce.
pub(crate) fn next_id(
    conn: &Connection,
    table: &'static str,
    prefix: &str,
    seed: &str,
    timestamp: DateTime<Utc>,
) -> Result<String> {
    let count: i64 = conn
        .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .map_err(query_err(table, "count"))?;

    let length = idgen::compute_adaptive_length(
        usize::try_from(count).unwrap_or_default(),
        adaptive_defaults::MIN_LENGTH,
        adaptive_defaults::MAX_LENGTH,
        adaptive_defaults::MAX_COLLISION_PROB,
    );

    let exists_sql = format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1)");
    for nonce in 0..adaptive_defaults::MAX_ATTEMPTS {
        let candidate = idgen::generate_hash_id(prefix, seed, timestamp, length, nonce);
        let exists: bool = conn
            .query_row(&exists_sql, params![candidate], |row| row.get(0))
            .map_err(query_err(table, "check id"))?;
        if !exists {
            return Ok(candidate);
        }
    }

    Err(StorageError::Internal(format!(
        "failed to generate a unique {prefix} id after {} attempts",
        adaptive_defaults::MAX_ATTEMPTS
    )))
}
