//! [`SqliteStore`] -- SQLite-backed repository implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use rusqlite::Connection;
use rusqlite::functions::FunctionFlags;
use tracing::{debug, info, warn};
use worklog_core::codec::{JsonListCodec, ListCodec};

use crate::error::{Result, StorageError};
use crate::sqlite::migrations::{self, Migration, MigrationRecord, MigrationReport};
use crate::sqlite::query::CASEFOLD_FN;
use crate::sqlite::schema;

/// Default `busy_timeout` in milliseconds.
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5000;

/// Connection settings applied when a store is opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionOptions {
    /// How long a statement waits on a locked database before failing.
    pub busy_timeout_ms: u64,
    /// Use write-ahead logging. Ignored for in-memory databases.
    pub wal: bool,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            wal: true,
        }
    }
}

/// SQLite-backed implementation of the [`Repository`](crate::traits::Repository)
/// trait.
///
/// Wraps a [`rusqlite::Connection`] in a `Mutex` so the store is `Send + Sync`.
/// Every public method acquires the lock, runs its SQL and releases it. The
/// schema is migrated to the latest version before the constructor returns.
pub struct SqliteStore {
    pub(crate) conn: Mutex<Connection>,
    pub(crate) codec: Box<dyn ListCodec>,
    /// Whether the engine enforces `ON DELETE CASCADE` on this connection.
    pub(crate) cascade_enforced: bool,
}

impl SqliteStore {
    /// Opens (or creates) a database at `path` with default options.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_options(path, &ConnectionOptions::default())
    }

    /// Opens (or creates) a database at `path`.
    pub fn open_with_options(path: impl AsRef<Path>, options: &ConnectionOptions) -> Result<Self> {
        let path = path.as_ref();
        info!(?path, "opening SQLite database");

        let conn = Connection::open(path).map_err(|e| {
            StorageError::Connection(format!("failed to open {}: {e}", path.display()))
        })?;
        Self::bootstrap(conn, options, true, schema::MIGRATIONS)
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> Result<Self> {
        debug!("opening in-memory SQLite database");
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::Connection(format!("failed to open in-memory db: {e}")))?;
        Self::bootstrap(conn, &ConnectionOptions::default(), false, schema::MIGRATIONS)
    }

    /// Configures the connection and migrates it with `registry`. A migration
    /// failure is fatal: the connection is dropped and the error returned.
    pub(crate) fn bootstrap(
        conn: Connection,
        options: &ConnectionOptions,
        on_disk: bool,
        registry: &[Migration],
    ) -> Result<Self> {
        let cascade_enforced = configure_connection(&conn, options, on_disk)?;
        migrations::run_migrations(&conn, registry)?;

        Ok(Self {
            conn: Mutex::new(conn),
            codec: Box::new(JsonListCodec),
            cascade_enforced,
        })
    }

    /// Replaces the codec used for the `tags` and `blockers` columns.
    pub fn with_codec(mut self, codec: impl ListCodec + 'static) -> Self {
        self.codec = Box::new(codec);
        self
    }

    /// Returns `true` if the engine deletes dependent rows on task delete.
    pub fn cascade_enforced(&self) -> bool {
        self.cascade_enforced
    }

    /// Highest applied schema version.
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.lock_conn()?;
        migrations::current_version(&conn)
    }

    /// Bookkeeping rows, in version order.
    pub fn applied_migrations(&self) -> Result<Vec<MigrationRecord>> {
        let conn = self.lock_conn()?;
        migrations::applied_migrations(&conn)
    }

    pub(crate) fn run_migrations_impl(&self) -> Result<MigrationReport> {
        let conn = self.lock_conn()?;
        migrations::run_migrations(&conn, schema::MIGRATIONS)
    }

    pub(crate) fn close_impl(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|e| StorageError::Connection(format!("mutex poisoned: {e}")))?;
        conn.close()
            .map_err(|(_, e)| StorageError::Connection(format!("failed to close database: {e}")))?;
        debug!("database closed");
        Ok(())
    }

    /// Acquires the connection lock. Helper used by all operation modules.
    pub(crate) fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Connection(format!("mutex poisoned: {e}")))
    }
}

/// Sets connection pragmas, registers SQL functions and reports whether
/// foreign keys are enforced.
fn configure_connection(
    conn: &Connection,
    options: &ConnectionOptions,
    on_disk: bool,
) -> Result<bool> {
    if on_disk && options.wal {
        conn.execute_batch("PRAGMA journal_mode = WAL;")
            .map_err(|e| StorageError::Connection(format!("failed to enable WAL: {e}")))?;
    }
    conn.execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|e| StorageError::Connection(format!("failed to set pragmas: {e}")))?;
    conn.busy_timeout(Duration::from_millis(options.busy_timeout_ms))
        .map_err(|e| StorageError::Connection(format!("failed to set busy timeout: {e}")))?;

    // The pragma is a silent no-op on builds without foreign key support.
    let enforced: bool = conn
        .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
        .map_err(|e| StorageError::Connection(format!("failed to read pragmas: {e}")))?;
    if !enforced {
        warn!("foreign keys not enforced; task deletes will remove dependents explicitly");
    }
    register_functions(conn)?;
    debug!(
        wal = on_disk && options.wal,
        busy_timeout_ms = options.busy_timeout_ms,
        "connection configured"
    );
    Ok(enforced)
}

fn register_functions(conn: &Connection) -> Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
    .map_err(|e| StorageError::Connection(format!("failed to register {CASEFOLD_FN}: {e}")))
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("cascade_enforced", &self.cascade_enforced)
            .finish_non_exhaustive()
    }
}
