//! Storage error types.

use rusqlite::ErrorCode;
use worklog_core::codec::CodecError;
use worklog_core::validation::ValidationError;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested entity was not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of entity (e.g., "task", "link").
        entity: &'static str,
        /// The identifier that was looked up.
        id: String,
    },

    /// The caller-supplied entity failed validation. Nothing was written.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A stored list column could not be decoded.
    #[error("{entity} {id}: cannot decode {field}: {source}")]
    Decode {
        entity: &'static str,
        field: &'static str,
        id: String,
        #[source]
        source: CodecError,
    },

    /// A list field could not be encoded for storage.
    #[error("{entity}: cannot encode {field}: {source}")]
    Encode {
        entity: &'static str,
        field: &'static str,
        #[source]
        source: CodecError,
    },

    /// A schema migration failed. The store was not opened.
    #[error("migration {version} ({name}) failed: {reason}")]
    Migration {
        /// Version of the migration that failed (0 for the bookkeeping table).
        version: i64,
        /// Name of the migration that failed.
        name: String,
        /// Underlying error description.
        reason: String,
    },

    /// Failed to establish, configure or close the database connection.
    #[error("connection error: {0}")]
    Connection(String),

    /// A transaction could not be started or committed.
    #[error("cannot {op} {entity} transaction: {source}")]
    Transaction {
        entity: &'static str,
        /// `begin` or `commit`.
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// A SQLite error, tagged with the entity and operation that raised it.
    #[error("{op} {entity}: {source}")]
    Query {
        entity: &'static str,
        op: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the storage crate.
pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    // -- Constructors --------------------------------------------------------

    /// Creates a [`StorageError::NotFound`] for the given entity kind and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    // -- Predicates ----------------------------------------------------------

    /// Returns `true` if this is a [`StorageError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a [`StorageError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns the field named by a validation failure.
    pub fn validation_field(&self) -> Option<&'static str> {
        match self {
            Self::Validation(e) => Some(e.field),
            _ => None,
        }
    }

    /// Returns `true` if SQLite reported the database busy or locked, so the
    /// operation may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Query { source, .. } | Self::Transaction { source, .. } => matches!(
                source.sqlite_error_code(),
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            ),
            _ => false,
        }
    }
}

/// Returns a mapper that wraps a rusqlite error with entity and operation
/// context, for use with `map_err`.
pub(crate) fn query_err(
    entity: &'static str,
    op: &'static str,
) -> impl Fn(rusqlite::Error) -> StorageError {
    move |source| StorageError::Query { entity, op, source }
}

/// Like [`query_err`], for beginning or committing a transaction.
pub(crate) fn tx_err(
    entity: &'static str,
    op: &'static str,
) -> impl Fn(rusqlite::Error) -> StorageError {
    move |source| StorageError::Transaction { entity, op, source }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn not_found_display() {
        let err = StorageError::not_found("task", "tsk-1");
        assert!(err.is_not_found());
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "task not found: tsk-1");
    }

    #[test]
    fn validation_carries_field() {
        let err = StorageError::from(ValidationError::new("title", "is required"));
        assert!(err.is_validation());
        assert_eq!(err.validation_field(), Some("title"));
    }

    #[test]
    fn busy_query_is_retryable() {
        let source = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        let err = query_err("task", "insert")(source);
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("insert task: "));
    }

    #[test]
    fn locked_commit_is_retryable() {
        let source = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        let err = tx_err("comment", "commit")(source);
        assert!(err.is_retryable());
        assert!(err.to_string().starts_with("cannot commit comment transaction: "));
    }

    #[test]
    fn connection_failures_are_not_retryable() {
        let err = StorageError::Connection("mutex poisoned".into());
        assert!(!err.is_retryable());
    }

    #[test]
    fn constraint_violation_is_not_retryable() {
        let source = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_CONSTRAINT),
            None,
        );
        assert!(!query_err("link", "insert")(source).is_retryable());
    }
}
