//! Error types for sb-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Connection URL scheme without a backend (D003)
    #[error("[D003] Unsupported connection URL '{url}': expected duckdb://<path>, duckdb://:memory: or a file path")]
    UnsupportedUrl { url: String },

    /// Unknown isolation level name (D004)
    #[error("[D004] Unknown isolation level '{0}'. Expected one of: AUTOCOMMIT, SERIALIZABLE, REPEATABLE READ, READ COMMITTED, READ UNCOMMITTED, SNAPSHOT")]
    InvalidIsolationLevel(String),

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}
