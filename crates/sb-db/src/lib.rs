//! sb-db - Database boundary for SQLBucket
//!
//! A run opens exactly one session through [`connect`] and keeps it for
//! its whole lifetime. The session executes SQL text and returns rows as
//! ordered column mappings. DuckDB is the bundled backend.

pub mod duckdb;
pub mod error;
pub mod isolation;
pub mod row;
pub mod traits;
pub mod url;

pub use duckdb::DuckDbBackend;
pub use error::{DbError, DbResult};
pub use isolation::IsolationLevel;
pub use row::Row;
pub use traits::Database;
pub use url::{parse_connection_url, ConnectionTarget};

/// Open a fresh, exclusive session for `url`.
///
/// Transactional isolation levels start one transaction right away;
/// [`Database::commit`] ends it.
pub fn connect(url: &str, isolation_level: Option<IsolationLevel>) -> DbResult<Box<dyn Database>> {
    let target = parse_connection_url(url)?;
    let backend = DuckDbBackend::open(&target)?;
    backend.apply_isolation(isolation_level.unwrap_or_default())?;
    log::debug!("Connected to {:?}", target);
    Ok(Box::new(backend))
}
