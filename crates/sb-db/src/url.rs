//! Connection URL parsing

use crate::error::{DbError, DbResult};
use std::path::PathBuf;

const DUCKDB_SCHEME: &str = "duckdb";
const MEMORY: &str = ":memory:";

/// Where a connection URL points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionTarget {
    /// Fresh in-memory DuckDB database
    InMemory,
    /// DuckDB database file
    File(PathBuf),
}

/// Parse `duckdb://<path>`, `duckdb://:memory:` or a bare file path.
///
/// `duckdb://` with an empty path is an in-memory database.
pub fn parse_connection_url(url: &str) -> DbResult<ConnectionTarget> {
    let url = url.trim();
    let location = match url.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(DUCKDB_SCHEME) => rest,
        Some(_) => {
            return Err(DbError::UnsupportedUrl {
                url: url.to_string(),
            })
        }
        None => url,
    };

    if location.is_empty() || location == MEMORY {
        Ok(ConnectionTarget::InMemory)
    } else {
        Ok(ConnectionTarget::File(PathBuf::from(location)))
    }
}
