//! Database trait definition

use crate::error::DbResult;
use crate::row::Row;
use async_trait::async_trait;

/// One exclusive database session.
///
/// A session is opened per run and never shared, so session-scoped state
/// (search paths, temp settings) persists across every statement sent
/// through it. Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait Database: Send + Sync {
    /// Execute one or more SQL statements, discarding any result rows
    async fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Execute a query and return its rows as ordered column mappings
    async fn query(&self, sql: &str) -> DbResult<Vec<Row>>;

    /// Commit the open transaction, if the session started one
    async fn commit(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}
