//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::isolation::IsolationLevel;
use crate::row::Row;
use crate::traits::Database;
use crate::url::ConnectionTarget;
use async_trait::async_trait;
use duckdb::types::Value as DuckValue;
use duckdb::Connection;
use serde_json::{Number, Value as JsonValue};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

/// DuckDB database backend
pub struct DuckDbBackend {
    conn: Mutex<Connection>,
    in_transaction: AtomicBool,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self::from_connection(conn))
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{}: {}", path.display(), e)))?;
        Ok(Self::from_connection(conn))
    }

    /// Open the database a parsed connection URL points at
    pub fn open(target: &ConnectionTarget) -> DbResult<Self> {
        match target {
            ConnectionTarget::InMemory => Self::in_memory(),
            ConnectionTarget::File(path) => Self::from_path(path),
        }
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            in_transaction: AtomicBool::new(false),
        }
    }

    /// Apply an isolation level to the fresh session.
    ///
    /// DuckDB transactions are always snapshot-isolated, so every
    /// transactional level maps to one explicit transaction.
    pub fn apply_isolation(&self, level: IsolationLevel) -> DbResult<()> {
        if !level.is_transactional() {
            return Ok(());
        }
        log::debug!("Opening {} transaction", level);
        self.execute_batch_sync("BEGIN TRANSACTION")?;
        self.in_transaction.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Whether a transaction opened by [`apply_isolation`](Self::apply_isolation) is pending
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::SeqCst)
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    /// Execute batch SQL synchronously
    fn execute_batch_sync(&self, sql: &str) -> DbResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    /// Run a query synchronously and collect every row.
    ///
    /// DuckDB panics on `column_count()` before execution, so rows are
    /// collected via `query_map` first and column names read afterwards.
    fn query_sync(&self, sql: &str) -> DbResult<Vec<Row>> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(sql)
            .map_err(|e| DbError::ExecutionError(format!("{}: {}", e, sql)))?;

        let mapped = stmt.query_map([], |row| {
            let col_count = row.as_ref().column_count();
            Ok((0..col_count)
                .map(|i| column_value(row, i))
                .collect::<Vec<_>>())
        })?;
        let raw_rows = mapped.collect::<Result<Vec<_>, _>>()?;

        let column_names: Vec<String> = (0..stmt.column_count())
            .map(|i| {
                stmt.column_name(i)
                    .map_or("?".to_string(), |v| v.to_string())
            })
            .collect();

        Ok(raw_rows
            .into_iter()
            .map(|values| column_names.iter().cloned().zip(values).collect())
            .collect())
    }

    fn commit_sync(&self) -> DbResult<()> {
        if !self.in_transaction.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        self.execute_batch_sync("COMMIT")
    }
}

#[async_trait]
impl Database for DuckDbBackend {
    async fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.execute_batch_sync(sql)
    }

    async fn query(&self, sql: &str) -> DbResult<Vec<Row>> {
        self.query_sync(sql)
    }

    async fn commit(&self) -> DbResult<()> {
        self.commit_sync()
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Read one column as JSON, `null` when the value cannot be read
fn column_value(row: &duckdb::Row<'_>, idx: usize) -> JsonValue {
    match row.get::<_, DuckValue>(idx) {
        Ok(value) => to_json(value),
        Err(e) => {
            log::debug!("Could not read column {}: {}", idx, e);
            JsonValue::Null
        }
    }
}

fn to_json(value: DuckValue) -> JsonValue {
    match value {
        DuckValue::Null => JsonValue::Null,
        DuckValue::Boolean(b) => JsonValue::Bool(b),
        DuckValue::TinyInt(n) => JsonValue::from(n),
        DuckValue::SmallInt(n) => JsonValue::from(n),
        DuckValue::Int(n) => JsonValue::from(n),
        DuckValue::BigInt(n) => JsonValue::from(n),
        DuckValue::HugeInt(n) => i64::try_from(n)
            .map(JsonValue::from)
            .unwrap_or_else(|_| JsonValue::String(n.to_string())),
        DuckValue::UTinyInt(n) => JsonValue::from(n),
        DuckValue::USmallInt(n) => JsonValue::from(n),
        DuckValue::UInt(n) => JsonValue::from(n),
        DuckValue::UBigInt(n) => JsonValue::from(n),
        DuckValue::Float(f) => float(f64::from(f)),
        DuckValue::Double(f) => float(f),
        DuckValue::Text(s) => JsonValue::String(s),
        other => JsonValue::String(format!("{:?}", other)),
    }
}

fn float(f: f64) -> JsonValue {
    Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number)
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;
