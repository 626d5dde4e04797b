use super::*;
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_in_memory() {
    let db = DuckDbBackend::in_memory().unwrap();
    assert_eq!(db.db_type(), "duckdb");
    assert!(!db.in_transaction());
}

#[tokio::test]
async fn test_execute_batch_and_query() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch(
        "CREATE TABLE t1 (id INT, name VARCHAR); INSERT INTO t1 VALUES (1, 'a'), (2, 'b');",
    )
    .await
    .unwrap();

    let rows = db.query("SELECT id, name FROM t1 ORDER BY id").await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].column_names().collect::<Vec<_>>(), vec!["id", "name"]);
    assert_eq!(rows[0].get("id"), Some(&json!(1)));
    assert_eq!(rows[1].get("name"), Some(&json!("b")));
}

#[tokio::test]
async fn test_query_value_types() {
    let db = DuckDbBackend::in_memory().unwrap();
    let rows = db
        .query("SELECT true AS passed, NULL AS missing, 1.5::DOUBLE AS ratio, 42::BIGINT AS n")
        .await
        .unwrap();

    let row = &rows[0];
    assert_eq!(row.get("passed"), Some(&json!(true)));
    assert_eq!(row.get("missing"), Some(&JsonValue::Null));
    assert_eq!(row.get("ratio"), Some(&json!(1.5)));
    assert_eq!(row.get("n"), Some(&json!(42)));
}

#[tokio::test]
async fn test_query_no_rows() {
    let db = DuckDbBackend::in_memory().unwrap();
    let rows = db.query("SELECT 1 AS passed WHERE 1 = 0").await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_execution_error() {
    let db = DuckDbBackend::in_memory().unwrap();
    let err = db.execute_batch("SELECT * FROM nowhere").await.unwrap_err();
    assert!(matches!(err, DbError::ExecutionError(_)));
}

#[tokio::test]
async fn test_session_state_persists() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.execute_batch("CREATE SCHEMA staging; CREATE TABLE staging.t (id INT);")
        .await
        .unwrap();
    db.execute_batch("SET search_path = 'staging'").await.unwrap();
    db.execute_batch("INSERT INTO t VALUES (7)").await.unwrap();

    let rows = db.query("SELECT id FROM t").await.unwrap();
    assert_eq!(rows[0].get("id"), Some(&json!(7)));
}

#[tokio::test]
async fn test_commit_without_transaction_is_noop() {
    let db = DuckDbBackend::in_memory().unwrap();
    db.commit().await.unwrap();
}

#[tokio::test]
async fn test_transaction_committed() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("committed.duckdb");

    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.apply_isolation(IsolationLevel::Serializable).unwrap();
        assert!(db.in_transaction());
        db.execute_batch("CREATE TABLE t AS SELECT 1 AS id").await.unwrap();
        db.commit().await.unwrap();
        assert!(!db.in_transaction());
    }

    let db = DuckDbBackend::from_path(&path).unwrap();
    let rows = db.query("SELECT count(*) AS n FROM t").await.unwrap();
    assert_eq!(rows[0].get("n"), Some(&json!(1)));
}

#[tokio::test]
async fn test_transaction_discarded_without_commit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("discarded.duckdb");

    {
        let db = DuckDbBackend::from_path(&path).unwrap();
        db.apply_isolation(IsolationLevel::ReadCommitted).unwrap();
        db.execute_batch("CREATE TABLE t AS SELECT 1 AS id").await.unwrap();
    }

    let db = DuckDbBackend::from_path(&path).unwrap();
    assert!(db.query("SELECT * FROM t").await.is_err());
}
