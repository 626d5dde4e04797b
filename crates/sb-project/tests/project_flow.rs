//! End-to-end project flows over the fixture projects

use sb_core::{CoreError, Variables};
use sb_project::{ProjectError, RunOptions, SqlBucket};
use serde_json::json;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/projects")
}

fn vars(value: serde_json::Value) -> Variables {
    serde_json::from_value(value).unwrap()
}

fn bucket() -> SqlBucket {
    SqlBucket::new(fixtures())
        .with_connection("db", "duckdb://:memory:")
        .with_env_name(Some("dev".to_string()))
}

fn nrange(start: i64, end: i64) -> Vec<i64> {
    (start..end).collect()
}

#[test]
fn test_flat_project_renders_in_order() {
    let project = bucket().load_project("project1", "db", &Variables::new()).unwrap();
    let configuration = project.configure(None).unwrap();

    assert_eq!(configuration.project_name, "project1");
    assert_eq!(configuration.connection_name, "db");
    assert_eq!(
        configuration.queries.iter().collect::<Vec<_>>(),
        vec![
            ("query_one.sql", "bar"),
            ("query_two.sql", "foobar"),
            ("folder1/query_three.sql", "bar"),
        ]
    );
    assert_eq!(
        configuration.order,
        vec!["query_one.sql", "query_two.sql", "folder1/query_three.sql"]
    );
    assert_eq!(configuration.context.get("foo"), Some(&json!("bar")));
    assert_eq!(configuration.context.environment["foo"], json!("foobar"));
}

#[test]
fn test_config_overrides_caller_and_environment_values() {
    let project = bucket()
        .with_env_variables(vars(json!({"foo": "foofoobar"})))
        .load_project("project1", "db", &vars(json!({"foo": "barbar"})))
        .unwrap();
    let configuration = project.configure(None).unwrap();

    assert_eq!(configuration.query("query_one.sql"), Some("bar"));
    assert_eq!(configuration.query("query_two.sql"), Some("foobar"));
    assert_eq!(configuration.context.get("foo"), Some(&json!("bar")));
    assert_eq!(configuration.context.environment["name"], json!("dev"));
}

#[test]
fn test_flat_project_rejects_group() {
    let project = bucket().load_project("project1", "db", &Variables::new()).unwrap();
    assert!(matches!(
        project.configure(Some("main")),
        Err(ProjectError::Core(CoreError::OrderNotInRightFormat { .. }))
    ));
}

#[test]
fn test_grouped_project() {
    let project = bucket()
        .with_env_variables(vars(json!({"foo": "foofoobar"})))
        .load_project("project2", "db", &vars(json!({"foo": "bar"})))
        .unwrap();

    let main = project.configure(Some("main")).unwrap();
    assert_eq!(main.order, vec!["query_one.sql"]);
    assert_eq!(main.query("query_one.sql"), Some("barbar"));
    assert_eq!(main.context.get("foo"), Some(&json!("barbar")));
    assert_eq!(main.context.environment["foo"], json!("foofoobar"));

    let other = project.configure(Some("other")).unwrap();
    assert_eq!(other.order, vec!["query_two.sql", "folder1/query_three.sql"]);
    assert_eq!(other.query("query_one.sql"), None);
    assert_eq!(other.query("query_two.sql"), Some("foofoobar"));
    assert_eq!(other.query("folder1/query_three.sql"), Some("barbar"));

    let default = project.configure(None).unwrap();
    assert_eq!(default.order, main.order);

    assert!(matches!(
        project.configure(Some("fake")),
        Err(ProjectError::Core(CoreError::GroupNotFound { .. }))
    ));
}

#[test]
fn test_connection_query_rendered_for_both_modes() {
    let mut connection_variables = BTreeMap::new();
    connection_variables.insert(
        "db".to_string(),
        vars(json!({
            "destination_schema": "output_schema",
            "source_schema": "input_schema"
        })),
    );
    let project = bucket()
        .with_connection_variables(connection_variables)
        .load_project("project2", "db", &Variables::new())
        .unwrap();

    let expected = "set search_path to output_schema, input_schema;";
    let configuration = project.configure(None).unwrap();
    let integrity = project.configure_integrity().unwrap();
    assert_eq!(configuration.connection_query.as_deref(), Some(expected));
    assert_eq!(integrity.connection_query.as_deref(), Some(expected));
    assert!(integrity.order.is_empty());
}

#[test]
fn test_integrity_rendering() {
    let project = bucket().load_project("project1", "db", &Variables::new()).unwrap();
    let integrity = project.configure_integrity().unwrap();

    assert_eq!(
        integrity.order,
        vec!["folder1/integrity2.sql", "integrity1.sql"]
    );
    assert_eq!(integrity.query("folder1/integrity2.sql"), Some("foobar"));
    assert_eq!(integrity.query("integrity1.sql"), Some("bar"));
}

#[test]
fn test_registered_functions() {
    let mut bucket = bucket();
    bucket.register_function("nrange", nrange);
    bucket.register_function("nrange2", nrange);

    let project = bucket.load_project("project3", "db", &Variables::new()).unwrap();
    let configuration = project.configure(None).unwrap();
    assert_eq!(configuration.query("query_one.sql"), Some("select 1, 2, 3;"));
    assert_eq!(configuration.query("query_two.sql"), Some("select 1, 2, 3, 4;"));
}

#[tokio::test]
async fn test_integrity_with_functions_passes() {
    let mut bucket = bucket();
    bucket.register_function("nrange", nrange);

    let project = bucket.load_project("project3", "db", &Variables::new()).unwrap();
    assert_eq!(project.run_integrity("", false).await.unwrap(), 0);
}

#[tokio::test]
async fn test_scaffolded_project_runs_end_to_end() {
    let dir = TempDir::new().unwrap();
    let url = format!("duckdb://{}", dir.path().join("warehouse.duckdb").display());
    let bucket = SqlBucket::new(dir.path().join("projects")).with_connection("warehouse", url);
    std::fs::create_dir_all(bucket.projects_path()).unwrap();
    bucket.create_project("events").unwrap();

    let project = bucket
        .load_project(
            "events",
            "warehouse",
            &vars(json!({"from": "2024-01-01", "to": "2024-01-08"})),
        )
        .unwrap();

    let summary = project.run(&RunOptions::default()).await.unwrap();
    assert_eq!(summary.steps.len(), 2);
    assert_eq!(summary.connection_name, "warehouse");

    assert_eq!(project.run_integrity("", true).await.unwrap(), 0);
}

#[tokio::test]
async fn test_failing_integrity_counts_errors() {
    let dir = TempDir::new().unwrap();
    let project_dir = dir.path().join("checks");
    std::fs::create_dir_all(project_dir.join("integrity")).unwrap();
    std::fs::write(project_dir.join("config.yaml"), "order: []\n").unwrap();
    std::fs::write(
        project_dir.join("integrity/a_passes.sql"),
        "SELECT true AS passed",
    )
    .unwrap();
    std::fs::write(
        project_dir.join("integrity/b_fails.sql"),
        "SELECT n, n < 2 AS passed FROM range(3) t(n)",
    )
    .unwrap();
    std::fs::write(
        project_dir.join("integrity/c_errors.sql"),
        "SELECT passed FROM missing_table",
    )
    .unwrap();

    let bucket = SqlBucket::new(dir.path()).with_connection("db", "duckdb://:memory:");
    let project = bucket.load_project("checks", "db", &Variables::new()).unwrap();

    assert_eq!(project.run_integrity("", false).await.unwrap(), 2);
    assert_eq!(project.run_integrity("a_", false).await.unwrap(), 0);
}

#[tokio::test]
async fn test_run_step_range_and_failure() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("etl.duckdb");
    let project_dir = dir.path().join("etl");
    std::fs::create_dir_all(project_dir.join("queries")).unwrap();
    std::fs::write(
        project_dir.join("config.yaml"),
        "order: [create.sql, insert.sql, broken.sql]\n",
    )
    .unwrap();
    std::fs::write(project_dir.join("queries/create.sql"), "CREATE TABLE t (id INT);").unwrap();
    std::fs::write(project_dir.join("queries/insert.sql"), "INSERT INTO t VALUES (1);").unwrap();
    std::fs::write(project_dir.join("queries/broken.sql"), "INSERT INTO nope VALUES (1);").unwrap();

    let bucket = SqlBucket::new(dir.path())
        .with_connection("db", format!("duckdb://{}", db_path.display()));
    let project = bucket.load_project("etl", "db", &Variables::new()).unwrap();

    let options = RunOptions {
        to_step: Some(2),
        ..RunOptions::default()
    };
    let summary = project.run(&options).await.unwrap();
    assert_eq!(summary.steps.len(), 2);

    let options = RunOptions {
        from_step: 3,
        ..RunOptions::default()
    };
    let err = project.run(&options).await.unwrap_err();
    assert!(matches!(
        err,
        ProjectError::Runner(sb_runner::RunnerError::StepFailed { position: 3, .. })
    ));
}
