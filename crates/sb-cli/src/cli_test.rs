use super::*;
use clap::CommandFactory;

#[test]
fn verify_cli_args() {
    Cli::command().debug_assert();
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("sqlbucket").chain(args.iter().copied())).unwrap()
}

#[test]
fn test_run_job_flags() {
    let cli = parse(&[
        "run-job",
        "--name",
        "events",
        "--db",
        "warehouse",
        "--group",
        "other",
        "--fstep",
        "2",
        "--tstep",
        "3",
        "--from_date",
        "2024-01-01",
        "--to_days",
        "1",
        "--isolation",
        "read_committed",
        "--verbose",
        "country=fr",
        "limit=10",
    ]);
    assert!(cli.global.verbose);
    let Commands::RunJob(args) = cli.command else {
        panic!("expected run-job");
    };
    assert_eq!(args.name, "events");
    assert_eq!(args.db.as_deref(), Some("warehouse"));
    assert_eq!(args.group.as_deref(), Some("other"));
    assert_eq!(args.fstep, 2);
    assert_eq!(args.tstep, Some(3));
    assert_eq!(args.from_date.as_deref(), Some("2024-01-01"));
    assert_eq!(args.to_days, Some(1));
    assert_eq!(args.isolation, Some(IsolationLevel::ReadCommitted));
    assert_eq!(args.variables, vec!["country=fr", "limit=10"]);
    assert!(!args.rendering);
}

#[test]
fn test_run_job_defaults() {
    let Commands::RunJob(args) = parse(&["run-job", "-n", "events", "--db", "w"]).command else {
        panic!("expected run-job");
    };
    assert_eq!(args.fstep, 1);
    assert_eq!(args.tstep, None);
    assert!(args.edb.is_empty());
    assert!(args.variables.is_empty());
}

#[test]
fn test_run_job_all_with_exclusions() {
    let Commands::RunJob(args) =
        parse(&["run-job", "--name", "events", "--all", "--edb", "a,b"]).command
    else {
        panic!("expected run-job");
    };
    assert!(args.all);
    assert_eq!(args.db, None);
    assert_eq!(args.edb, vec!["a", "b"]);
}

#[test]
fn test_run_job_requires_db_or_all() {
    let result = Cli::try_parse_from(["sqlbucket", "run-job", "--name", "events"]);
    assert!(result.is_err());
}

#[test]
fn test_invalid_isolation_rejected() {
    let result = Cli::try_parse_from([
        "sqlbucket",
        "run-job",
        "--name",
        "events",
        "--db",
        "w",
        "--isolation",
        "sometimes",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_run_integrity_args() {
    let cli = parse(&[
        "--config",
        "conf/sqlbucket.yml",
        "run-integrity",
        "--name",
        "events",
        "--db",
        "warehouse",
        "--prefix",
        "daily",
    ]);
    assert_eq!(
        cli.global.config.as_deref(),
        Some(std::path::Path::new("conf/sqlbucket.yml"))
    );
    let Commands::RunIntegrity(args) = cli.command else {
        panic!("expected run-integrity");
    };
    assert_eq!(args.db, "warehouse");
    assert_eq!(args.prefix, "daily");
}

#[test]
fn test_create_project_args() {
    let Commands::CreateProject(args) = parse(&["create-project", "--name", "events"]).command
    else {
        panic!("expected create-project");
    };
    assert_eq!(args.name, "events");
}
