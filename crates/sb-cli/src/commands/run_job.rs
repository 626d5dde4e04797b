//! run-job command - renders and runs a project's steps

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sb_core::{n_days_ago, Variables};
use sb_project::{RunOptions, SqlBucket};
use serde_json::Value;

use crate::cli::{GlobalArgs, RunJobArgs};
use crate::commands::common::{caller_variables, load_bucket};

/// Default distance of `from` from today, in days
const DEFAULT_FROM_DAYS: i64 = 4;

pub(crate) async fn execute(args: &RunJobArgs, global: &GlobalArgs) -> Result<()> {
    let bucket = load_bucket(global)?;
    let variables = job_variables(args)?;
    let options = RunOptions {
        group: args.group.clone(),
        from_step: args.fstep,
        to_step: args.tstep,
        verbose: global.verbose,
        isolation_level: args.isolation,
    };

    if !args.all {
        let db = args
            .db
            .as_deref()
            .context("--db is required unless --all is given")?;
        return run_one(&bucket, args, db, &variables, &options).await;
    }

    let connections = target_connections(&bucket, &args.edb);
    if connections.is_empty() {
        anyhow::bail!("No connections left to run after exclusions");
    }

    let mut failed = Vec::new();
    for db in &connections {
        if let Err(err) = run_one(&bucket, args, db, &variables, &options).await {
            log::error!("Run on connection '{}' failed: {:#}", db, err);
            failed.push(db.clone());
        }
    }
    if !failed.is_empty() {
        anyhow::bail!(
            "{} of {} connection run(s) failed: {}",
            failed.len(),
            connections.len(),
            failed.join(", ")
        );
    }
    Ok(())
}

async fn run_one(
    bucket: &SqlBucket,
    args: &RunJobArgs,
    db: &str,
    variables: &Variables,
    options: &RunOptions,
) -> Result<()> {
    let project = bucket
        .load_project(&args.name, db, variables)
        .with_context(|| format!("Failed to load project '{}'", args.name))?;

    if args.rendering {
        let steps = project
            .render_steps(options.group.as_deref(), options.from_step, options.to_step)
            .with_context(|| format!("Failed to render project '{}'", args.name))?;
        log::info!("Rendered {} step(s) for connection '{}'", steps.len(), db);
        return Ok(());
    }

    project
        .run(options)
        .await
        .with_context(|| format!("Job '{}' failed on connection '{}'", args.name, db))?;
    Ok(())
}

/// Caller variables: trailing `key=value` pairs plus `from` and `to`
fn job_variables(args: &RunJobArgs) -> Result<Variables> {
    let mut variables = caller_variables(&args.variables)?;
    let (from, to) = date_window(args)?;
    for (flag, date) in [("--from_date", &from), ("--to_date", &to)] {
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("{} '{}' is not a YYYY-MM-DD date", flag, date))?;
    }
    variables.insert("from".to_string(), Value::String(from));
    variables.insert("to".to_string(), Value::String(to));
    Ok(variables)
}

/// `--from_days`/`--to_days` win over the explicit dates
fn date_window(args: &RunJobArgs) -> Result<(String, String)> {
    let from = match (args.from_days, &args.from_date) {
        (Some(days), _) => n_days_ago(days).context("Invalid --from_days")?,
        (None, Some(date)) => date.clone(),
        (None, None) => n_days_ago(DEFAULT_FROM_DAYS)?,
    };
    let to = match (args.to_days, &args.to_date) {
        (Some(days), _) => n_days_ago(days).context("Invalid --to_days")?,
        (None, Some(date)) => date.clone(),
        (None, None) => n_days_ago(0)?,
    };
    Ok((from, to))
}

fn target_connections(bucket: &SqlBucket, excluded: &[String]) -> Vec<String> {
    bucket
        .connection_names()
        .into_iter()
        .filter(|name| !excluded.iter().any(|e| e == name))
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[path = "run_job_test.rs"]
mod tests;
