//! run-integrity command

use anyhow::{Context, Result};

use crate::cli::{GlobalArgs, RunIntegrityArgs};
use crate::commands::common::{caller_variables, load_bucket, ExitCode, INTEGRITY_FAILED_EXIT};

/// Exits with code 3 when any check failed or errored
pub(crate) async fn execute(args: &RunIntegrityArgs, global: &GlobalArgs) -> Result<()> {
    let bucket = load_bucket(global)?;
    let variables = caller_variables(&args.variables)?;
    let project = bucket
        .load_project(&args.name, &args.db, &variables)
        .with_context(|| format!("Failed to load project '{}'", args.name))?;

    let errors = project
        .run_integrity(&args.prefix, global.verbose)
        .await
        .with_context(|| format!("Integrity run of '{}' aborted", args.name))?;

    if errors > 0 {
        return Err(ExitCode(INTEGRITY_FAILED_EXIT).into());
    }
    Ok(())
}
