//! create-project command - scaffolds a new project

use anyhow::{Context, Result};

use crate::cli::{CreateProjectArgs, GlobalArgs};
use crate::commands::common::{ensure_dir, load_bucket};

pub(crate) async fn execute(args: &CreateProjectArgs, global: &GlobalArgs) -> Result<()> {
    let bucket = load_bucket(global)?;
    ensure_dir(bucket.projects_path(), "Projects folder")?;

    let path = bucket
        .create_project(&args.name)
        .with_context(|| format!("Failed to create project '{}'", args.name))?;
    log::info!("Project files written to {}", path.display());
    Ok(())
}
