//! New project scaffolding

use crate::error::{ProjectError, ProjectResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Files written into a new project, as `(relative path, content)`
const TEMPLATE_FILES: &[(&str, &str)] = &[
    ("config.yaml", include_str!("../template/config.yaml")),
    (
        "queries/create_events.sql",
        include_str!("../template/queries/create_events.sql"),
    ),
    (
        "queries/daily_events.sql",
        include_str!("../template/queries/daily_events.sql"),
    ),
    (
        "integrity/daily_events_unique.sql",
        include_str!("../template/integrity/daily_events_unique.sql"),
    ),
];

/// Reject names that could escape the projects folder or confuse the shell
pub(crate) fn validate_project_name(name: &str) -> ProjectResult<()> {
    if name.trim().is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
        || name.starts_with('-')
    {
        return Err(ProjectError::InvalidProjectName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Write the sample project into `project_dir`, which must not exist
pub(crate) fn write_template(project_dir: &Path) -> ProjectResult<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(TEMPLATE_FILES.len());
    for (relative, content) in TEMPLATE_FILES {
        let path = project_dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| scaffold_error(parent, e))?;
        }
        fs::write(&path, content).map_err(|e| scaffold_error(&path, e))?;
        log::debug!("Created {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn scaffold_error(path: &Path, source: std::io::Error) -> ProjectError {
    ProjectError::ScaffoldError {
        path: path.display().to_string(),
        source,
    }
}
