//! Error types for sb-project

use sb_core::CoreError;
use sb_integrity::IntegrityError;
use sb_jinja::JinjaError;
use sb_runner::RunnerError;
use thiserror::Error;

/// Project orchestration errors
#[derive(Error, Debug)]
pub enum ProjectError {
    /// Project name unusable as a directory name (P001)
    #[error("[P001] Invalid project name '{name}': must not be empty, contain '/', '\\', '..', or start with '.' or '-'")]
    InvalidProjectName { name: String },

    /// Scaffolding a new project failed (P002)
    #[error("[P002] Failed to create '{path}': {source}")]
    ScaffoldError {
        path: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Jinja(#[from] JinjaError),

    #[error(transparent)]
    Runner(#[from] RunnerError),

    #[error(transparent)]
    Integrity(#[from] IntegrityError),
}

/// Result type alias for ProjectError
pub type ProjectResult<T> = Result<T, ProjectError>;
