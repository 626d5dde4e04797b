//! Error types for sb-runner

use sb_db::DbError;
use thiserror::Error;

/// Step execution errors
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Start step after end step, or a zero start step (R001)
    #[error("[R001] Invalid step range {from}..={to}: start step must be at least 1 and lower or equal the final step")]
    InvalidStepRange { from: usize, to: usize },

    /// A step in `order` without rendered SQL (R002)
    #[error("[R002] No rendered query for step '{step}'")]
    MissingQuery { step: String },

    /// Connection bootstrap query failed (R003)
    #[error("[R003] Connection query failed: {source}")]
    ConnectionQueryFailed { source: DbError },

    /// A step failed; the run was aborted (R004)
    #[error("[R004] Query {position} '{step}' failed: {source}")]
    StepFailed {
        step: String,
        position: usize,
        source: DbError,
    },

    /// Database error outside of a step (R005)
    #[error("[R005] {0}")]
    Db(#[from] DbError),
}

/// Result type alias for RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
