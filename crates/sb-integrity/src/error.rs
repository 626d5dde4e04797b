//! Error types for sb-integrity

use sb_db::DbError;
use thiserror::Error;

/// Integrity run errors.
///
/// A failing or erroring check is not an error; these are the conditions
/// that stop an integrity run altogether.
#[derive(Error, Debug)]
pub enum IntegrityError {
    /// A result row without the `passed` column (I001)
    #[error("[I001] Integrity query '{step}' must return a 'passed' column in every row")]
    PassedFieldNotInQuery { step: String },

    /// A step in `order` without rendered SQL (I002)
    #[error("[I002] No rendered query for integrity check '{step}'")]
    MissingQuery { step: String },

    /// Connecting or running the connection query failed (I003)
    #[error("[I003] {0}")]
    Db(#[from] DbError),
}

/// Result type alias for IntegrityError
pub type IntegrityResult<T> = Result<T, IntegrityError>;
