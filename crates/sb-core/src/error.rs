//! Error types for sb-core

use thiserror::Error;

/// Core error type for SQLBucket
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config '{path}': {message}")]
    ConfigParseError { path: String, message: String },

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: Project directory not found
    #[error("[E004] Project \"{name}\" does not exist.")]
    ProjectNotFound { name: String },

    /// E005: Connection name not registered
    #[error("[E005] Connection \"{name}\" not found.")]
    ConnectionNotFound { name: String },

    /// E006: Caller variable uses a reserved top-level name
    #[error("[E006] Variable name '{name}' is reserved (reserved names: c, e, f)")]
    ReservedVariableName { name: String },

    /// E007: A group was requested but `order` is a flat list
    #[error("[E007] Current config not in the right format for group orders (requested group '{group}')")]
    OrderNotInRightFormat { group: String },

    /// E008: Requested group missing from the grouped `order`
    #[error("[E008] Group \"{group}\" not found in order config. Available groups: {available}")]
    GroupNotFound { group: String, available: String },

    /// E009: Project name already used
    #[error("[E009] Project name \"{name}\" already used. Find another name")]
    ProjectAlreadyExists { name: String },

    /// E010: Malformed `key=value` variable
    #[error("[E010] Invalid variable '{raw}': expected key=value")]
    InvalidVariable { raw: String },

    /// E011: IO error with file path context
    #[error("[E011] Failed to read '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },

    /// E012: Day offset outside the representable date range
    #[error("[E012] Cannot compute the date {days} day(s) ago: out of range")]
    DateOutOfRange { days: i64 },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
