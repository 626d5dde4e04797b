//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use minijinja::ErrorKind;
use sb_core::bucket_config::BUCKET_CONFIG_FILE;
use sb_core::{n_days_ago, parse_cli_variables, BucketConfig, Variables};
use sb_project::SqlBucket;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Exit code used when one or more integrity checks fail
pub(crate) const INTEGRITY_FAILED_EXIT: u8 = 3;

/// Error type representing a non-zero process exit code.
///
/// Commands return `Err(ExitCode(N).into())` and `main` turns it into the
/// process status, so destructors still run.
#[derive(Debug)]
pub(crate) struct ExitCode(pub(crate) u8);

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Control flow only, never shown to the user
        write!(f, "")
    }
}

impl std::error::Error for ExitCode {}

/// Read the bucket settings.
///
/// An explicit `--config` must exist; the default `sqlbucket.yml` is
/// optional and falls back to built-in defaults.
pub(crate) fn load_bucket_config(global: &GlobalArgs) -> Result<BucketConfig> {
    let (path, explicit) = match &global.config {
        Some(path) => (path.clone(), true),
        None => (PathBuf::from(BUCKET_CONFIG_FILE), false),
    };
    if !explicit && !path.exists() {
        log::debug!("No {} found, using defaults", path.display());
        return Ok(BucketConfig::default());
    }
    BucketConfig::load(&path)
        .with_context(|| format!("Failed to load bucket settings from {}", path.display()))
}

/// Bucket with the settings file applied and the default helper functions
/// registered
pub(crate) fn load_bucket(global: &GlobalArgs) -> Result<SqlBucket> {
    let config = load_bucket_config(global)?;
    let mut bucket = SqlBucket::from_config(&config);
    register_default_functions(&mut bucket);
    Ok(bucket)
}

/// `f.nrange(start, end)` and `f.n_days_ago(n)`
pub(crate) fn register_default_functions(bucket: &mut SqlBucket) {
    bucket.register_function("nrange", |start: i64, end: i64| {
        (start..end).collect::<Vec<_>>()
    });
    bucket.register_function("n_days_ago", |n: i64| {
        n_days_ago(n)
            .map_err(|e| minijinja::Error::new(ErrorKind::InvalidOperation, e.to_string()))
    });
}

/// Parse trailing `key=value` arguments
pub(crate) fn caller_variables(args: &[String]) -> Result<Variables> {
    parse_cli_variables(args).context("Invalid extra variable")
}

/// Whether `path` exists as a directory, with a readable error otherwise
pub(crate) fn ensure_dir(path: &Path, what: &str) -> Result<()> {
    if !path.is_dir() {
        anyhow::bail!("{} '{}' does not exist", what, path.display());
    }
    Ok(())
}
