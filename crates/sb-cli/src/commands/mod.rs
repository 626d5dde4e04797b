//! Command implementations

pub(crate) mod common;
pub(crate) mod create_project;
pub(crate) mod run_integrity;
pub(crate) mod run_job;
