//! sb-project - Project orchestration for SQLBucket
//!
//! [`SqlBucket`] holds what is shared by all projects of a projects folder
//! (connections, environment, helper functions) and loads a [`Project`]
//! per run. A project renders its ETL steps or integrity checks into a
//! [`sb_core::RenderedConfiguration`] and hands it to the matching runner.

pub mod bucket;
pub mod error;
pub mod project;
mod scaffold;

pub use bucket::SqlBucket;
pub use error::{ProjectError, ProjectResult};
pub use project::{Project, RunOptions, INTEGRITY_FOLDER, QUERIES_FOLDER};
