//! sb-runner - ETL step execution for SQLBucket
//!
//! Executes a [`sb_core::RenderedConfiguration`] on one freshly opened
//! session, strictly in order, failing fast on the first broken step.

pub mod error;
pub mod range;
pub mod runner;

pub use error::{RunnerError, RunnerResult};
pub use range::StepRange;
pub use runner::{RenderedStep, RunSummary, StepRunner, StepTiming};
