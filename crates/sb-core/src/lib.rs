//! sb-core - Core library for SQLBucket
//!
//! This crate provides the declarative project configuration, the
//! bucket-wide settings file, variable context building and merging,
//! the template helper function registry, and the rendered configuration
//! handed to the runners.

pub mod bucket_config;
pub mod config;
pub mod context;
pub mod error;
pub mod function;
pub mod rendered;
pub mod variables;

pub use bucket_config::BucketConfig;
pub use config::{OrderSpec, ProjectConfig, DEFAULT_GROUP};
pub use context::{Context, ContextBuilder, ContextMerger, RESERVED_NAMES};
pub use error::{CoreError, CoreResult};
pub use function::FunctionRegistry;
pub use rendered::{RenderedConfiguration, RenderedQueries};
pub use variables::{n_days_ago, parse_cli_variables, Variables};
