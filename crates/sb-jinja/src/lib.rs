//! sb-jinja - Jinja templating layer for SQLBucket
//!
//! Resolves SQL templates across an ordered list of search roots (the
//! project folder, the built-in shared macros, then an optional extra
//! macro folder) and renders them against a merged [`sb_core::Context`].
//! Registered helper functions are reachable as `{{ f.name(...) }}`.

pub mod builtins;
pub mod environment;
pub mod error;
pub mod functions;
pub mod loader;

pub use environment::JinjaEnvironment;
pub use error::{JinjaError, JinjaResult};
pub use loader::{TemplateLoader, SQL_EXTENSIONS};
