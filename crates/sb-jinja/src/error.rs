//! Error types for sb-jinja

use thiserror::Error;

/// Jinja templating errors
#[derive(Error, Debug)]
pub enum JinjaError {
    /// Template render error (J001)
    #[error("[J001] Jinja render error: {0}")]
    RenderError(String),

    /// Template missing from every search root (J002)
    #[error("[J002] Template '{name}' not found in search path: {search_path}")]
    TemplateNotFound { name: String, search_path: String },

    /// Template directory could not be listed (J003)
    #[error("[J003] Failed to list templates in '{path}': {source}")]
    ListError {
        path: String,
        source: std::io::Error,
    },
}

/// Result type alias for JinjaError
pub type JinjaResult<T> = Result<T, JinjaError>;

impl From<minijinja::Error> for JinjaError {
    fn from(err: minijinja::Error) -> Self {
        // Include the full source chain, minijinja puts the template
        // location on the outer error and the cause underneath.
        let mut message = err.to_string();
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            message.push_str(&format!(": {cause}"));
            source = cause.source();
        }
        JinjaError::RenderError(message)
    }
}
