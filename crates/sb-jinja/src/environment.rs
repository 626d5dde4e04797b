//! Jinja environment setup for SQLBucket

use crate::error::{JinjaError, JinjaResult};
use crate::functions::context_value;
use crate::loader::{TemplateLoader, SQL_EXTENSIONS};
use minijinja::{Environment, ErrorKind};
use sb_core::Context;
use std::path::{Path, PathBuf};

/// Jinja templating environment bound to one template search path
pub struct JinjaEnvironment {
    env: Environment<'static>,
    loader: TemplateLoader,
}

impl JinjaEnvironment {
    /// Create an environment over an explicit loader
    pub fn new(loader: TemplateLoader) -> Self {
        let mut env = Environment::new();
        let source = loader.clone();
        env.set_loader(move |name| source.load(name));
        Self { env, loader }
    }

    /// Environment for `<project>/<folder>` with the built-in macros and
    /// an optional shared macro folder behind it
    pub fn for_folder(project_path: &Path, folder: &str, extra_macro_dir: Option<&Path>) -> Self {
        Self::new(TemplateLoader::for_folder(
            &project_path.join(folder),
            extra_macro_dir,
        ))
    }

    /// Environment searching plain directories in order
    pub fn with_search_paths(paths: &[PathBuf]) -> Self {
        Self::new(TemplateLoader::from_dirs(paths))
    }

    /// Render the template at relative path `name` with `context`
    pub fn render_template(&self, name: &str, context: &Context) -> JinjaResult<String> {
        let template = self.env.get_template(name).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                JinjaError::TemplateNotFound {
                    name: name.to_string(),
                    search_path: self.loader.search_path_display(),
                }
            } else {
                JinjaError::from(e)
            }
        })?;
        log::debug!("Rendering template '{}'", name);
        template.render(context_value(context)).map_err(JinjaError::from)
    }

    /// SQL templates in the primary folder, as sorted relative paths
    pub fn list_templates(&self) -> JinjaResult<Vec<String>> {
        self.loader.list_templates(SQL_EXTENSIONS)
    }
}

#[cfg(test)]
#[path = "environment_test.rs"]
mod tests;
