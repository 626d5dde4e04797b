//! Multi-root template lookup

use crate::builtins::get_builtin_template;
use crate::error::{JinjaError, JinjaResult};
use minijinja::{Error, ErrorKind};
use std::path::{Component, Path, PathBuf};

/// Extensions recognized as SQL templates when discovering steps
pub const SQL_EXTENSIONS: &[&str] = &["sql"];

/// One place templates are looked up in
#[derive(Debug, Clone, PartialEq, Eq)]
enum SearchRoot {
    Dir(PathBuf),
    Builtin,
}

/// Ordered template search path; the first root holding a template wins.
#[derive(Debug, Clone)]
pub struct TemplateLoader {
    roots: Vec<SearchRoot>,
}

impl TemplateLoader {
    /// Search path for one project folder (`queries/` or `integrity/`):
    /// the folder itself, the built-in macros, then `extra_macro_dir`.
    pub fn for_folder(folder: &Path, extra_macro_dir: Option<&Path>) -> Self {
        let mut roots = vec![SearchRoot::Dir(folder.to_path_buf()), SearchRoot::Builtin];
        if let Some(dir) = extra_macro_dir {
            roots.push(SearchRoot::Dir(dir.to_path_buf()));
        }
        Self { roots }
    }

    /// Search path made of plain directories only
    pub fn from_dirs(dirs: &[PathBuf]) -> Self {
        Self {
            roots: dirs.iter().cloned().map(SearchRoot::Dir).collect(),
        }
    }

    /// Load the source of `name` from the first root that has it.
    ///
    /// Returns `Ok(None)` when no root holds the template, which minijinja
    /// reports as a missing template.
    pub fn load(&self, name: &str) -> Result<Option<String>, Error> {
        let Some(relative) = safe_relative_path(name) else {
            return Ok(None);
        };

        for root in &self.roots {
            match root {
                SearchRoot::Dir(dir) => {
                    let path = dir.join(&relative);
                    if !path.is_file() {
                        continue;
                    }
                    return std::fs::read_to_string(&path).map(Some).map_err(|e| {
                        Error::new(
                            ErrorKind::InvalidOperation,
                            format!("could not read template '{}'", path.display()),
                        )
                        .with_source(e)
                    });
                }
                SearchRoot::Builtin => {
                    if let Some(source) = get_builtin_template(name) {
                        return Ok(Some(source.to_string()));
                    }
                }
            }
        }
        Ok(None)
    }

    /// Human-readable search path, for error messages
    pub fn search_path_display(&self) -> String {
        self.roots
            .iter()
            .map(|root| match root {
                SearchRoot::Dir(dir) => dir.display().to_string(),
                SearchRoot::Builtin => "<builtin macros>".to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The first directory root, where project templates live
    pub fn primary_dir(&self) -> Option<&Path> {
        self.roots.iter().find_map(|root| match root {
            SearchRoot::Dir(dir) => Some(dir.as_path()),
            SearchRoot::Builtin => None,
        })
    }

    /// Relative paths (with `/` separators) of every template under the
    /// primary directory whose extension is in `extensions`, sorted.
    ///
    /// A missing primary directory yields an empty list.
    pub fn list_templates(&self, extensions: &[&str]) -> JinjaResult<Vec<String>> {
        let Some(root) = self.primary_dir() else {
            return Ok(Vec::new());
        };
        let mut found = Vec::new();
        if root.is_dir() {
            collect_templates(root, root, extensions, &mut found)?;
        }
        found.sort();
        Ok(found)
    }
}

/// Recursively collect template paths relative to `root`.
fn collect_templates(
    root: &Path,
    dir: &Path,
    extensions: &[&str],
    found: &mut Vec<String>,
) -> JinjaResult<()> {
    let entries = std::fs::read_dir(dir).map_err(|e| JinjaError::ListError {
        path: dir.display().to_string(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| JinjaError::ListError {
            path: dir.display().to_string(),
            source: e,
        })?;
        let path = entry.path();
        if entry
            .file_name()
            .to_str()
            .is_some_and(|n| n.starts_with('.'))
        {
            continue;
        }
        if path.is_dir() {
            collect_templates(root, &path, extensions, found)?;
            continue;
        }
        let matches_ext = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| extensions.contains(&e));
        if !matches_ext {
            continue;
        }
        if let Ok(relative) = path.strip_prefix(root) {
            let name = relative
                .components()
                .filter_map(|c| c.as_os_str().to_str())
                .collect::<Vec<_>>()
                .join("/");
            found.push(name);
        }
    }
    Ok(())
}

/// Turn a template name into a relative path, rejecting absolute paths
/// and parent-directory segments.
fn safe_relative_path(name: &str) -> Option<PathBuf> {
    let mut relative = PathBuf::new();
    for segment in name.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        let mut components = Path::new(segment).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(part)), None) => relative.push(part),
            _ => return None,
        }
    }
    if relative.as_os_str().is_empty() {
        None
    } else {
        Some(relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_first_root_wins() {
        let project = TempDir::new().unwrap();
        let extra = TempDir::new().unwrap();
        write(project.path(), "shared.sql", "project");
        write(extra.path(), "shared.sql", "extra");
        write(extra.path(), "only_extra.sql", "extra only");

        let loader = TemplateLoader::for_folder(project.path(), Some(extra.path()));
        assert_eq!(loader.load("shared.sql").unwrap().as_deref(), Some("project"));
        assert_eq!(
            loader.load("only_extra.sql").unwrap().as_deref(),
            Some("extra only")
        );
        assert_eq!(loader.load("missing.sql").unwrap(), None);
    }

    #[test]
    fn test_builtins_shadow_extra_dir() {
        let project = TempDir::new().unwrap();
        let extra = TempDir::new().unwrap();
        write(extra.path(), "sqlbucket.sql", "overridden");

        let loader = TemplateLoader::for_folder(project.path(), Some(extra.path()));
        let source = loader.load("sqlbucket.sql").unwrap().unwrap();
        assert!(source.contains("macro union_all"));
    }

    #[test]
    fn test_nested_and_unsafe_names() {
        let project = TempDir::new().unwrap();
        write(project.path(), "folder1/query_three.sql", "bar");

        let loader = TemplateLoader::for_folder(project.path(), None);
        assert_eq!(
            loader.load("folder1/query_three.sql").unwrap().as_deref(),
            Some("bar")
        );
        assert_eq!(loader.load("../secret.sql").unwrap(), None);
        assert_eq!(loader.load("/etc/passwd").unwrap(), None);
    }

    #[test]
    fn test_list_templates_sorted_relative() {
        let project = TempDir::new().unwrap();
        write(project.path(), "integrity1.sql", "bar");
        write(project.path(), "folder1/integrity2.sql", "foobar");
        write(project.path(), "notes.md", "ignored");
        write(project.path(), ".hidden.sql", "ignored");

        let loader = TemplateLoader::for_folder(project.path(), None);
        assert_eq!(
            loader.list_templates(SQL_EXTENSIONS).unwrap(),
            vec!["folder1/integrity2.sql", "integrity1.sql"]
        );
    }

    #[test]
    fn test_list_templates_missing_dir() {
        let project = TempDir::new().unwrap();
        let loader = TemplateLoader::for_folder(&project.path().join("integrity"), None);
        assert!(loader.list_templates(SQL_EXTENSIONS).unwrap().is_empty());
    }
}
