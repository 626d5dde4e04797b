//! Process-wide registries and project loading

use crate::error::ProjectResult;
use crate::project::Project;
use crate::scaffold::{validate_project_name, write_template};
use minijinja::functions::Function;
use minijinja::value::{FunctionArgs, FunctionResult};
use sb_core::{BucketConfig, ContextBuilder, CoreError, FunctionRegistry, Variables};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Entry point holding the connections, environment and helper functions
/// shared by every project in one projects folder.
///
/// ```no_run
/// use sb_project::SqlBucket;
///
/// let mut bucket = SqlBucket::new("projects")
///     .with_connection("warehouse", "duckdb://warehouse.duckdb")
///     .with_env_name(Some("dev".to_string()));
/// bucket.register_function("nrange", |a: i64, b: i64| (a..b).collect::<Vec<_>>());
///
/// let project = bucket
///     .load_project("daily_events", "warehouse", &Default::default())
///     .unwrap();
/// let configuration = project.configure(None).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SqlBucket {
    projects_path: PathBuf,
    macro_path: Option<PathBuf>,
    connections: BTreeMap<String, String>,
    connection_variables: BTreeMap<String, Variables>,
    env_name: Option<String>,
    env_variables: Variables,
    functions: FunctionRegistry,
}

impl SqlBucket {
    /// Bucket over `projects_folder` with empty registries
    pub fn new(projects_folder: impl Into<PathBuf>) -> Self {
        Self {
            projects_path: projects_folder.into(),
            macro_path: None,
            connections: BTreeMap::new(),
            connection_variables: BTreeMap::new(),
            env_name: None,
            env_variables: Variables::new(),
            functions: FunctionRegistry::new(),
        }
    }

    /// Bucket from a loaded `sqlbucket.yml`; `SQLBUCKET_ENV` overrides the
    /// configured environment name
    pub fn from_config(config: &BucketConfig) -> Self {
        Self {
            projects_path: config.projects_folder.clone(),
            macro_path: config.macro_folder.clone(),
            connections: config.connections.clone(),
            connection_variables: config.connection_variables.clone(),
            env_name: config.resolve_env_name(),
            env_variables: config.env_variables.clone(),
            functions: FunctionRegistry::new(),
        }
    }

    pub fn with_macro_folder(mut self, path: Option<PathBuf>) -> Self {
        self.macro_path = path;
        self
    }

    pub fn with_connection(mut self, name: impl Into<String>, url: impl Into<String>) -> Self {
        self.connections.insert(name.into(), url.into());
        self
    }

    pub fn with_connections(mut self, connections: BTreeMap<String, String>) -> Self {
        self.connections.extend(connections);
        self
    }

    pub fn with_connection_variables(mut self, variables: BTreeMap<String, Variables>) -> Self {
        self.connection_variables = variables;
        self
    }

    pub fn with_env_name(mut self, env_name: Option<String>) -> Self {
        self.env_name = env_name;
        self
    }

    pub fn with_env_variables(mut self, variables: Variables) -> Self {
        self.env_variables = variables;
        self
    }

    pub fn with_functions(mut self, functions: FunctionRegistry) -> Self {
        self.functions.extend(&functions);
        self
    }

    /// Register a helper callable from templates as `f.<name>(...)`.
    ///
    /// Projects loaded afterwards see it; the last registration of a name wins.
    pub fn register_function<F, Rv, Args>(&mut self, name: &str, f: F)
    where
        F: Function<Rv, Args>,
        Rv: FunctionResult,
        Args: for<'a> FunctionArgs<'a>,
    {
        self.functions.register(name, f);
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    pub fn projects_path(&self) -> &Path {
        &self.projects_path
    }

    pub fn macro_path(&self) -> Option<&Path> {
        self.macro_path.as_deref()
    }

    pub fn env_name(&self) -> Option<&str> {
        self.env_name.as_deref()
    }

    /// Registered connection names, sorted
    pub fn connection_names(&self) -> Vec<&str> {
        self.connections.keys().map(String::as_str).collect()
    }

    /// Whether `name` is registered or set as a process environment variable
    pub fn connection_exists(&self, name: &str) -> bool {
        self.connection_url(name).is_ok()
    }

    /// URL of connection `name`: the registry first, then the process
    /// environment variable of that name
    pub fn connection_url(&self, name: &str) -> Result<String, CoreError> {
        if let Some(url) = self.connections.get(name) {
            return Ok(url.clone());
        }
        std::env::var(name)
            .ok()
            .filter(|url| !url.is_empty())
            .ok_or_else(|| CoreError::ConnectionNotFound {
                name: name.to_string(),
            })
    }

    /// Load `project_name` for `connection_name` with caller `variables`.
    ///
    /// Fails when the connection is unknown, the project directory is
    /// missing, or a caller variable uses a reserved name.
    pub fn load_project(
        &self,
        project_name: &str,
        connection_name: &str,
        variables: &Variables,
    ) -> ProjectResult<Project> {
        let connection_url = self.connection_url(connection_name)?;

        let project_path = self.projects_path.join(project_name);
        if project_name.is_empty() || !project_path.is_dir() {
            return Err(CoreError::ProjectNotFound {
                name: project_name.to_string(),
            }
            .into());
        }

        let context = ContextBuilder::new(connection_name)
            .environment(self.env_name.as_deref())
            .connection_variables(&self.connection_variables)
            .environment_variables(&self.env_variables)
            .functions(&self.functions)
            .caller_variables(variables)
            .build()?;

        log::debug!(
            "Loading project '{}' for connection '{}' with {}",
            project_name,
            connection_name,
            context
        );
        Project::new(
            &project_path,
            connection_url,
            context,
            self.macro_path.clone(),
        )
    }

    /// Scaffold a new project with sample queries and integrity checks.
    ///
    /// Returns the new project directory.
    pub fn create_project(&self, project_name: &str) -> ProjectResult<PathBuf> {
        validate_project_name(project_name)?;
        let project_path = self.projects_path.join(project_name);
        if project_path.exists() {
            return Err(CoreError::ProjectAlreadyExists {
                name: project_name.to_string(),
            }
            .into());
        }
        write_template(&project_path)?;
        log::info!("Project \"{}\" successfully created!", project_name);
        Ok(project_path)
    }
}

#[cfg(test)]
#[path = "bucket_test.rs"]
mod tests;
