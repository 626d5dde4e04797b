//! One loaded project: its config, merged context and target connection

use crate::error::ProjectResult;
use sb_core::{Context, ContextMerger, ProjectConfig, RenderedConfiguration, RenderedQueries};
use sb_db::IsolationLevel;
use sb_integrity::IntegrityChecker;
use sb_jinja::JinjaEnvironment;
use sb_runner::{RunSummary, StepRunner};
use std::path::{Path, PathBuf};

/// Folder holding ETL step templates
pub const QUERIES_FOLDER: &str = "queries";
/// Folder holding integrity check templates
pub const INTEGRITY_FOLDER: &str = "integrity";

/// Options for one ETL run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub group: Option<String>,
    /// 1-based first step
    pub from_step: usize,
    /// 1-based last step, `None` for the last one
    pub to_step: Option<usize>,
    pub verbose: bool,
    pub isolation_level: Option<IsolationLevel>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            group: None,
            from_step: 1,
            to_step: None,
            verbose: false,
            isolation_level: None,
        }
    }
}

/// A project ready to be rendered or run against one connection.
///
/// The config is read from disk when the project is created, so edits
/// between two loads are picked up. The context is merged once and never
/// changes afterwards.
#[derive(Debug)]
pub struct Project {
    path: PathBuf,
    name: String,
    config: ProjectConfig,
    context: Context,
    connection_url: String,
    macro_path: Option<PathBuf>,
}

impl Project {
    /// Load the project at `project_path` and merge its config overrides
    /// into `context`
    pub fn new(
        project_path: &Path,
        connection_url: impl Into<String>,
        context: Context,
        macro_path: Option<PathBuf>,
    ) -> ProjectResult<Self> {
        let config = ProjectConfig::load_from_dir(project_path)?;
        let context = ContextMerger::new(context, &config).merge();
        let name = project_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            path: project_path.to_path_buf(),
            name,
            config,
            context,
            connection_url: connection_url.into(),
            macro_path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The merged context templates are rendered with
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn connection_url(&self) -> &str {
        &self.connection_url
    }

    pub fn connection_name(&self) -> &str {
        self.context.connection_name()
    }

    pub fn environment_name(&self) -> Option<&str> {
        self.context.environment_name()
    }

    /// Render the ETL steps of `group`.
    ///
    /// A flat `order` rejects any group; a grouped one defaults to `main`.
    pub fn configure(&self, group: Option<&str>) -> ProjectResult<RenderedConfiguration> {
        let order = self.config.order.resolve(group)?.to_vec();
        let env = self.jinja_env(QUERIES_FOLDER);
        self.render(env, order)
    }

    /// Render every integrity check found under `integrity/`, in path order
    pub fn configure_integrity(&self) -> ProjectResult<RenderedConfiguration> {
        let env = self.jinja_env(INTEGRITY_FOLDER);
        let order = env.list_templates()?;
        self.render(env, order)
    }

    /// Render the connection query template, if the config declares one.
    ///
    /// It always comes from `queries/`, also for integrity runs.
    pub fn connection_query(&self) -> ProjectResult<Option<String>> {
        let Some(template) = &self.config.connection_query else {
            return Ok(None);
        };
        let env = self.jinja_env(QUERIES_FOLDER);
        Ok(Some(env.render_template(template, &self.context)?))
    }

    /// Render and run the ETL steps on a fresh session
    pub async fn run(&self, options: &RunOptions) -> ProjectResult<RunSummary> {
        let configuration = self.configure(options.group.as_deref())?;
        let runner = StepRunner::new(configuration, options.from_step, options.to_step)?
            .verbose(options.verbose)
            .isolation_level(options.isolation_level);
        Ok(runner.run_project().await?)
    }

    /// Render-only mode: log the selected steps' SQL and return it,
    /// without connecting
    pub fn render_steps(
        &self,
        group: Option<&str>,
        from_step: usize,
        to_step: Option<usize>,
    ) -> ProjectResult<Vec<(String, String)>> {
        let configuration = self.configure(group)?;
        let runner = StepRunner::new(configuration, from_step, to_step)?;
        let steps = runner.render_queries()?;
        Ok(steps
            .into_iter()
            .map(|step| (step.name.to_string(), step.sql.to_string()))
            .collect())
    }

    /// Run the integrity checks whose identifier starts with `prefix` and
    /// return the number of failed or errored checks
    pub async fn run_integrity(&self, prefix: &str, verbose: bool) -> ProjectResult<usize> {
        let configuration = self.configure_integrity()?;
        let checker = IntegrityChecker::new(configuration)
            .prefix(prefix)
            .verbose(verbose);
        let (_, summary) = checker.run().await?;
        Ok(summary.error_count())
    }

    fn jinja_env(&self, folder: &str) -> JinjaEnvironment {
        JinjaEnvironment::for_folder(&self.path, folder, self.macro_path.as_deref())
    }

    fn render(
        &self,
        env: JinjaEnvironment,
        order: Vec<String>,
    ) -> ProjectResult<RenderedConfiguration> {
        let mut queries = RenderedQueries::new();
        for step in &order {
            let sql = env.render_template(step, &self.context)?;
            queries.insert(step.as_str(), sql);
        }

        Ok(RenderedConfiguration {
            order,
            queries,
            context: self.context.clone(),
            connection_url: self.connection_url.clone(),
            connection_name: self.connection_name().to_string(),
            project_name: self.name.clone(),
            connection_query: self.connection_query()?,
        })
    }
}

#[cfg(test)]
#[path = "project_test.rs"]
mod tests;
