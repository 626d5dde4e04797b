//! Sequential ETL step execution

use crate::error::{RunnerError, RunnerResult};
use crate::range::StepRange;
use sb_core::RenderedConfiguration;
use sb_db::{connect, Database, IsolationLevel};
use std::time::{Duration, Instant};

/// One selected step with its rendered SQL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedStep<'a> {
    /// 1-based position in the full order
    pub position: usize,
    pub name: &'a str,
    pub sql: &'a str,
}

/// Timing of one executed step
#[derive(Debug, Clone)]
pub struct StepTiming {
    pub position: usize,
    pub name: String,
    pub duration: Duration,
}

/// Outcome of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub project_name: String,
    pub connection_name: String,
    pub steps: Vec<StepTiming>,
    pub duration: Duration,
}

/// Runs a rendered configuration step by step on one exclusive session.
///
/// The first failing step aborts the run; nothing is retried and nothing
/// is rolled back beyond what the isolation level implies.
#[derive(Debug)]
pub struct StepRunner {
    configuration: RenderedConfiguration,
    range: StepRange,
    verbose: bool,
    isolation_level: Option<IsolationLevel>,
}

impl StepRunner {
    /// Runner over 1-based steps `from_step..=to_step` (`None`: last step).
    ///
    /// Fails before anything runs when the range is invalid.
    pub fn new(
        configuration: RenderedConfiguration,
        from_step: usize,
        to_step: Option<usize>,
    ) -> RunnerResult<Self> {
        let range = StepRange::new(from_step, to_step, configuration.len())?;
        Ok(Self {
            configuration,
            range,
            verbose: false,
            isolation_level: None,
        })
    }

    /// Log each step's SQL before executing it
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn isolation_level(mut self, level: Option<IsolationLevel>) -> Self {
        self.isolation_level = level;
        self
    }

    pub fn range(&self) -> StepRange {
        self.range
    }

    pub fn configuration(&self) -> &RenderedConfiguration {
        &self.configuration
    }

    /// Selected steps with their rendered SQL, in run order
    pub fn selected_steps(&self) -> RunnerResult<Vec<RenderedStep<'_>>> {
        self.range
            .select(&self.configuration.order)
            .map(|(position, name)| {
                let sql = self
                    .configuration
                    .query(name)
                    .ok_or_else(|| RunnerError::MissingQuery {
                        step: name.to_string(),
                    })?;
                Ok(RenderedStep {
                    position,
                    name,
                    sql,
                })
            })
            .collect()
    }

    /// Render-only mode: log the selected steps' SQL without connecting
    pub fn render_queries(&self) -> RunnerResult<Vec<RenderedStep<'_>>> {
        let steps = self.selected_steps()?;
        for step in &steps {
            log::info!(
                "\n##### Query {}: {} #####\n\n{}\n",
                step.position,
                step.name,
                step.sql
            );
        }
        Ok(steps)
    }

    /// Open a fresh session for the configuration's URL and run on it
    pub async fn run_project(&self) -> RunnerResult<RunSummary> {
        let db = connect(&self.configuration.connection_url, self.isolation_level)?;
        self.run_with(db.as_ref()).await
    }

    /// Run the selected steps on an already opened session.
    ///
    /// The connection query runs first, then each step in order. The
    /// session is committed once the last step succeeded.
    pub async fn run_with(&self, db: &dyn Database) -> RunnerResult<RunSummary> {
        let steps = self.selected_steps()?;
        self.starting_logs(&steps);
        let start = Instant::now();

        if let Some(query) = &self.configuration.connection_query {
            log::info!("Running connection query: {}", query);
            db.execute_batch(query)
                .await
                .map_err(|source| RunnerError::ConnectionQueryFailed { source })?;
        }

        let mut timings = Vec::with_capacity(steps.len());
        for step in &steps {
            log::info!("Now running query {}: '{}'...", step.position, step.name);
            if self.verbose {
                log::info!("\n\n{}\n", step.sql);
            }

            let step_start = Instant::now();
            if step.sql.trim().is_empty() {
                log::warn!("Query '{}' rendered to empty SQL, skipping", step.name);
            } else {
                db.execute_batch(step.sql)
                    .await
                    .map_err(|source| RunnerError::StepFailed {
                        step: step.name.to_string(),
                        position: step.position,
                        source,
                    })?;
            }
            let elapsed = step_start.elapsed();
            log::info!("Query '{}' successfully executed in {:.3?}.", step.name, elapsed);

            timings.push(StepTiming {
                position: step.position,
                name: step.name.to_string(),
                duration: elapsed,
            });
        }

        db.commit().await?;

        let duration = start.elapsed();
        log::info!(
            "Project '{}' successfully completed for database '{}'",
            self.configuration.project_name,
            self.configuration.connection_name
        );
        log::info!("Project completed in {:.3?}", duration);

        Ok(RunSummary {
            project_name: self.configuration.project_name.clone(),
            connection_name: self.configuration.connection_name.clone(),
            steps: timings,
            duration,
        })
    }

    fn starting_logs(&self, steps: &[RenderedStep<'_>]) {
        log::info!(
            "Starting project {} for connection {}",
            self.configuration.project_name.to_uppercase(),
            self.configuration.connection_name.to_uppercase()
        );
        log::info!("Variables: {}", self.configuration.context);
        let names: Vec<&str> = steps.iter().map(|s| s.name).collect();
        log::info!(
            "Running the following queries:\n\t{}",
            names.join("\n\t")
        );
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod tests;
