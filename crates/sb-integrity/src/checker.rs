//! Integrity run execution

use crate::check::{CheckStatus, IntegrityCheck};
use crate::error::{IntegrityError, IntegrityResult};
use sb_core::RenderedConfiguration;
use sb_db::{connect, Database};
use std::time::{Duration, Instant};

/// Result of a single integrity check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    /// Rows whose `passed` value was truthy
    pub passed_rows: usize,
    pub total_rows: usize,
    /// Database error message when the query itself failed
    pub error: Option<String>,
    pub duration: Duration,
}

/// Summary of an integrity run
#[derive(Debug, Clone)]
pub struct IntegritySummary {
    /// Checks attempted
    pub total: usize,

    /// Checks passed
    pub passed: usize,

    /// Checks whose rows did not all pass
    pub failed: usize,

    /// Checks whose query raised a database error
    pub errors: usize,

    /// Total execution time
    pub duration: Duration,
}

impl IntegritySummary {
    /// Create a summary from check results
    pub fn from_results(results: &[CheckResult], duration: Duration) -> Self {
        let count = |status: CheckStatus| results.iter().filter(|r| r.status == status).count();
        Self {
            total: results.len(),
            passed: count(CheckStatus::Success),
            failed: count(CheckStatus::Failed),
            errors: count(CheckStatus::Errored),
            duration,
        }
    }

    /// Failed plus errored checks; this is what the binary turns into an
    /// exit code
    pub fn error_count(&self) -> usize {
        self.failed + self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.error_count() == 0
    }

    /// Final status line of a run
    pub fn status_line(&self) -> String {
        if self.all_passed() {
            format!("All {} integrity checks passed", self.total)
        } else {
            format!(
                "Integrity partially passed: {} error(s) out of {} check(s)",
                self.error_count(),
                self.total
            )
        }
    }
}

/// Runs every integrity query of a configuration, tallying outcomes.
///
/// Unlike the ETL runner, a check whose query errors is counted and the
/// run moves on; only a missing `passed` column stops it.
#[derive(Debug)]
pub struct IntegrityChecker {
    configuration: RenderedConfiguration,
    prefix: String,
    verbose: bool,
}

impl IntegrityChecker {
    pub fn new(configuration: RenderedConfiguration) -> Self {
        Self {
            configuration,
            prefix: String::new(),
            verbose: false,
        }
    }

    /// Only run checks whose identifier starts with `prefix`
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Log each check's SQL before running it
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Open a fresh session for the configuration's URL and run on it
    pub async fn run(&self) -> IntegrityResult<(Vec<CheckResult>, IntegritySummary)> {
        let db = connect(&self.configuration.connection_url, None)?;
        self.run_with(db.as_ref()).await
    }

    /// Run the selected checks on an already opened session
    pub async fn run_with(
        &self,
        db: &dyn Database,
    ) -> IntegrityResult<(Vec<CheckResult>, IntegritySummary)> {
        let start = Instant::now();
        log::info!(
            "Running integrity checks of project {} for connection {}",
            self.configuration.project_name.to_uppercase(),
            self.configuration.connection_name.to_uppercase()
        );

        if let Some(query) = &self.configuration.connection_query {
            log::info!("Running connection query: {}", query);
            db.execute_batch(query).await?;
        }

        let mut results = Vec::new();
        for name in &self.configuration.order {
            if !name.starts_with(&self.prefix) {
                continue;
            }
            let result = self.run_check(db, name).await?;
            results.push(result);
        }

        let summary = IntegritySummary::from_results(&results, start.elapsed());
        log::info!("{}", summary.status_line());
        Ok((results, summary))
    }

    async fn run_check(&self, db: &dyn Database, name: &str) -> IntegrityResult<CheckResult> {
        let sql = self
            .configuration
            .query(name)
            .ok_or_else(|| IntegrityError::MissingQuery {
                step: name.to_string(),
            })?;

        log::info!("Running integrity check '{}'", name);
        if self.verbose {
            log::info!("\n\n{}\n", sql);
        }

        let start = Instant::now();
        let rows = match db.query(sql).await {
            Ok(rows) => rows,
            Err(e) => {
                log::error!("Integrity check '{}' errored: {}", name, e);
                return Ok(CheckResult {
                    name: name.to_string(),
                    status: CheckStatus::Errored,
                    passed_rows: 0,
                    total_rows: 0,
                    error: Some(e.to_string()),
                    duration: start.elapsed(),
                });
            }
        };

        let check = IntegrityCheck::new(name, rows);
        let status = check.log_summary()?;
        if status == CheckStatus::Failed {
            log::info!("Showing integrity rows:\n{}", check.format_rows());
        }

        Ok(CheckResult {
            name: name.to_string(),
            status,
            passed_rows: check.passed_count(),
            total_rows: check.rows.len(),
            error: None,
            duration: start.elapsed(),
        })
    }
}

#[cfg(test)]
#[path = "checker_test.rs"]
mod tests;
