//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand};
use sb_db::IsolationLevel;
use std::path::PathBuf;

/// SQLBucket - ordered SQL template projects with integrity checks
#[derive(Parser, Debug)]
#[command(name = "sqlbucket")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose output (SQL text and debug logs)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the bucket settings file [default: sqlbucket.yml]
    #[arg(short, long, global = true, env = "SQLBUCKET_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scaffold a new project in the projects folder
    CreateProject(CreateProjectArgs),

    /// Render and run the ETL steps of a project
    RunJob(RunJobArgs),

    /// Run the integrity checks of a project
    RunIntegrity(RunIntegrityArgs),
}

#[derive(Args, Debug)]
pub struct CreateProjectArgs {
    /// Name of the new project
    #[arg(short, long)]
    pub name: String,
}

#[derive(Args, Debug)]
pub struct RunJobArgs {
    /// Project to run
    #[arg(short, long)]
    pub name: String,

    /// Connection to run against (ignored with --all)
    #[arg(long, required_unless_present = "all")]
    pub db: Option<String>,

    /// Order group to run (grouped orders only)
    #[arg(short, long)]
    pub group: Option<String>,

    /// First step to run (1-based)
    #[arg(long, default_value_t = 1)]
    pub fstep: usize,

    /// Last step to run (1-based, inclusive)
    #[arg(long)]
    pub tstep: Option<usize>,

    /// Value of `from` (YYYY-MM-DD) [default: 4 days ago]
    #[arg(long = "from_date", alias = "from-date")]
    pub from_date: Option<String>,

    /// Value of `to` (YYYY-MM-DD) [default: today]
    #[arg(long = "to_date", alias = "to-date")]
    pub to_date: Option<String>,

    /// Set `from` to N days ago; overrides --from_date
    #[arg(long = "from_days", alias = "from-days")]
    pub from_days: Option<i64>,

    /// Set `to` to N days ago; overrides --to_date
    #[arg(long = "to_days", alias = "to-days")]
    pub to_days: Option<i64>,

    /// Only render the selected steps and log their SQL
    #[arg(short, long)]
    pub rendering: bool,

    /// Run once per registered connection
    #[arg(short, long)]
    pub all: bool,

    /// Comma-separated connections to exclude from --all
    #[arg(long, value_delimiter = ',', requires = "all")]
    pub edb: Vec<String>,

    /// Transaction isolation level for the session
    #[arg(long, value_parser = parse_isolation_level)]
    pub isolation: Option<IsolationLevel>,

    /// Extra caller variables as key=value
    #[arg(value_name = "KEY=VALUE")]
    pub variables: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RunIntegrityArgs {
    /// Project whose checks to run
    #[arg(short, long)]
    pub name: String,

    /// Connection to run against
    #[arg(long)]
    pub db: String,

    /// Only run checks whose path starts with this prefix
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Extra caller variables as key=value
    #[arg(value_name = "KEY=VALUE")]
    pub variables: Vec<String>,
}

fn parse_isolation_level(s: &str) -> Result<IsolationLevel, String> {
    s.parse::<IsolationLevel>().map_err(|e| e.to_string())
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
