//! SQLBucket CLI - render and run ordered SQL template projects

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::common::ExitCode;
use commands::{create_project, run_integrity, run_job};

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);

    let result = match &cli.command {
        Commands::CreateProject(args) => create_project::execute(args, &cli.global).await,
        Commands::RunJob(args) => run_job::execute(args, &cli.global).await,
        Commands::RunIntegrity(args) => run_integrity::execute(args, &cli.global).await,
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => match err.downcast_ref::<ExitCode>() {
            Some(ExitCode(code)) => std::process::ExitCode::from(*code),
            None => {
                tracing::error!("{:#}", err);
                std::process::ExitCode::FAILURE
            }
        },
    }
}

/// Install the process-wide log sink. `RUST_LOG` wins over `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
