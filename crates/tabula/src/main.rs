//! Tabula CLI binary.
//!
//! This binary provides command-line access to Tabula's functionality:
//! - Answer a single task and print the JSON payload
//! - Print the schema of the configured database
//! - Serve the HTTP endpoint

use clap::Parser;
use std::process::ExitCode;
use tabula::{ObservabilityConfig, TabulaConfig, init_observability};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    use cli::{Cli, Commands, run_query, run_server, show_schema};

    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let mut observability = ObservabilityConfig::default().with_json_logs(cli.json_logs);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability(&observability).map_err(|e| anyhow::anyhow!(e))?;

    let config = TabulaConfig::load(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Query { user, task, model } => run_query(&config, user, task, model).await,
        Commands::Schema => {
            show_schema(&config)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Serve { bind } => {
            run_server(&config, bind).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
