//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Database modes and the cargo features they need.
const BACKENDS_HELP: &str = "\
Database modes (set database.mode in tabula.toml or TABULA__DATABASE__MODE):
  local     embedded SQLite file, always built in
  mysql     MySQL server, requires building with `--features mysql` (links libmysqlclient)
  postgres  PostgreSQL server, requires building with `--features postgres` (links libpq)

A binary built without a mode's feature refuses that mode at startup.";

/// Tabula - answer natural-language questions with SQL against a known schema
#[derive(Parser, Debug)]
#[command(name = "tabula")]
#[command(about = "Answer natural-language questions with SQL against a known schema", long_about = None)]
#[command(version)]
#[command(after_help = BACKENDS_HELP)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file layered over the defaults
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate and execute a query for one task, printing the JSON payload
    Query {
        /// Identity of the caller, recorded in logs
        #[arg(long)]
        user: String,

        /// Natural-language description of what to query
        #[arg(long)]
        task: String,

        /// Model to use instead of the configured default
        #[arg(long)]
        model: Option<String>,
    },

    /// Print the schema of the configured database
    Schema,

    /// Serve the HTTP endpoint
    Serve {
        /// Listen address, overriding server.bind
        #[arg(long)]
        bind: Option<String>,
    },
}
