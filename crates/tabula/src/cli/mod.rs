//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the tabula binary.

mod commands;
mod query;
mod schema;
mod serve;

pub use commands::{Cli, Commands};
pub use query::run_query;
pub use schema::show_schema;
pub use serve::run_server;
