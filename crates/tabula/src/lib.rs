//! Tabula: answer natural-language questions with SQL.
//!
//! Given a task such as "list all user emails", Tabula reflects the schema of
//! the configured database, asks a language model for a query consistent with
//! that schema, extracts the statement from the model's fenced ```` ```sql ````
//! block, executes it, and returns the rows. Generation, extraction and
//! execution are retried as one unit up to a fixed number of attempts.
//!
//! # Pipeline
//!
//! 1. [`Orchestrator`] acquires a connection through a
//!    [`Connector`](tabula_interface::Connector) and fetches the schema.
//! 2. [`PromptBuilder`] renders the schema (with `[]{}` stripped) and the task
//!    into a system/user message pair.
//! 3. [`QueryGenerator`] sends the prompt to a
//!    [`CompletionDriver`](tabula_interface::CompletionDriver).
//! 4. [`extract_sql`] isolates the statement between the fences.
//! 5. The connection executes it on tokio's blocking pool; the guard
//!    releases the connection on every exit path.
//!
//! [`Orchestrator::handle`] is the only place errors become the uniform
//! `{"result": "Error generating and executing query."}` payload.
//!
//! # Backends
//!
//! The `local` (SQLite) mode is built in. The networked modes link a native
//! client library and are opt-in:
//!
//! ```text
//! cargo build --release --features mysql      # database.mode = "mysql"
//! cargo build --release --features postgres   # database.mode = "postgres"
//! cargo build --release --features all-backends
//! ```
//!
//! Selecting a mode whose feature was not compiled in fails at startup with a
//! [`ConfigError`](tabula_error::ConfigError) on `database.mode`.
//!
//! # Example
//!
//! ```rust,no_run
//! use tabula::{build_orchestrator, TabulaConfig};
//! use tabula_core::TaskRequest;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = TabulaConfig::load(None)?;
//! let orchestrator = build_orchestrator(&config)?;
//!
//! let request = TaskRequest::new("alice", None, "list all user emails");
//! let response = orchestrator.handle(&request).await;
//! println!("{}", serde_json::to_string(&response)?);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod app;
mod config;
mod extract;
mod generator;
mod observability;
mod orchestrator;
mod prompt;
mod response;
mod server;

pub use app::{build_orchestrator, DefaultOrchestrator};
pub use config::{ModelConfig, PipelineConfig, ServerSettings, TabulaConfig};
pub use extract::{extract_sql, CLOSING_FENCE, OPENING_FENCE};
pub use generator::QueryGenerator;
pub use observability::{init_observability, ObservabilityConfig};
pub use orchestrator::{AttemptOutcome, Orchestrator, Stage};
pub use prompt::{sanitize_schema, Prompt, PromptBuilder, SYSTEM_INSTRUCTION};
pub use response::{QueryResponse, ResultPayload, GENERIC_FAILURE_MESSAGE};
pub use server::{router, serve, ExecuteSqlBody, ExecuteSqlData, ACTOR_HEADER};

pub use tabula_error::{TabulaError, TabulaErrorKind, TabulaResult};
