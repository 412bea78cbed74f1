//! One-shot query command handler.

use std::process::ExitCode;
use tabula::{TabulaConfig, build_orchestrator};
use tabula_core::TaskRequest;

/// Run a single task and print the payload to stdout.
///
/// Exits with failure when the payload carries the generic error message.
pub async fn run_query(
    config: &TabulaConfig,
    user: String,
    task: String,
    model: Option<String>,
) -> anyhow::Result<ExitCode> {
    let orchestrator = build_orchestrator(config)?;
    let request = TaskRequest::new(user, model, task);

    let response = orchestrator.handle(&request).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
