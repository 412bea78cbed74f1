//! Wiring configuration into a ready orchestrator.

use crate::{Orchestrator, QueryGenerator, TabulaConfig};
use std::time::Duration;
use tabula_database::AnyConnector;
use tabula_error::{ConfigError, TabulaResult};
use tabula_models::{ClientConfig, OpenAiClient};
use tracing::instrument;

/// Orchestrator over the configured database and the OpenAI-compatible client.
pub type DefaultOrchestrator = Orchestrator<AnyConnector, OpenAiClient>;

/// Build the orchestrator described by `config`.
///
/// The database backend is selected here, once; no connection is opened
/// until a request arrives.
///
/// # Errors
///
/// Fails when the selected backend is not compiled in, its connection
/// settings are missing, or the HTTP client cannot be constructed.
#[instrument(skip(config), fields(mode = %config.database.mode, model = %config.model.default_model))]
pub fn build_orchestrator(config: &TabulaConfig) -> TabulaResult<DefaultOrchestrator> {
    let connector = AnyConnector::from_config(&config.database)?;

    let api_key = config
        .model
        .api_key
        .clone()
        .or_else(|| std::env::var("OPENAI_API_KEY").ok());
    let client_config = ClientConfig::builder()
        .base_url(config.model.base_url.clone())
        .api_key(api_key)
        .request_timeout_secs(config.model.request_timeout_secs)
        .build()
        .map_err(|e| ConfigError::new(format!("Invalid model configuration: {}", e)))?;
    let client = OpenAiClient::new(client_config)?;

    let generator = QueryGenerator::new(client, config.model.default_model.clone())
        .with_temperature(config.model.temperature)
        .with_max_tokens(config.model.max_tokens)
        .with_timeout(Duration::from_secs(config.pipeline.generation_timeout_secs));

    Ok(Orchestrator::new(
        connector,
        generator,
        config.pipeline.max_attempts,
    ))
}
