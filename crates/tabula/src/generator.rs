//! One completion call per attempt.

use crate::Prompt;
use std::time::Duration;
use tabula_core::GenerateRequest;
use tabula_error::{GenerationError, GenerationErrorKind, TabulaResult};
use tabula_interface::CompletionDriver;
use tracing::{debug, instrument};

/// Sends prompts to a completion driver on behalf of the orchestrator.
///
/// Never retries; a failure propagates unchanged to the caller.
#[derive(Debug, Clone)]
pub struct QueryGenerator<D> {
    driver: D,
    default_model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    timeout: Duration,
}

impl<D: CompletionDriver> QueryGenerator<D> {
    /// Generator using `default_model` when a request names none.
    pub fn new(driver: D, default_model: impl Into<String>) -> Self {
        Self {
            driver,
            default_model: default_model.into(),
            temperature: None,
            max_tokens: None,
            timeout: Duration::from_secs(90),
        }
    }

    /// Sampling temperature sent with every request.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Completion length cap sent with every request.
    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Deadline for one completion call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The underlying driver.
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Model used when a request names none.
    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// The selector if one was given, otherwise the default model.
    ///
    /// Blank selectors count as absent.
    pub fn resolve_model<'a>(&'a self, selector: Option<&'a str>) -> &'a str {
        selector
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(&self.default_model)
    }

    /// Complete `prompt` and return the raw text.
    #[instrument(
        skip(self, prompt, model),
        fields(provider = self.driver.provider_name(), model = tracing::field::Empty)
    )]
    pub async fn generate(&self, prompt: &Prompt, model: Option<&str>) -> TabulaResult<String> {
        let model = self.resolve_model(model);
        tracing::Span::current().record("model", model);

        let request = GenerateRequest::builder()
            .messages(prompt.to_messages())
            .model(Some(model.to_string()))
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .build()
            .map_err(|e| GenerationError::new(GenerationErrorKind::InvalidRequest(e.to_string())))?;

        let response = tokio::time::timeout(self.timeout, self.driver.generate(&request))
            .await
            .map_err(|_| GenerationError::new(GenerationErrorKind::Timeout(self.timeout.as_secs())))??;

        if let Some(usage) = response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                served_by = response.model.as_deref().unwrap_or(model),
                "Token usage"
            );
        }
        Ok(response.text)
    }
}
