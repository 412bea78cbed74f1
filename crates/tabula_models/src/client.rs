use crate::{convert, ChatCompletionRequest, ChatCompletionResponse, ClientConfig};
use async_trait::async_trait;
use std::time::Duration;
use tabula_core::{GenerateRequest, GenerateResponse};
use tabula_error::{GenerationError, GenerationErrorKind, TabulaResult};
use tabula_interface::CompletionDriver;
use tracing::instrument;

/// Client for an OpenAI-compatible chat completions endpoint
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl OpenAiClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Fails when the underlying HTTP client cannot be constructed (for
    /// example when no TLS backend is available).
    #[instrument(skip(config), fields(base_url = %config.base_url()))]
    pub fn new(config: ClientConfig) -> Result<Self, GenerationError> {
        tracing::debug!("Creating completion client");
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(*config.request_timeout_secs()))
            .build()
            .map_err(|e| {
                GenerationError::new(GenerationErrorKind::Http(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        Ok(Self { config, client })
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send a chat completion request
    #[instrument(skip(self, request), fields(model = %request.model))]
    pub async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, GenerationError> {
        let url = self.config.completions_url();
        tracing::debug!("Sending chat completion request to {}", url);

        let mut req = self.client.post(&url).json(&request);
        if let Some(api_key) = self.config.api_key() {
            req = req.bearer_auth(api_key);
        }

        let response = req.send().await.map_err(|e| {
            tracing::error!("Request failed: {}", e);
            if e.is_timeout() {
                GenerationError::new(GenerationErrorKind::Timeout(
                    *self.config.request_timeout_secs(),
                ))
            } else {
                GenerationError::new(GenerationErrorKind::Http(format!("Request failed: {}", e)))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) if !body.trim().is_empty() => body,
                _ => status.canonical_reason().unwrap_or("unknown").to_string(),
            };
            tracing::error!(status = status.as_u16(), "Completion service returned error");
            return Err(GenerationError::new(GenerationErrorKind::Api {
                status: status.as_u16(),
                message,
            }));
        }

        let result = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse response: {}", e);
            GenerationError::new(GenerationErrorKind::Deserialization(format!(
                "Failed to parse response: {}",
                e
            )))
        })?;

        tracing::debug!("Chat completion successful");
        Ok(result)
    }
}

#[async_trait]
impl CompletionDriver for OpenAiClient {
    #[instrument(skip(self, req), fields(provider = "openai", model = ?req.model()))]
    async fn generate(&self, req: &GenerateRequest) -> TabulaResult<GenerateResponse> {
        let chat_request = convert::to_chat_request(req)?;
        let chat_response = self.chat_completion(chat_request).await?;
        let response = convert::from_chat_response(chat_response)?;
        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
