//! Connection settings for an OpenAI-compatible service.

use serde::{Deserialize, Serialize};

/// Where and how to reach the completion service.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ClientConfig {
    /// Base URL up to and including the API version, e.g. `https://api.openai.com/v1`
    base_url: String,
    /// Bearer token, if the service requires one
    #[builder(default)]
    api_key: Option<String>,
    /// Deadline for a single HTTP request
    #[builder(default = "60")]
    request_timeout_secs: u64,
}

impl ClientConfig {
    /// Creates a new config builder.
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}
