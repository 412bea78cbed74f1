//! Request and response types for the completion service.

use crate::Message;
use serde::{Deserialize, Serialize};

/// A completion request.
///
/// # Examples
///
/// ```
/// use tabula_core::{GenerateRequest, Message};
///
/// let request = GenerateRequest::builder()
///     .messages(vec![Message::system("You write SQL."), Message::user("count users")])
///     .model(Some("gpt-35-turbo".to_string()))
///     .build()
///     .unwrap();
///
/// assert_eq!(request.messages().len(), 2);
/// assert_eq!(request.temperature(), &None);
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Default,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// The conversation messages to send
    messages: Vec<Message>,
    /// Maximum number of tokens to generate
    #[builder(default)]
    max_tokens: Option<u32>,
    /// Sampling temperature
    #[builder(default)]
    temperature: Option<f32>,
    /// Model identifier to use
    #[builder(default)]
    model: Option<String>,
}

impl GenerateRequest {
    /// Creates a new request builder.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}

/// Token accounting reported by the completion service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
}

/// The text the model produced.
///
/// # Examples
///
/// ```
/// use tabula_core::GenerateResponse;
///
/// let response = GenerateResponse::new("```sql\nSELECT 1;\n```");
/// assert!(response.text.starts_with("```sql"));
/// assert!(response.usage.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// Generated text, possibly prose around a fenced block
    pub text: String,
    /// Model that served the request, when reported
    pub model: Option<String>,
    /// Token usage, when reported
    pub usage: Option<TokenUsage>,
}

impl GenerateResponse {
    /// A response carrying only text.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            model: None,
            usage: None,
        }
    }
}
