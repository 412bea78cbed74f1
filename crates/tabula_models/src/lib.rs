//! Completion service clients for Tabula.
//!
//! Provides an OpenAI-compatible chat completions client implementing
//! [`CompletionDriver`](tabula_interface::CompletionDriver). Any service that
//! speaks `POST {base_url}/chat/completions` works: OpenAI, Azure OpenAI
//! deployments behind a compatible gateway, Groq, vLLM, llama.cpp server,
//! Ollama's OpenAI endpoint.
//!
//! # Example
//!
//! ```rust,no_run
//! use tabula_core::{GenerateRequest, Message};
//! use tabula_interface::CompletionDriver;
//! use tabula_models::{ClientConfig, OpenAiClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::builder()
//!     .base_url("https://api.openai.com/v1")
//!     .api_key(Some(std::env::var("OPENAI_API_KEY")?))
//!     .build()?;
//! let client = OpenAiClient::new(config)?;
//!
//! let request = GenerateRequest::builder()
//!     .messages(vec![Message::user("Say hello")])
//!     .model(Some("gpt-4o-mini".to_string()))
//!     .build()?;
//! let response = client.generate(&request).await?;
//! println!("{}", response.text);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod config;
mod convert;
mod request;
mod response;

pub use client::OpenAiClient;
pub use config::{ClientConfig, ClientConfigBuilder, ClientConfigBuilderError};
pub use convert::{from_chat_response, to_chat_request};
pub use request::{ChatCompletionRequest, ChatMessage};
pub use response::{ChatCompletionResponse, Choice, ChoiceMessage, Usage};
