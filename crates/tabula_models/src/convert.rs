//! Conversion between tabula and chat completion API types

use crate::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use tabula_core::{GenerateRequest, GenerateResponse, Role, TokenUsage};
use tabula_error::{GenerationError, GenerationErrorKind};

/// Convert a tabula GenerateRequest to a ChatCompletionRequest.
///
/// # Errors
///
/// Fails with [`GenerationErrorKind::MissingModel`] when the request names no
/// model.
#[tracing::instrument(skip(request))]
pub fn to_chat_request(request: &GenerateRequest) -> Result<ChatCompletionRequest, GenerationError> {
    let model = request
        .model()
        .clone()
        .ok_or_else(|| GenerationError::new(GenerationErrorKind::MissingModel))?;

    let messages = request
        .messages()
        .iter()
        .map(|m| ChatMessage::new(role_name(m.role), m.content.clone()))
        .collect();

    Ok(ChatCompletionRequest {
        model,
        messages,
        max_tokens: *request.max_tokens(),
        temperature: *request.temperature(),
    })
}

fn role_name(role: Role) -> &'static str {
    match role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
    }
}

/// Convert a ChatCompletionResponse to a GenerateResponse using the first choice.
///
/// # Errors
///
/// Fails with [`GenerationErrorKind::EmptyResponse`] when there is no choice or
/// its content is empty.
#[tracing::instrument(skip(response))]
pub fn from_chat_response(response: ChatCompletionResponse) -> Result<GenerateResponse, GenerationError> {
    let text = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| GenerationError::new(GenerationErrorKind::EmptyResponse))?;

    Ok(GenerateResponse {
        text,
        model: response.model,
        usage: response.usage.map(|usage| TokenUsage {
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        }),
    })
}
