//! Tests for chat completion type conversion.

use tabula_core::{GenerateRequest, Message};
use tabula_error::GenerationErrorKind;
use tabula_models::{
    from_chat_response, to_chat_request, ChatCompletionResponse, ClientConfig,
};

#[test]
fn test_request_conversion_keeps_roles_and_order() -> anyhow::Result<()> {
    let request = GenerateRequest::builder()
        .messages(vec![
            Message::system("You write SQL."),
            Message::user("count users"),
        ])
        .model(Some("gpt-35-turbo".to_string()))
        .temperature(Some(0.0))
        .build()?;

    let chat = to_chat_request(&request)?;
    assert_eq!(chat.model, "gpt-35-turbo");
    assert_eq!(chat.messages.len(), 2);
    assert_eq!(chat.messages[0].role, "system");
    assert_eq!(chat.messages[0].content, "You write SQL.");
    assert_eq!(chat.messages[1].role, "user");
    assert_eq!(chat.temperature, Some(0.0));
    assert_eq!(chat.max_tokens, None);
    Ok(())
}

#[test]
fn test_request_serialization_omits_unset_fields() -> anyhow::Result<()> {
    let request = GenerateRequest::builder()
        .messages(vec![Message::user("hi")])
        .model(Some("m".to_string()))
        .build()?;

    let json = serde_json::to_value(to_chat_request(&request)?)?;
    assert!(json.get("max_tokens").is_none());
    assert!(json.get("temperature").is_none());
    assert_eq!(json["messages"][0]["role"], "user");
    Ok(())
}

#[test]
fn test_request_without_model_is_rejected() -> anyhow::Result<()> {
    let request = GenerateRequest::builder()
        .messages(vec![Message::user("hi")])
        .build()?;

    let err = to_chat_request(&request).unwrap_err();
    assert_eq!(err.kind, GenerationErrorKind::MissingModel);
    Ok(())
}

#[test]
fn test_response_conversion_takes_first_choice() -> anyhow::Result<()> {
    let body = serde_json::json!({
        "id": "chatcmpl-1",
        "model": "gpt-35-turbo",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": "```sql\nSELECT 1;\n```"}, "finish_reason": "stop"},
            {"index": 1, "message": {"role": "assistant", "content": "ignored"}, "finish_reason": "stop"}
        ],
        "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
    });
    let response: ChatCompletionResponse = serde_json::from_value(body)?;

    let converted = from_chat_response(response)?;
    assert_eq!(converted.text, "```sql\nSELECT 1;\n```");
    assert_eq!(converted.model.as_deref(), Some("gpt-35-turbo"));
    let usage = converted.usage.expect("usage reported");
    assert_eq!(usage.prompt_tokens, 12);
    assert_eq!(usage.completion_tokens, 7);
    Ok(())
}

#[test]
fn test_response_with_minimal_fields_parses() -> anyhow::Result<()> {
    let body = serde_json::json!({
        "choices": [{"message": {"content": "SELECT 1"}}]
    });
    let response: ChatCompletionResponse = serde_json::from_value(body)?;

    let converted = from_chat_response(response)?;
    assert_eq!(converted.text, "SELECT 1");
    assert!(converted.model.is_none());
    assert!(converted.usage.is_none());
    Ok(())
}

#[test]
fn test_empty_responses_are_errors() -> anyhow::Result<()> {
    for body in [
        serde_json::json!({"choices": []}),
        serde_json::json!({"choices": [{"message": {"role": "assistant", "content": null}}]}),
        serde_json::json!({"choices": [{"message": {"role": "assistant", "content": "  \n"}}]}),
    ] {
        let response: ChatCompletionResponse = serde_json::from_value(body)?;
        let err = from_chat_response(response).unwrap_err();
        assert_eq!(err.kind, GenerationErrorKind::EmptyResponse);
    }
    Ok(())
}

#[test]
fn test_completions_url_tolerates_trailing_slash() -> anyhow::Result<()> {
    let config = ClientConfig::builder()
        .base_url("http://localhost:8000/v1/")
        .build()?;
    assert_eq!(
        config.completions_url(),
        "http://localhost:8000/v1/chat/completions"
    );
    assert_eq!(config.api_key(), &None);
    assert_eq!(*config.request_timeout_secs(), 60);
    Ok(())
}
