//! Mock completion driver for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tabula_core::{GenerateRequest, GenerateResponse, TokenUsage};
use tabula_error::{GenerationError, GenerationErrorKind, TabulaResult};
use tabula_interface::CompletionDriver;

/// A single scripted response (success or error).
#[derive(Debug, Clone)]
pub enum MockResponse {
    Text(String),
    Error(GenerationErrorKind),
}

/// Mock completion driver.
///
/// Plays back a sequence of responses; once the sequence runs out the last
/// entry repeats.
#[derive(Debug)]
pub struct MockDriver {
    responses: Vec<MockResponse>,
    delay: Option<Duration>,
    call_count: Arc<Mutex<usize>>,
    requests: Arc<Mutex<Vec<GenerateRequest>>>,
}

impl MockDriver {
    /// Always answer with `text`.
    pub fn new_text(text: impl Into<String>) -> Self {
        Self::new_sequence(vec![MockResponse::Text(text.into())])
    }

    /// Always fail with `error`.
    pub fn new_error(error: GenerationErrorKind) -> Self {
        Self::new_sequence(vec![MockResponse::Error(error)])
    }

    /// Play back `responses` in order.
    pub fn new_sequence(responses: Vec<MockResponse>) -> Self {
        assert!(!responses.is_empty(), "mock needs at least one response");
        Self {
            responses,
            delay: None,
            call_count: Arc::new(Mutex::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sleep before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of times generate() was called.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Model named on each request, in order.
    pub fn models(&self) -> Vec<Option<String>> {
        self.requests()
            .iter()
            .map(|request| request.model().clone())
            .collect()
    }

    fn next_response(&self, request: &GenerateRequest) -> MockResponse {
        self.requests.lock().unwrap().push(request.clone());
        let mut count = self.call_count.lock().unwrap();
        let index = (*count).min(self.responses.len() - 1);
        *count += 1;
        self.responses[index].clone()
    }
}

#[async_trait]
impl CompletionDriver for MockDriver {
    async fn generate(&self, request: &GenerateRequest) -> TabulaResult<GenerateResponse> {
        let response = self.next_response(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match response {
            MockResponse::Text(text) => Ok(GenerateResponse {
                text,
                model: request.model().clone(),
                usage: Some(TokenUsage {
                    prompt_tokens: 42,
                    completion_tokens: 7,
                }),
            }),
            MockResponse::Error(kind) => Err(GenerationError::new(kind).into()),
        }
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
