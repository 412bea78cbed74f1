//! Completion service error types.

/// Failures talking to the language-model completion service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The HTTP request could not be sent or completed
    #[display("HTTP request failed: {}", _0)]
    Http(String),
    /// The service answered with a non-success status
    #[display("API error (status {}): {}", status, message)]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason phrase
        message: String,
    },
    /// The response body was not the expected shape
    #[display("Failed to deserialize response: {}", _0)]
    Deserialization(String),
    /// The service returned no usable text
    #[display("Completion returned no text")]
    EmptyResponse,
    /// The completion request could not be assembled
    #[display("Invalid completion request: {}", _0)]
    InvalidRequest(String),
    /// No model was named on the request
    #[display("No model specified for completion request")]
    MissingModel,
    /// The call did not finish within the configured deadline
    #[display("Completion timed out after {}s", _0)]
    Timeout(u64),
}

/// Completion error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The error kind
    pub kind: GenerationErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_error::{GenerationError, GenerationErrorKind};
    ///
    /// let err = GenerationError::new(GenerationErrorKind::Timeout(30));
    /// assert!(format!("{}", err).contains("timed out after 30s"));
    /// ```
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
