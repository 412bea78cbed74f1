//! Errors raised while pulling a SQL statement out of model output.

/// Why a fenced SQL block could not be extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExtractionErrorKind {
    /// No "```sql" marker in the text
    #[display("The opening '```sql' fence was not found")]
    MissingOpeningFence,
    /// An opening marker without a closing "```"
    #[display("The closing '```' fence was not found")]
    MissingClosingFence,
    /// Both fences present but nothing between them
    #[display("The fenced SQL block is empty")]
    EmptyQuery,
}

/// Extraction error with location tracking.
///
/// # Examples
///
/// ```
/// use tabula_error::{ExtractionError, ExtractionErrorKind};
///
/// let err = ExtractionError::new(ExtractionErrorKind::MissingClosingFence);
/// assert_eq!(err.kind, ExtractionErrorKind::MissingClosingFence);
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Extraction Error: {} at line {} in {}", kind, line, file)]
pub struct ExtractionError {
    /// The error kind
    pub kind: ExtractionErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl ExtractionError {
    /// Create a new ExtractionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExtractionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
