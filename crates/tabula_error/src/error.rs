//! Top-level error wrapper types.

use crate::{ConfigError, DatabaseError, ExhaustedError, ExtractionError, GenerationError};

/// Every failure the pipeline can produce.
///
/// # Examples
///
/// ```
/// use tabula_error::{TabulaError, ExtractionError, ExtractionErrorKind};
///
/// let err: TabulaError = ExtractionError::new(ExtractionErrorKind::MissingOpeningFence).into();
/// assert!(format!("{}", err).contains("```sql"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum TabulaErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Connection, schema, or execution error
    #[from(DatabaseError)]
    Database(DatabaseError),
    /// Completion service error
    #[from(GenerationError)]
    Generation(GenerationError),
    /// Fenced block extraction error
    #[from(ExtractionError)]
    Extraction(ExtractionError),
    /// Retry budget exhausted
    #[from(ExhaustedError)]
    Exhausted(ExhaustedError),
}

/// Tabula error with kind discrimination.
///
/// # Examples
///
/// ```
/// use tabula_error::{TabulaResult, ConfigError};
///
/// fn load() -> TabulaResult<()> {
///     Err(ConfigError::for_setting("pipeline.max_attempts", "must be at least 1"))?
/// }
///
/// assert!(load().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Tabula Error: {}", _0)]
pub struct TabulaError(Box<TabulaErrorKind>);

impl TabulaError {
    /// Create a new error from a kind.
    pub fn new(kind: TabulaErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &TabulaErrorKind {
        &self.0
    }
}

impl<T> From<T> for TabulaError
where
    T: Into<TabulaErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Tabula operations.
pub type TabulaResult<T> = std::result::Result<T, TabulaError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DatabaseErrorKind, GenerationErrorKind};

    #[test]
    fn exhausted_keeps_last_error_as_source() {
        let last: TabulaError =
            DatabaseError::new(DatabaseErrorKind::Query("syntax error".into())).into();
        let err: TabulaError = ExhaustedError::new(3, last).into();

        let TabulaErrorKind::Exhausted(exhausted) = err.kind() else {
            panic!("expected exhausted, got {err}");
        };
        assert_eq!(exhausted.attempts, 3);
        assert!(format!("{err}").contains("All 3 attempts failed"));
        assert!(format!("{err}").contains("syntax error"));
        assert!(std::error::Error::source(exhausted).is_some());
    }

    #[test]
    fn location_points_at_construction_site() {
        let err = GenerationError::new(GenerationErrorKind::EmptyResponse);
        assert!(err.file.ends_with("error.rs"));
        assert!(err.line > 0);
    }
}
