//! Fenced-block extraction from model output.

use tabula_error::{ExtractionError, ExtractionErrorKind};

/// Marker that opens the SQL block.
pub const OPENING_FENCE: &str = "```sql";
/// Marker that closes the SQL block.
pub const CLOSING_FENCE: &str = "```";

/// Isolate the statement inside the first ```` ```sql ```` fenced block.
///
/// Text before the opening fence and after the closing fence is discarded;
/// the statement is trimmed but otherwise returned as written. Only the first
/// block is considered.
///
/// # Errors
///
/// - [`ExtractionErrorKind::MissingOpeningFence`] when no ```` ```sql ```` marker exists
/// - [`ExtractionErrorKind::MissingClosingFence`] when the block is never closed
/// - [`ExtractionErrorKind::EmptyQuery`] when the block holds only whitespace
///
/// # Examples
///
/// ```
/// use tabula::extract_sql;
///
/// let text = "Sure! ```sql\nSELECT email FROM users;\n``` ";
/// assert_eq!(extract_sql(text).unwrap(), "SELECT email FROM users;");
/// ```
pub fn extract_sql(text: &str) -> Result<String, ExtractionError> {
    let start = text
        .find(OPENING_FENCE)
        .ok_or_else(|| ExtractionError::new(ExtractionErrorKind::MissingOpeningFence))?
        + OPENING_FENCE.len();
    let remainder = &text[start..];
    let end = remainder
        .find(CLOSING_FENCE)
        .ok_or_else(|| ExtractionError::new(ExtractionErrorKind::MissingClosingFence))?;

    let query = remainder[..end].trim();
    if query.is_empty() {
        return Err(ExtractionError::new(ExtractionErrorKind::EmptyQuery));
    }
    Ok(query.to_string())
}
