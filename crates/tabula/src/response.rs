//! The outbound payload.

use serde::{Deserialize, Serialize};
use tabula_core::QueryResult;

/// Text returned for every failure, whatever its cause.
pub const GENERIC_FAILURE_MESSAGE: &str = "Error generating and executing query.";

/// `{"result": [...rows]}` on success, `{"result": "<message>"}` on failure.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabula::QueryResponse;
///
/// let failure = QueryResponse::failure();
/// assert_eq!(
///     serde_json::to_value(&failure).unwrap(),
///     json!({"result": "Error generating and executing query."})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Rows or the failure message
    pub result: ResultPayload,
}

/// Either the rows of a successful query or a failure message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultPayload {
    /// Rows of the successful attempt
    Rows(QueryResult),
    /// Failure text
    Message(String),
}

impl QueryResponse {
    /// Successful payload.
    pub fn rows(rows: QueryResult) -> Self {
        Self {
            result: ResultPayload::Rows(rows),
        }
    }

    /// The uniform failure payload.
    pub fn failure() -> Self {
        Self {
            result: ResultPayload::Message(GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Whether this payload carries rows.
    pub fn is_success(&self) -> bool {
        matches!(self.result, ResultPayload::Rows(_))
    }
}

impl From<QueryResult> for QueryResponse {
    fn from(rows: QueryResult) -> Self {
        Self::rows(rows)
    }
}
