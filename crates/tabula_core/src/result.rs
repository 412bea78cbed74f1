//! Query result rows.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One result row: column name → value, in select-list order.
pub type Row = Map<String, Value>;

/// Rows returned by executing a cleaned query.
///
/// Serializes as a bare JSON array of objects.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use tabula_core::QueryResult;
///
/// let result: QueryResult = serde_json::from_value(json!([{"email": "a@x.com"}])).unwrap();
/// assert_eq!(result.len(), 1);
/// assert_eq!(serde_json::to_value(&result).unwrap(), json!([{"email": "a@x.com"}]));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResult(Vec<Row>);

impl QueryResult {
    /// Wrap already-materialized rows.
    pub fn new(rows: Vec<Row>) -> Self {
        Self(rows)
    }

    /// Borrow the rows.
    pub fn rows(&self) -> &[Row] {
        &self.0
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the statement produced no rows.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Take the rows.
    pub fn into_rows(self) -> Vec<Row> {
        self.0
    }
}

impl FromIterator<Row> for QueryResult {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for QueryResult {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
