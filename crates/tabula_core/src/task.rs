//! The inbound natural-language task.

use serde::{Deserialize, Serialize};

/// A validated request to answer `task` against the configured database.
///
/// Fields are read-only once constructed.
///
/// # Examples
///
/// ```
/// use tabula_core::TaskRequest;
///
/// let request = TaskRequest::new("alice", None, "list all user emails");
/// assert_eq!(request.actor(), "alice");
/// assert!(request.model().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_getters::Getters)]
pub struct TaskRequest {
    /// Authenticated identity of the caller
    actor: String,
    /// Optional model selector overriding the configured default
    model: Option<String>,
    /// Free-text description of what to query
    task: String,
}

impl TaskRequest {
    /// Create a request on behalf of `actor`.
    pub fn new(actor: impl Into<String>, model: Option<String>, task: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            model,
            task: task.into(),
        }
    }
}
