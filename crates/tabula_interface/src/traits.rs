//! Capability traits for the completion service and database backends.

use async_trait::async_trait;
use tabula_core::{GenerateRequest, GenerateResponse, QueryResult, SchemaInfo, SqlDialect};
use tabula_error::{DatabaseResult, TabulaResult};

/// A language-model completion service: messages in, text out.
///
/// Implementations make exactly one upstream call per `generate` and do not
/// retry; retry policy belongs to the caller.
#[async_trait]
pub trait CompletionDriver: Send + Sync {
    /// Complete the conversation in `req`.
    async fn generate(&self, req: &GenerateRequest) -> TabulaResult<GenerateResponse>;

    /// Provider name (e.g., "openai", "mock").
    fn provider_name(&self) -> &'static str;
}

/// An open, exclusively-owned database connection.
///
/// Both the embedded and the networked backends implement this same contract.
pub trait DatabaseConnection: Send {
    /// Dialect of the connected database.
    fn dialect(&self) -> SqlDialect;

    /// Snapshot the tables and columns of the connected database.
    fn fetch_schema_info(&mut self) -> DatabaseResult<SchemaInfo>;

    /// Run `sql` and return every row it produces.
    fn execute_query(&mut self, sql: &str) -> DatabaseResult<QueryResult>;

    /// Release the connection. Later calls on a closed connection fail with
    /// a connection error.
    fn close(&mut self) -> DatabaseResult<()>;
}

/// Opens connections for a database selected once at startup.
pub trait Connector: Send + Sync {
    /// Connection type produced by this connector. Connections are moved to
    /// worker threads, so they own their state.
    type Connection: DatabaseConnection + 'static;

    /// Dialect of the connections this connector opens.
    fn dialect(&self) -> SqlDialect;

    /// Acquire a fresh connection for one request.
    fn connect(&self) -> DatabaseResult<Self::Connection>;
}
