//! Request sequencing and the bounded retry loop.

use crate::{extract_sql, Prompt, PromptBuilder, QueryGenerator, QueryResponse};
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, PoisonError};
use tabula_core::{QueryResult, TaskRequest};
use tabula_error::{
    DatabaseError, DatabaseErrorKind, DatabaseResult, ExhaustedError, TabulaError, TabulaResult,
};
use tabula_interface::{CompletionDriver, ConnectionGuard, Connector, DatabaseConnection};
use tracing::{debug, error, info, instrument, warn};

/// Pipeline stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum Stage {
    /// Acquiring the connection
    #[display("connect")]
    Connect,
    /// Reflecting the schema
    #[display("schema")]
    Schema,
    /// Calling the completion service
    #[display("generate")]
    Generate,
    /// Pulling the statement out of the model output
    #[display("extract")]
    Extract,
    /// Running the statement
    #[display("execute")]
    Execute,
}

/// How the retry loop ended.
#[derive(Debug)]
pub enum AttemptOutcome<T> {
    /// An attempt produced a value
    Succeeded {
        /// The value of the successful attempt
        value: T,
        /// 1-indexed ordinal of that attempt
        attempts: u32,
    },
    /// Every attempt failed
    Exhausted {
        /// Attempts made
        attempts: u32,
        /// Error from the final attempt
        last_error: TabulaError,
    },
}

impl<T> AttemptOutcome<T> {
    /// Number of attempts made.
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Succeeded { attempts, .. } | Self::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Convert into a result, wrapping the last error as exhaustion.
    pub fn into_result(self) -> TabulaResult<T> {
        match self {
            Self::Succeeded { value, .. } => Ok(value),
            Self::Exhausted {
                attempts,
                last_error,
            } => Err(ExhaustedError::new(attempts, last_error).into()),
        }
    }
}

/// Run synchronous database work on tokio's blocking pool.
async fn on_blocking_pool<T, F>(work: F) -> DatabaseResult<T>
where
    F: FnOnce() -> DatabaseResult<T> + Send + 'static,
    T: Send + 'static,
{
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(work))
        .await
        .map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Connection(format!(
                "Database task failed: {}",
                e
            )))
        })?
}

/// A request's connection, lent to one blocking-pool task at a time.
///
/// The guard closes the connection when the last handle goes away, including
/// when a task is still running after the request was dropped.
struct SharedConnection<Conn: DatabaseConnection>(Arc<Mutex<ConnectionGuard<Conn>>>);

impl<Conn> SharedConnection<Conn>
where
    Conn: DatabaseConnection + 'static,
{
    fn new(connection: Conn) -> Self {
        Self(Arc::new(Mutex::new(ConnectionGuard::new(connection))))
    }

    async fn run<T, F>(&self, op: F) -> DatabaseResult<T>
    where
        F: FnOnce(&mut Conn) -> DatabaseResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let shared = Arc::clone(&self.0);
        on_blocking_pool(move || {
            let mut guard = shared.lock().map_err(|_| {
                DatabaseError::new(DatabaseErrorKind::Connection(
                    "Database connection lost to an earlier failure".to_string(),
                ))
            })?;
            op(&mut **guard)
        })
        .await
    }

    async fn release(self) {
        let released = match Arc::try_unwrap(self.0) {
            Ok(mutex) => {
                let guard = mutex.into_inner().unwrap_or_else(PoisonError::into_inner);
                on_blocking_pool(move || guard.release()).await
            }
            // A detached task still holds it and closes it on drop.
            Err(_) => Ok(()),
        };
        if let Err(e) = released {
            warn!(error = %e, "Failed to close database connection");
        }
    }
}

struct StageFailure {
    stage: Stage,
    error: TabulaError,
}

impl StageFailure {
    fn new(stage: Stage, error: impl Into<TabulaError>) -> Self {
        Self {
            stage,
            error: error.into(),
        }
    }
}

/// Runs one task end to end: connect, reflect, then generate, extract and
/// execute with bounded retry.
///
/// Generic over the database [`Connector`] and the [`CompletionDriver`]; the
/// concrete backend is fixed when the orchestrator is built.
///
/// Connector and connection calls are synchronous; they run on tokio's
/// blocking pool so a slow statement holds up only its own request.
#[derive(Debug)]
pub struct Orchestrator<C, D> {
    connector: Arc<C>,
    generator: QueryGenerator<D>,
    prompts: PromptBuilder,
    max_attempts: NonZeroU32,
}

impl<C, D> Orchestrator<C, D>
where
    C: Connector + 'static,
    D: CompletionDriver,
{
    /// Orchestrator retrying each task up to `max_attempts` times.
    pub fn new(connector: C, generator: QueryGenerator<D>, max_attempts: NonZeroU32) -> Self {
        let prompts = PromptBuilder::new().with_dialect(connector.dialect());
        Self {
            connector: Arc::new(connector),
            generator,
            prompts,
            max_attempts,
        }
    }

    /// Attempt budget per task.
    pub fn max_attempts(&self) -> NonZeroU32 {
        self.max_attempts
    }

    /// The database connector.
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// The query generator.
    pub fn generator(&self) -> &QueryGenerator<D> {
        &self.generator
    }

    /// Run `request` and shape the outcome into the response payload.
    ///
    /// Every error, whatever the stage, becomes
    /// [`QueryResponse::failure`]; this never panics or propagates.
    #[instrument(skip(self, request), fields(actor = %request.actor()))]
    pub async fn handle(&self, request: &TaskRequest) -> QueryResponse {
        match self.execute(request).await {
            Ok(rows) => QueryResponse::rows(rows),
            Err(e) => {
                error!(error = %e, "Failed to generate and execute query");
                QueryResponse::failure()
            }
        }
    }

    /// Run `request` and return the rows, or the error that ended it.
    ///
    /// # Errors
    ///
    /// - a database connection error if no connection could be acquired
    /// - a database schema error if reflection failed
    /// - [`ExhaustedError`] carrying the last attempt's error when every
    ///   attempt failed
    #[instrument(skip(self, request), fields(actor = %request.actor(), max_attempts = self.max_attempts.get()))]
    pub async fn execute(&self, request: &TaskRequest) -> TabulaResult<QueryResult> {
        info!(task = %request.task(), "Received task");

        let connector = Arc::clone(&self.connector);
        let connection = on_blocking_pool(move || connector.connect())
            .await
            .map_err(|e| {
                error!(stage = %Stage::Connect, error = %e, "Could not acquire database connection");
                e
            })?;
        let connection = SharedConnection::new(connection);

        let schema = match connection.run(|c| c.fetch_schema_info()).await {
            Ok(schema) => schema,
            Err(e) => {
                error!(stage = %Stage::Schema, error = %e, "Could not fetch schema");
                connection.release().await;
                return Err(e.into());
            }
        };
        debug!(tables = schema.len(), "Fetched schema");

        let prompt = self.prompts.build(&schema, request.task());
        let outcome = self
            .run_attempts(&connection, &prompt, request.model().as_deref())
            .await;

        match &outcome {
            AttemptOutcome::Succeeded { attempts, .. } => {
                info!(attempts, "Query succeeded");
            }
            AttemptOutcome::Exhausted { attempts, last_error } => {
                error!(attempts, error = %last_error, "All attempts failed");
            }
        }

        connection.release().await;
        outcome.into_result()
    }

    async fn run_attempts(
        &self,
        connection: &SharedConnection<C::Connection>,
        prompt: &Prompt,
        model: Option<&str>,
    ) -> AttemptOutcome<QueryResult> {
        let max_attempts = self.max_attempts.get();
        let mut attempt = 1;
        loop {
            info!(attempt, max_attempts, "Attempt {} of {} to generate SQL query", attempt, max_attempts);
            match self.attempt(connection, prompt, model).await {
                Ok(rows) => {
                    return AttemptOutcome::Succeeded {
                        value: rows,
                        attempts: attempt,
                    };
                }
                Err(failure) => {
                    warn!(
                        attempt,
                        max_attempts,
                        stage = %failure.stage,
                        error = %failure.error,
                        "Attempt failed"
                    );
                    if attempt >= max_attempts {
                        return AttemptOutcome::Exhausted {
                            attempts: attempt,
                            last_error: failure.error,
                        };
                    }
                    attempt += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        connection: &SharedConnection<C::Connection>,
        prompt: &Prompt,
        model: Option<&str>,
    ) -> Result<QueryResult, StageFailure> {
        let text = self
            .generator
            .generate(prompt, model)
            .await
            .map_err(|e| StageFailure::new(Stage::Generate, e))?;
        debug!(text = %text, "Generated text");

        let sql = extract_sql(&text).map_err(|e| StageFailure::new(Stage::Extract, e))?;
        info!(sql = %sql, "Cleaned SQL query");

        let rows = connection
            .run(move |c| c.execute_query(&sql))
            .await
            .map_err(|e| StageFailure::new(Stage::Execute, e))?;
        info!(rows = rows.len(), "Executed query");
        Ok(rows)
    }
}
