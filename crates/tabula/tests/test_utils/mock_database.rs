//! Mock database connector for testing.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tabula_core::{QueryResult, SchemaInfo, SqlDialect};
use tabula_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use tabula_interface::{Connector, DatabaseConnection};

/// A single scripted execution result.
#[derive(Debug, Clone)]
pub enum MockQuery {
    Rows(QueryResult),
    Error(String),
}

#[derive(Debug, Default)]
struct Ledger {
    connects: usize,
    closes: usize,
    executed: Vec<String>,
}

/// Mock connector whose connections share one ledger.
///
/// Execution results play back in order across all connections; once the
/// script runs out the last entry repeats.
#[derive(Debug, Clone)]
pub struct MockConnector {
    schema: SchemaInfo,
    results: Vec<MockQuery>,
    fail_connect: bool,
    fail_schema: bool,
    execute_delay: Option<Duration>,
    ledger: Arc<Mutex<Ledger>>,
}

impl MockConnector {
    /// Connector whose queries all return `rows`.
    pub fn new(schema: SchemaInfo, rows: QueryResult) -> Self {
        Self::new_sequence(schema, vec![MockQuery::Rows(rows)])
    }

    /// Connector playing back `results`.
    pub fn new_sequence(schema: SchemaInfo, results: Vec<MockQuery>) -> Self {
        assert!(!results.is_empty(), "mock needs at least one result");
        Self {
            schema,
            results,
            fail_connect: false,
            fail_schema: false,
            execute_delay: None,
            ledger: Arc::new(Mutex::new(Ledger::default())),
        }
    }

    /// Refuse every connection attempt.
    pub fn failing_connect(mut self) -> Self {
        self.fail_connect = true;
        self
    }

    /// Fail schema reflection.
    pub fn failing_schema(mut self) -> Self {
        self.fail_schema = true;
        self
    }

    /// Block the calling thread for `delay` on every execution, like a slow
    /// statement inside a synchronous driver.
    pub fn with_execute_delay(mut self, delay: Duration) -> Self {
        self.execute_delay = Some(delay);
        self
    }

    /// Connections opened.
    pub fn connect_count(&self) -> usize {
        self.ledger.lock().unwrap().connects
    }

    /// Connections closed.
    pub fn close_count(&self) -> usize {
        self.ledger.lock().unwrap().closes
    }

    /// Statements executed, in order.
    pub fn executed(&self) -> Vec<String> {
        self.ledger.lock().unwrap().executed.clone()
    }
}

impl Connector for MockConnector {
    type Connection = MockConnection;

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    fn connect(&self) -> DatabaseResult<MockConnection> {
        if self.fail_connect {
            return Err(DatabaseError::new(DatabaseErrorKind::Connection(
                "connection refused".to_string(),
            )));
        }
        self.ledger.lock().unwrap().connects += 1;
        Ok(MockConnection {
            connector: self.clone(),
            closed: false,
        })
    }
}

/// Connection handed out by [`MockConnector`].
#[derive(Debug)]
pub struct MockConnection {
    connector: MockConnector,
    closed: bool,
}

impl MockConnection {
    fn ensure_open(&self) -> DatabaseResult<()> {
        if self.closed {
            return Err(DatabaseError::new(DatabaseErrorKind::Connection(
                "connection is closed".to_string(),
            )));
        }
        Ok(())
    }
}

impl DatabaseConnection for MockConnection {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    fn fetch_schema_info(&mut self) -> DatabaseResult<SchemaInfo> {
        self.ensure_open()?;
        if self.connector.fail_schema {
            return Err(DatabaseError::new(DatabaseErrorKind::Schema(
                "permission denied for information_schema".to_string(),
            )));
        }
        Ok(self.connector.schema.clone())
    }

    fn execute_query(&mut self, sql: &str) -> DatabaseResult<QueryResult> {
        self.ensure_open()?;
        if let Some(delay) = self.connector.execute_delay {
            std::thread::sleep(delay);
        }
        let mut ledger = self.connector.ledger.lock().unwrap();
        let index = ledger.executed.len().min(self.connector.results.len() - 1);
        ledger.executed.push(sql.to_string());
        match &self.connector.results[index] {
            MockQuery::Rows(rows) => Ok(rows.clone()),
            MockQuery::Error(message) => Err(DatabaseError::new(DatabaseErrorKind::Query(
                message.clone(),
            ))),
        }
    }

    fn close(&mut self) -> DatabaseResult<()> {
        self.ensure_open()?;
        self.closed = true;
        self.connector.ledger.lock().unwrap().closes += 1;
        Ok(())
    }
}
