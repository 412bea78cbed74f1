//! Embedded SQLite backend (database mode `local`).

use crate::sql::{self, SchemaColumnRow};
use diesel::connection::SimpleConnection;
use diesel::deserialize::{self, QueryableByName};
use diesel::prelude::*;
use diesel::row::{Field, NamedRow, Row as DieselRow};
use diesel::sqlite::{Sqlite, SqliteConnection, SqliteType, SqliteValue};
use serde_json::Value as JsonValue;
use std::path::{Path, PathBuf};
use tabula_core::{QueryResult, Row, SchemaInfo, SqlDialect};
use tabula_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use tabula_interface::{Connector, DatabaseConnection};
use tracing::{debug, instrument};

const IN_MEMORY: &str = ":memory:";

/// Every column of every user table and view, in declaration order.
const SCHEMA_QUERY: &str = r#"
    SELECT
        m.name AS table_name,
        p.name AS column_name,
        p.type AS data_type,
        CASE WHEN p."notnull" = 0 THEN 'YES' ELSE 'NO' END AS is_nullable
    FROM sqlite_master AS m
    JOIN pragma_table_info(m.name) AS p
    WHERE m.type IN ('table', 'view')
      AND m.name NOT LIKE 'sqlite_%'
    ORDER BY m.name, p.cid
"#;

/// A result row of any shape, decoded by each value's storage class.
struct SqliteRow(Row);

impl QueryableByName<Sqlite> for SqliteRow {
    fn build<'a>(row: &impl NamedRow<'a, Sqlite>) -> deserialize::Result<Self> {
        let count = DieselRow::field_count(row);
        let mut fields = Vec::with_capacity(count);
        for idx in 0..count {
            let field = DieselRow::get(row, idx).ok_or("result column out of range")?;
            let name = field.field_name().unwrap_or_default().to_string();
            let value = field.value().map(sqlite_value).unwrap_or(JsonValue::Null);
            fields.push((name, value));
        }
        Ok(Self(sql::row_from_fields(fields)))
    }
}

fn sqlite_value(mut value: SqliteValue<'_, '_, '_>) -> JsonValue {
    match value.value_type() {
        Some(SqliteType::Long | SqliteType::Integer | SqliteType::SmallInt) => {
            JsonValue::from(value.read_long())
        }
        Some(SqliteType::Double | SqliteType::Float) => sql::float_value(value.read_double()),
        Some(SqliteType::Text) => JsonValue::String(value.read_text().to_string()),
        Some(SqliteType::Binary) => sql::bytes_value(value.read_blob()),
        None => JsonValue::Null,
    }
}

/// Opens connections to a SQLite database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqliteConnector {
    path: PathBuf,
    busy_timeout_ms: u64,
}

impl SqliteConnector {
    /// Connector for the database at `path`, waiting up to `busy_timeout_ms`
    /// on locked tables.
    pub fn new(path: impl Into<PathBuf>, busy_timeout_ms: u64) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms,
        }
    }

    /// Location of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Connector for SqliteConnector {
    type Connection = SqliteDatabase;

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    #[instrument(name = "sqlite.connect", skip(self), fields(path = %self.path.display()))]
    fn connect(&self) -> DatabaseResult<SqliteDatabase> {
        let location = self.path.to_string_lossy();

        // Opening a missing file would silently create an empty database.
        if location != IN_MEMORY && !self.path.exists() {
            return Err(DatabaseError::new(DatabaseErrorKind::Connection(format!(
                "SQLite database file not found: {}",
                self.path.display()
            ))));
        }

        let mut conn = SqliteConnection::establish(&location)?;
        conn.batch_execute(&format!("PRAGMA busy_timeout = {}", self.busy_timeout_ms))
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

        debug!("Opened SQLite connection");
        Ok(SqliteDatabase::from_connection(conn))
    }
}

/// An open SQLite connection.
pub struct SqliteDatabase {
    conn: Option<SqliteConnection>,
}

impl SqliteDatabase {
    /// Wrap an already established diesel connection.
    pub fn from_connection(conn: SqliteConnection) -> Self {
        Self { conn: Some(conn) }
    }

    fn conn(&mut self) -> DatabaseResult<&mut SqliteConnection> {
        self.conn.as_mut().ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::Connection(
                "SQLite connection already closed".to_string(),
            ))
        })
    }
}

impl DatabaseConnection for SqliteDatabase {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Sqlite
    }

    #[instrument(name = "sqlite.fetch_schema_info", skip(self))]
    fn fetch_schema_info(&mut self) -> DatabaseResult<SchemaInfo> {
        let rows = diesel::sql_query(SCHEMA_QUERY)
            .load::<SchemaColumnRow>(self.conn()?)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Schema(e.to_string())))?;

        let schema = sql::schema_from_rows(rows);
        debug!(tables = schema.len(), "Reflected SQLite schema");
        Ok(schema)
    }

    #[instrument(name = "sqlite.execute_query", skip(self, sql))]
    fn execute_query(&mut self, sql: &str) -> DatabaseResult<QueryResult> {
        // Statements without a result set run to completion and load no rows.
        let rows = diesel::sql_query(sql::strip_terminator(sql)).load::<SqliteRow>(self.conn()?)?;
        let result: QueryResult = rows.into_iter().map(|row| row.0).collect();
        debug!(rows = result.len(), "Executed SQLite query");
        Ok(result)
    }

    fn close(&mut self) -> DatabaseResult<()> {
        if self.conn.take().is_some() {
            debug!("Closed SQLite connection");
        }
        Ok(())
    }
}
