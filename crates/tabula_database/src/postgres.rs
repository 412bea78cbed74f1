//! Networked PostgreSQL backend (database mode `postgres`).

use crate::sql::{self, FieldList, SchemaColumnRow};
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::sql_types::Text;
use tabula_core::{QueryResult, SchemaInfo, SqlDialect};
use tabula_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use tabula_interface::{Connector, DatabaseConnection};
use tracing::{debug, instrument};

/// Every column of every table visible in the current schema.
const SCHEMA_QUERY: &str = r#"
    SELECT
        table_name::text AS table_name,
        column_name::text AS column_name,
        CASE
            WHEN data_type = 'ARRAY' THEN udt_name::text
            ELSE data_type::text
        END AS data_type,
        is_nullable::text AS is_nullable
    FROM information_schema.columns
    WHERE table_schema = current_schema()
    ORDER BY table_name, ordinal_position
"#;

/// A row rendered by `row_to_json` as text, so repeated keys survive.
#[derive(Debug, QueryableByName)]
struct JsonTextRow {
    #[diesel(sql_type = Text)]
    json: String,
}

/// Opens connections to a PostgreSQL server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostgresConnector {
    url: String,
    statement_timeout_ms: u64,
}

impl PostgresConnector {
    /// Connector for `url` with a per-statement deadline.
    pub fn new(url: impl Into<String>, statement_timeout_ms: u64) -> Self {
        Self {
            url: url.into(),
            statement_timeout_ms,
        }
    }
}

impl Connector for PostgresConnector {
    type Connection = PostgresDatabase;

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    #[instrument(name = "postgres.connect", skip(self))]
    fn connect(&self) -> DatabaseResult<PostgresDatabase> {
        let mut conn = PgConnection::establish(&self.url)?;
        conn.batch_execute(&format!("SET statement_timeout = {}", self.statement_timeout_ms))
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

        debug!("Opened PostgreSQL connection");
        Ok(PostgresDatabase { conn: Some(conn) })
    }
}

/// An open PostgreSQL connection.
pub struct PostgresDatabase {
    conn: Option<PgConnection>,
}

impl PostgresDatabase {
    fn conn(&mut self) -> DatabaseResult<&mut PgConnection> {
        self.conn.as_mut().ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::Connection(
                "PostgreSQL connection already closed".to_string(),
            ))
        })
    }
}

impl DatabaseConnection for PostgresDatabase {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Postgres
    }

    #[instrument(name = "postgres.fetch_schema_info", skip(self))]
    fn fetch_schema_info(&mut self) -> DatabaseResult<SchemaInfo> {
        let rows = diesel::sql_query(SCHEMA_QUERY)
            .load::<SchemaColumnRow>(self.conn()?)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Schema(e.to_string())))?;

        let schema = sql::schema_from_rows(rows);
        debug!(tables = schema.len(), "Reflected PostgreSQL schema");
        Ok(schema)
    }

    #[instrument(name = "postgres.execute_query", skip(self, sql))]
    fn execute_query(&mut self, sql: &str) -> DatabaseResult<QueryResult> {
        let statement = sql::strip_terminator(sql);
        let conn = self.conn()?;

        if !sql::is_row_query(statement) {
            let affected = diesel::sql_query(statement).execute(conn)?;
            debug!(affected, "Executed PostgreSQL statement without a result set");
            return Ok(QueryResult::default());
        }

        let query = format!("SELECT row_to_json(q)::text AS json FROM ({statement}) AS q");
        let result = diesel::sql_query(query)
            .load::<JsonTextRow>(conn)?
            .into_iter()
            .map(|row| {
                serde_json::from_str::<FieldList>(&row.json).map(|fields| sql::row_from_fields(fields.0))
            })
            .collect::<Result<QueryResult, _>>()?;
        debug!(rows = result.len(), "Executed PostgreSQL query");
        Ok(result)
    }

    fn close(&mut self) -> DatabaseResult<()> {
        if self.conn.take().is_some() {
            debug!("Closed PostgreSQL connection");
        }
        Ok(())
    }
}
