//! Networked MySQL backend (database mode `mysql`).

use crate::sql::{self, SchemaColumnRow};
use diesel::connection::SimpleConnection;
use diesel::deserialize::{self, FromSql, QueryableByName};
use diesel::mysql::data_types::MysqlTime;
use diesel::mysql::sql_types::{Datetime, Unsigned};
use diesel::mysql::{Mysql, MysqlConnection, MysqlType, MysqlValue};
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel::row::{Field, NamedRow, Row as DieselRow};
use diesel::sql_types::{BigInt, Date, Double, Time, Timestamp};
use serde_json::Value as JsonValue;
use tabula_core::{QueryResult, Row, SchemaInfo, SqlDialect};
use tabula_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
use tabula_interface::{Connector, DatabaseConnection};
use tracing::{debug, instrument};

/// Every column of every table in the connected schema.
const SCHEMA_QUERY: &str = r#"
    SELECT
        CAST(TABLE_NAME AS CHAR) AS table_name,
        CAST(COLUMN_NAME AS CHAR) AS column_name,
        CAST(COLUMN_TYPE AS CHAR) AS data_type,
        CAST(IS_NULLABLE AS CHAR) AS is_nullable
    FROM information_schema.COLUMNS
    WHERE TABLE_SCHEMA = DATABASE()
    ORDER BY TABLE_NAME, ORDINAL_POSITION
"#;

/// Raised by diesel when a prepared statement has no result set.
const NO_RESULT_SET: &str = "No metadata exists";

/// A result row of any shape, decoded by each column's wire type.
struct MysqlRow(Row);

impl QueryableByName<Mysql> for MysqlRow {
    fn build<'a>(row: &impl NamedRow<'a, Mysql>) -> deserialize::Result<Self> {
        let count = DieselRow::field_count(row);
        let mut fields = Vec::with_capacity(count);
        for idx in 0..count {
            let field = DieselRow::get(row, idx).ok_or("result column out of range")?;
            let name = field.field_name().unwrap_or_default().to_string();
            let value = match field.value() {
                Some(value) => mysql_value(value)?,
                None => JsonValue::Null,
            };
            fields.push((name, value));
        }
        Ok(Self(sql::row_from_fields(fields)))
    }
}

fn mysql_value(value: MysqlValue<'_>) -> deserialize::Result<JsonValue> {
    let json = match value.value_type() {
        MysqlType::Tiny
        | MysqlType::UnsignedTiny
        | MysqlType::Short
        | MysqlType::UnsignedShort
        | MysqlType::Long
        | MysqlType::UnsignedLong
        | MysqlType::LongLong => JsonValue::from(<i64 as FromSql<BigInt, Mysql>>::from_sql(value)?),
        MysqlType::UnsignedLongLong => {
            JsonValue::from(<u64 as FromSql<Unsigned<BigInt>, Mysql>>::from_sql(value)?)
        }
        MysqlType::Float | MysqlType::Double => {
            sql::float_value(<f64 as FromSql<Double, Mysql>>::from_sql(value)?)
        }
        // DECIMAL arrives as its text rendering.
        MysqlType::Numeric => {
            let text = std::str::from_utf8(value.as_bytes())?;
            text.parse::<serde_json::Number>()
                .map(JsonValue::Number)
                .unwrap_or_else(|_| JsonValue::String(text.to_string()))
        }
        MysqlType::Date => {
            let t = <MysqlTime as FromSql<Date, Mysql>>::from_sql(value)?;
            JsonValue::String(format!("{:04}-{:02}-{:02}", t.year, t.month, t.day))
        }
        MysqlType::Time => {
            let t = <MysqlTime as FromSql<Time, Mysql>>::from_sql(value)?;
            let sign = if t.neg { "-" } else { "" };
            JsonValue::String(format!(
                "{sign}{:02}:{:02}:{:02}{}",
                t.hour,
                t.minute,
                t.second,
                fraction(t.second_part.into())
            ))
        }
        MysqlType::DateTime | MysqlType::Timestamp => {
            let t = if value.value_type() == MysqlType::Timestamp {
                <MysqlTime as FromSql<Timestamp, Mysql>>::from_sql(value)?
            } else {
                <MysqlTime as FromSql<Datetime, Mysql>>::from_sql(value)?
            };
            JsonValue::String(format!(
                "{:04}-{:02}-{:02} {:02}:{:02}:{:02}{}",
                t.year,
                t.month,
                t.day,
                t.hour,
                t.minute,
                t.second,
                fraction(t.second_part.into())
            ))
        }
        // Text, ENUM, SET, BLOB and BIT arrive as raw bytes.
        _ => sql::bytes_value(value.as_bytes()),
    };
    Ok(json)
}

fn fraction(micros: u64) -> String {
    if micros == 0 {
        String::new()
    } else {
        format!(".{micros:06}")
    }
}

/// Opens connections to a MySQL server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MysqlConnector {
    url: String,
    statement_timeout_ms: u64,
}

impl MysqlConnector {
    /// Connector for `url` with a per-statement execution deadline.
    pub fn new(url: impl Into<String>, statement_timeout_ms: u64) -> Self {
        Self {
            url: url.into(),
            statement_timeout_ms,
        }
    }
}

impl Connector for MysqlConnector {
    type Connection = MysqlDatabase;

    fn dialect(&self) -> SqlDialect {
        SqlDialect::Mysql
    }

    #[instrument(name = "mysql.connect", skip(self))]
    fn connect(&self) -> DatabaseResult<MysqlDatabase> {
        let mut conn = MysqlConnection::establish(&self.url)?;
        conn.batch_execute(&format!(
            "SET SESSION MAX_EXECUTION_TIME = {}",
            self.statement_timeout_ms
        ))
        .map_err(|e| DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())))?;

        debug!("Opened MySQL connection");
        Ok(MysqlDatabase { conn: Some(conn) })
    }
}

/// An open MySQL connection.
pub struct MysqlDatabase {
    conn: Option<MysqlConnection>,
}

impl MysqlDatabase {
    fn conn(&mut self) -> DatabaseResult<&mut MysqlConnection> {
        self.conn.as_mut().ok_or_else(|| {
            DatabaseError::new(DatabaseErrorKind::Connection(
                "MySQL connection already closed".to_string(),
            ))
        })
    }
}

impl DatabaseConnection for MysqlDatabase {
    fn dialect(&self) -> SqlDialect {
        SqlDialect::Mysql
    }

    #[instrument(name = "mysql.fetch_schema_info", skip(self))]
    fn fetch_schema_info(&mut self) -> DatabaseResult<SchemaInfo> {
        let rows = diesel::sql_query(SCHEMA_QUERY)
            .load::<SchemaColumnRow>(self.conn()?)
            .map_err(|e| DatabaseError::new(DatabaseErrorKind::Schema(e.to_string())))?;

        let schema = sql::schema_from_rows(rows);
        debug!(tables = schema.len(), "Reflected MySQL schema");
        Ok(schema)
    }

    #[instrument(name = "mysql.execute_query", skip(self, sql))]
    fn execute_query(&mut self, sql: &str) -> DatabaseResult<QueryResult> {
        let statement = sql::strip_terminator(sql);
        let conn = self.conn()?;

        // Result metadata is read before the statement runs, so a statement
        // without a result set is rejected untouched and can be executed.
        let result: QueryResult = match diesel::sql_query(statement).load::<MysqlRow>(conn) {
            Ok(rows) => rows.into_iter().map(|row| row.0).collect(),
            Err(DieselError::DeserializationError(e)) if e.to_string() == NO_RESULT_SET => {
                let affected = diesel::sql_query(statement).execute(conn)?;
                debug!(affected, "Executed MySQL statement without a result set");
                QueryResult::default()
            }
            Err(e) => return Err(e.into()),
        };
        debug!(rows = result.len(), "Executed MySQL query");
        Ok(result)
    }

    fn close(&mut self) -> DatabaseResult<()> {
        if self.conn.take().is_some() {
            debug!("Closed MySQL connection");
        }
        Ok(())
    }
}
