//! Database schema snapshot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// SQL dialect spoken by a database backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum SqlDialect {
    /// Embedded SQLite
    #[display("SQLite")]
    Sqlite,
    /// MySQL / MariaDB
    #[display("MySQL")]
    Mysql,
    /// PostgreSQL
    #[display("PostgreSQL")]
    Postgres,
}

/// One column of a table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name
    pub name: String,
    /// Declared type, as reported by the database
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Whether the column accepts NULL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,
}

impl ColumnInfo {
    /// A column known only by name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: None,
            nullable: None,
        }
    }

    /// Attach the declared type.
    pub fn with_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Attach nullability.
    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = Some(nullable);
        self
    }
}

/// Table name → ordered columns, captured at the start of a request.
///
/// Tables are kept in name order so the rendered text is stable across calls;
/// columns keep the order the database reported.
///
/// # Examples
///
/// ```
/// use tabula_core::{ColumnInfo, SchemaInfo};
///
/// let mut schema = SchemaInfo::default();
/// schema.add_column("users", ColumnInfo::new("id"));
/// schema.add_column("users", ColumnInfo::new("email"));
///
/// assert_eq!(schema.len(), 1);
/// assert_eq!(schema.to_string(), r#"{"users":[{"name":"id"},{"name":"email"}]}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SchemaInfo {
    tables: BTreeMap<String, Vec<ColumnInfo>>,
}

impl SchemaInfo {
    /// Build from `(table, columns)` pairs.
    pub fn from_tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<ColumnInfo>)>,
        S: Into<String>,
    {
        Self {
            tables: tables
                .into_iter()
                .map(|(name, columns)| (name.into(), columns))
                .collect(),
        }
    }

    /// Append a column to `table`, creating the table entry if needed.
    pub fn add_column(&mut self, table: impl Into<String>, column: ColumnInfo) {
        self.tables.entry(table.into()).or_default().push(column);
    }

    /// Columns of `table`, if present.
    pub fn table(&self, table: &str) -> Option<&[ColumnInfo]> {
        self.tables.get(table).map(Vec::as_slice)
    }

    /// Iterate tables in name order.
    pub fn tables(&self) -> impl Iterator<Item = (&str, &[ColumnInfo])> {
        self.tables
            .iter()
            .map(|(name, columns)| (name.as_str(), columns.as_slice()))
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no tables were found.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Compact JSON rendering.
impl fmt::Display for SchemaInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
