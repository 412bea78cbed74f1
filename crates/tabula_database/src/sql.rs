//! Statement handling and row decoding shared by all backends.
//!
//! Diesel wants result types known at compile time. Arbitrary statements are
//! loaded into per-backend row types that walk the result columns at runtime
//! and hand `(name, value)` pairs to [`row_from_fields`].

use diesel::QueryableByName;
use diesel::sql_types::Text;
use serde_json::Value as JsonValue;
use tabula_core::{ColumnInfo, Row, SchemaInfo};

/// One row of a schema reflection query.
#[derive(Debug, QueryableByName)]
pub(crate) struct SchemaColumnRow {
    #[diesel(sql_type = Text)]
    pub table_name: String,
    #[diesel(sql_type = Text)]
    pub column_name: String,
    #[diesel(sql_type = Text)]
    pub data_type: String,
    #[diesel(sql_type = Text)]
    pub is_nullable: String,
}

/// Drop trailing semicolons; prepared statements take exactly one statement.
pub(crate) fn strip_terminator(sql: &str) -> &str {
    let mut statement = sql.trim();
    while let Some(rest) = statement.strip_suffix(';') {
        statement = rest.trim_end();
    }
    statement
}

/// Build a row from result columns in select-list order.
///
/// A repeated column name (`SELECT u.id, o.id ...`) keeps its first
/// occurrence as is; later ones become `id:1`, `id:2` and so on.
pub(crate) fn row_from_fields(fields: impl IntoIterator<Item = (String, JsonValue)>) -> Row {
    let mut row = Row::new();
    for (name, value) in fields {
        let key = if row.contains_key(&name) {
            (1..)
                .map(|n| format!("{name}:{n}"))
                .find(|candidate| !row.contains_key(candidate))
                .unwrap_or_default()
        } else {
            name
        };
        row.insert(key, value);
    }
    row
}

/// Text as a JSON string, or a `0x` hex string when it is not UTF-8.
pub(crate) fn bytes_value(bytes: &[u8]) -> JsonValue {
    match std::str::from_utf8(bytes) {
        Ok(text) => JsonValue::String(text.to_string()),
        Err(_) => {
            let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
            JsonValue::String(format!("0x{hex}"))
        }
    }
}

/// A finite float as a JSON number; NaN and infinities become null.
pub(crate) fn float_value(value: f64) -> JsonValue {
    serde_json::Number::from_f64(value)
        .map(JsonValue::Number)
        .unwrap_or(JsonValue::Null)
}

/// Fold reflection rows into a schema snapshot.
pub(crate) fn schema_from_rows(rows: Vec<SchemaColumnRow>) -> SchemaInfo {
    let mut schema = SchemaInfo::default();
    for row in rows {
        let mut column = ColumnInfo::new(row.column_name)
            .with_nullable(row.is_nullable.eq_ignore_ascii_case("YES"));
        if !row.data_type.is_empty() {
            column = column.with_type(row.data_type);
        }
        schema.add_column(row.table_name, column);
    }
    schema
}

/// Whether a statement can stand as a subquery, judged by its first keyword.
#[cfg(any(feature = "postgres", test))]
pub(crate) fn is_row_query(statement: &str) -> bool {
    let keyword: String = statement
        .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    ["SELECT", "WITH", "VALUES", "TABLE"]
        .iter()
        .any(|k| keyword.eq_ignore_ascii_case(k))
}

/// JSON object fields in document order, duplicates included.
#[cfg(any(feature = "postgres", test))]
#[derive(Debug, Default)]
pub(crate) struct FieldList(pub Vec<(String, JsonValue)>);

#[cfg(any(feature = "postgres", test))]
impl<'de> serde::Deserialize<'de> for FieldList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct FieldVisitor;

        impl<'de> serde::de::Visitor<'de> for FieldVisitor {
            type Value = FieldList;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a JSON object per row")
            }

            fn visit_map<A>(self, mut map: A) -> Result<FieldList, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, JsonValue>()? {
                    fields.push(entry);
                }
                Ok(FieldList(fields))
            }
        }

        deserializer.deserialize_map(FieldVisitor)
    }
}
