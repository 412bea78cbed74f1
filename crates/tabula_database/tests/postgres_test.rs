//! Integration tests against a live PostgreSQL server.
//!
//! Run with `TABULA_TEST_POSTGRES_URL` set and
//! `cargo test -p tabula_database --features postgres --test postgres_test -- --ignored`.

#![cfg(feature = "postgres")]

use serde_json::json;
use std::env;
use tabula_core::SqlDialect;
use tabula_database::{
    AnyConnector, DatabaseConfig, DatabaseErrorKind, DatabaseMode, NetworkConfig,
    PostgresConnector, PostgresDatabase,
};
use tabula_interface::{ConnectionGuard, Connector, DatabaseConnection};

fn test_url() -> String {
    let _ = dotenvy::dotenv();
    env::var("TABULA_TEST_POSTGRES_URL")
        .expect("TABULA_TEST_POSTGRES_URL must be set for PostgreSQL tests")
}

fn connect() -> anyhow::Result<PostgresDatabase> {
    Ok(PostgresConnector::new(test_url(), 5_000).connect()?)
}

fn create_tables(conn: &mut PostgresDatabase, prefix: &str) -> anyhow::Result<()> {
    drop_tables(conn, prefix)?;
    conn.execute_query(&format!(
        "CREATE TABLE {prefix}_users (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT
        )"
    ))?;
    conn.execute_query(&format!(
        "CREATE TABLE {prefix}_orders (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            total NUMERIC(8, 2) NOT NULL
        )"
    ))?;
    conn.execute_query(&format!(
        "INSERT INTO {prefix}_users (id, name, email) VALUES
            (1, 'Ada', 'ada@example.com'),
            (2, 'Brook', NULL),
            (3, 'Cy', 'cy@example.com')"
    ))?;
    conn.execute_query(&format!(
        "INSERT INTO {prefix}_orders (id, user_id, total) VALUES
            (10, 1, 12.50),
            (11, 1, 7.25),
            (12, 3, 3.00)"
    ))?;
    Ok(())
}

fn drop_tables(conn: &mut PostgresDatabase, prefix: &str) -> anyhow::Result<()> {
    conn.execute_query(&format!("DROP TABLE IF EXISTS {prefix}_orders, {prefix}_users"))?;
    Ok(())
}

#[test]
#[ignore = "needs a PostgreSQL server at TABULA_TEST_POSTGRES_URL"]
fn reflects_tables_and_columns() -> anyhow::Result<()> {
    let mut conn = connect()?;
    create_tables(&mut conn, "tp_reflect")?;

    let schema = conn.fetch_schema_info()?;

    let users = schema.table("tp_reflect_users").expect("users table");
    let columns: Vec<_> = users.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(columns, vec!["id", "name", "email"]);
    assert_eq!(users[0].data_type.as_deref(), Some("integer"));
    assert_eq!(users[1].data_type.as_deref(), Some("text"));
    assert_eq!(users[1].nullable, Some(false));
    assert_eq!(users[2].nullable, Some(true));

    drop_tables(&mut conn, "tp_reflect")?;
    Ok(())
}

#[test]
#[ignore = "needs a PostgreSQL server at TABULA_TEST_POSTGRES_URL"]
fn executes_select_preserving_order_and_types() -> anyhow::Result<()> {
    let mut conn = connect()?;
    create_tables(&mut conn, "tp_select")?;

    let result =
        conn.execute_query("SELECT name, email, id FROM tp_select_users ORDER BY id DESC;")?;

    assert_eq!(
        serde_json::to_value(&result)?,
        json!([
            {"name": "Cy", "email": "cy@example.com", "id": 3},
            {"name": "Brook", "email": null, "id": 2},
            {"name": "Ada", "email": "ada@example.com", "id": 1}
        ])
    );
    let keys: Vec<_> = result.rows()[0].keys().cloned().collect();
    assert_eq!(keys, vec!["name", "email", "id"]);

    let totals = conn.execute_query(
        "SELECT user_id, COUNT(*) AS orders, MIN(total) AS smallest FROM tp_select_orders \
         GROUP BY user_id ORDER BY user_id",
    )?;
    assert_eq!(
        serde_json::to_value(&totals)?,
        json!([
            {"user_id": 1, "orders": 2, "smallest": 7.25},
            {"user_id": 3, "orders": 1, "smallest": 3.0}
        ])
    );

    drop_tables(&mut conn, "tp_select")?;
    Ok(())
}

#[test]
#[ignore = "needs a PostgreSQL server at TABULA_TEST_POSTGRES_URL"]
fn repeated_column_names_are_kept_apart() -> anyhow::Result<()> {
    let mut conn = connect()?;
    create_tables(&mut conn, "tp_dup")?;

    let result = conn.execute_query(
        "SELECT u.id, o.id FROM tp_dup_users u JOIN tp_dup_orders o ON o.user_id = u.id \
         ORDER BY o.id",
    )?;
    assert_eq!(
        serde_json::to_value(&result)?,
        json!([
            {"id": 1, "id:1": 10},
            {"id": 1, "id:1": 11},
            {"id": 3, "id:1": 12}
        ])
    );

    drop_tables(&mut conn, "tp_dup")?;
    Ok(())
}

#[test]
#[ignore = "needs a PostgreSQL server at TABULA_TEST_POSTGRES_URL"]
fn statements_without_rows_run_and_return_nothing() -> anyhow::Result<()> {
    let mut conn = connect()?;
    create_tables(&mut conn, "tp_dml")?;

    let updated = conn.execute_query("UPDATE tp_dml_users SET name = 'Z' WHERE id = 1;")?;
    assert!(updated.is_empty());

    let result = conn.execute_query("SELECT name FROM tp_dml_users WHERE id = 1")?;
    assert_eq!(serde_json::to_value(&result)?, json!([{"name": "Z"}]));

    drop_tables(&mut conn, "tp_dml")?;
    Ok(())
}

#[test]
#[ignore = "needs a PostgreSQL server at TABULA_TEST_POSTGRES_URL"]
fn invalid_sql_is_a_query_error() -> anyhow::Result<()> {
    let mut conn = connect()?;

    let err = conn.execute_query("SELECT nope FROM tp_missing_table").unwrap_err();
    assert!(matches!(err.kind, DatabaseErrorKind::Query(_)), "got {err}");

    let result = conn.execute_query("SELECT 1 AS one")?;
    assert_eq!(serde_json::to_value(&result)?, json!([{"one": 1}]));
    Ok(())
}

#[test]
#[ignore = "needs a PostgreSQL server at TABULA_TEST_POSTGRES_URL"]
fn closed_connection_rejects_calls() -> anyhow::Result<()> {
    let mut conn = connect()?;

    conn.close()?;
    assert!(conn.execute_query("SELECT 1").unwrap_err().is_connection());
    assert!(conn.fetch_schema_info().unwrap_err().is_connection());
    Ok(())
}

#[test]
#[ignore = "needs a PostgreSQL server at TABULA_TEST_POSTGRES_URL"]
fn any_connector_dispatches_postgres_mode() -> anyhow::Result<()> {
    let config = DatabaseConfig {
        mode: DatabaseMode::Postgres,
        postgres: Some(NetworkConfig { url: test_url() }),
        ..DatabaseConfig::default()
    };

    let connector = AnyConnector::from_config(&config)?;
    assert_eq!(connector.dialect(), SqlDialect::Postgres);

    let mut conn = ConnectionGuard::new(connector.connect()?);
    let result = conn.execute_query("SELECT 'ok' AS status")?;
    assert_eq!(serde_json::to_value(&result)?, json!([{"status": "ok"}]));
    conn.release()?;
    Ok(())
}
