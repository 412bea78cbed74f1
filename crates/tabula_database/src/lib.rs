//! Database backends for Tabula.
//!
//! Each backend exposes the same two capabilities through
//! [`DatabaseConnection`](tabula_interface::DatabaseConnection): reflect the
//! schema, and execute an arbitrary statement returning rows as JSON objects.
//!
//! | mode | backend | cargo feature |
//! |------|---------|---------------|
//! | `local` | embedded SQLite file | `sqlite` (default) |
//! | `mysql` | MySQL / MariaDB server | `mysql` |
//! | `postgres` | PostgreSQL server | `postgres` |
//!
//! The backend is chosen once at startup from [`DatabaseConfig`] by
//! [`AnyConnector::from_config`]; every request then opens and releases its
//! own connection.
//!
//! # Example
//!
//! ```rust,ignore
//! use tabula_database::{AnyConnector, DatabaseConfig};
//! use tabula_interface::{Connector, ConnectionGuard, DatabaseConnection};
//!
//! let connector = AnyConnector::from_config(&DatabaseConfig::default())?;
//! let mut conn = ConnectionGuard::new(connector.connect()?);
//! let schema = conn.fetch_schema_info()?;
//! let rows = conn.execute_query("SELECT 1 AS one")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

#[cfg(not(any(feature = "sqlite", feature = "mysql", feature = "postgres")))]
compile_error!("tabula_database needs at least one of the `sqlite`, `mysql`, or `postgres` features");

mod config;
mod connector;
mod sql;

#[cfg(feature = "mysql")]
mod mysql;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use config::{DatabaseConfig, DatabaseMode, LocalConfig, NetworkConfig};
pub use connector::{AnyConnection, AnyConnector};
#[cfg(feature = "mysql")]
pub use mysql::{MysqlConnector, MysqlDatabase};
#[cfg(feature = "postgres")]
pub use postgres::{PostgresConnector, PostgresDatabase};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConnector, SqliteDatabase};

pub use tabula_error::{DatabaseError, DatabaseErrorKind, DatabaseResult};
