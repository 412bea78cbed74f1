//! Backend selection.

use crate::{DatabaseConfig, DatabaseMode};
use tabula_core::{QueryResult, SchemaInfo, SqlDialect};
use tabula_error::{ConfigError, DatabaseResult};
use tabula_interface::{Connector, DatabaseConnection};
use tracing::info;

#[cfg(feature = "mysql")]
use crate::{MysqlConnector, MysqlDatabase};
#[cfg(feature = "postgres")]
use crate::{PostgresConnector, PostgresDatabase};
#[cfg(feature = "sqlite")]
use crate::{SqliteConnector, SqliteDatabase};

/// The connector chosen at startup, one variant per compiled backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnyConnector {
    /// Embedded SQLite
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnector),
    /// MySQL server
    #[cfg(feature = "mysql")]
    Mysql(MysqlConnector),
    /// PostgreSQL server
    #[cfg(feature = "postgres")]
    Postgres(PostgresConnector),
}

impl AnyConnector {
    /// Select and configure the backend named by `config.mode`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the mode's backend was not compiled in or
    /// its connection settings are missing.
    pub fn from_config(config: &DatabaseConfig) -> Result<Self, ConfigError> {
        let connector = match config.mode {
            DatabaseMode::Local => Self::local(config)?,
            DatabaseMode::Mysql => Self::mysql(config)?,
            DatabaseMode::Postgres => Self::postgres(config)?,
        };
        info!(mode = %config.mode, dialect = %connector.dialect(), "Selected database backend");
        Ok(connector)
    }

    #[cfg(feature = "sqlite")]
    fn local(config: &DatabaseConfig) -> Result<Self, ConfigError> {
        Ok(Self::Sqlite(SqliteConnector::new(
            config.local.path.clone(),
            config.statement_timeout_ms,
        )))
    }

    #[cfg(not(feature = "sqlite"))]
    fn local(_config: &DatabaseConfig) -> Result<Self, ConfigError> {
        Err(not_compiled(DatabaseMode::Local, "sqlite"))
    }

    #[cfg(feature = "mysql")]
    fn mysql(config: &DatabaseConfig) -> Result<Self, ConfigError> {
        let mysql = config
            .mysql
            .as_ref()
            .ok_or_else(|| ConfigError::for_setting("database.mysql.url", "required when mode is 'mysql'"))?;
        Ok(Self::Mysql(MysqlConnector::new(
            mysql.url.clone(),
            config.statement_timeout_ms,
        )))
    }

    #[cfg(not(feature = "mysql"))]
    fn mysql(_config: &DatabaseConfig) -> Result<Self, ConfigError> {
        Err(not_compiled(DatabaseMode::Mysql, "mysql"))
    }

    #[cfg(feature = "postgres")]
    fn postgres(config: &DatabaseConfig) -> Result<Self, ConfigError> {
        let postgres = config.postgres.as_ref().ok_or_else(|| {
            ConfigError::for_setting("database.postgres.url", "required when mode is 'postgres'")
        })?;
        Ok(Self::Postgres(PostgresConnector::new(
            postgres.url.clone(),
            config.statement_timeout_ms,
        )))
    }

    #[cfg(not(feature = "postgres"))]
    fn postgres(_config: &DatabaseConfig) -> Result<Self, ConfigError> {
        Err(not_compiled(DatabaseMode::Postgres, "postgres"))
    }
}

#[allow(dead_code)]
fn not_compiled(mode: DatabaseMode, feature: &str) -> ConfigError {
    ConfigError::for_setting(
        "database.mode",
        format!(
            "mode '{}' requires tabula to be built with the `{}` feature (cargo build --features {})",
            mode, feature, feature
        ),
    )
}

impl Connector for AnyConnector {
    type Connection = AnyConnection;

    fn dialect(&self) -> SqlDialect {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(c) => c.dialect(),
            #[cfg(feature = "mysql")]
            Self::Mysql(c) => c.dialect(),
            #[cfg(feature = "postgres")]
            Self::Postgres(c) => c.dialect(),
        }
    }

    fn connect(&self) -> DatabaseResult<AnyConnection> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(c) => c.connect().map(AnyConnection::Sqlite),
            #[cfg(feature = "mysql")]
            Self::Mysql(c) => c.connect().map(AnyConnection::Mysql),
            #[cfg(feature = "postgres")]
            Self::Postgres(c) => c.connect().map(AnyConnection::Postgres),
        }
    }
}

/// A connection opened by [`AnyConnector`].
pub enum AnyConnection {
    /// Embedded SQLite
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteDatabase),
    /// MySQL server
    #[cfg(feature = "mysql")]
    Mysql(MysqlDatabase),
    /// PostgreSQL server
    #[cfg(feature = "postgres")]
    Postgres(PostgresDatabase),
}

impl DatabaseConnection for AnyConnection {
    fn dialect(&self) -> SqlDialect {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(c) => c.dialect(),
            #[cfg(feature = "mysql")]
            Self::Mysql(c) => c.dialect(),
            #[cfg(feature = "postgres")]
            Self::Postgres(c) => c.dialect(),
        }
    }

    fn fetch_schema_info(&mut self) -> DatabaseResult<SchemaInfo> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(c) => c.fetch_schema_info(),
            #[cfg(feature = "mysql")]
            Self::Mysql(c) => c.fetch_schema_info(),
            #[cfg(feature = "postgres")]
            Self::Postgres(c) => c.fetch_schema_info(),
        }
    }

    fn execute_query(&mut self, sql: &str) -> DatabaseResult<QueryResult> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(c) => c.execute_query(sql),
            #[cfg(feature = "mysql")]
            Self::Mysql(c) => c.execute_query(sql),
            #[cfg(feature = "postgres")]
            Self::Postgres(c) => c.execute_query(sql),
        }
    }

    fn close(&mut self) -> DatabaseResult<()> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(c) => c.close(),
            #[cfg(feature = "mysql")]
            Self::Mysql(c) => c.close(),
            #[cfg(feature = "postgres")]
            Self::Postgres(c) => c.close(),
        }
    }
}
