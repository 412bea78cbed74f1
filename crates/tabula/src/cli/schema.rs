//! Schema inspection command handler.

use tabula::TabulaConfig;
use tabula_database::AnyConnector;
use tabula_interface::{ConnectionGuard, Connector, DatabaseConnection};

/// Print the configured database's schema as JSON.
pub fn show_schema(config: &TabulaConfig) -> anyhow::Result<()> {
    let connector = AnyConnector::from_config(&config.database)?;
    let mut connection = ConnectionGuard::new(connector.connect()?);
    let schema = connection.fetch_schema_info()?;
    connection.release()?;

    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
