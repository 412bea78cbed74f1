//! Test doubles for the completion service and the database.

#![allow(dead_code)]

mod mock_database;
mod mock_driver;

pub use mock_database::{MockConnection, MockConnector, MockQuery};
pub use mock_driver::{MockDriver, MockResponse};

use std::num::NonZeroU32;
use tabula::{Orchestrator, QueryGenerator};
use tabula_core::{ColumnInfo, SchemaInfo};

/// Default model configured for every test orchestrator.
pub const DEFAULT_MODEL: &str = "gpt-35-turbo";

/// `users(id, name, email)`.
pub fn users_schema() -> SchemaInfo {
    SchemaInfo::from_tables([(
        "users",
        vec![
            ColumnInfo::new("id"),
            ColumnInfo::new("name"),
            ColumnInfo::new("email"),
        ],
    )])
}

/// Orchestrator over mocks with `attempts` attempts.
pub fn orchestrator(
    connector: MockConnector,
    driver: MockDriver,
    attempts: u32,
) -> Orchestrator<MockConnector, MockDriver> {
    Orchestrator::new(
        connector,
        QueryGenerator::new(driver, DEFAULT_MODEL),
        NonZeroU32::new(attempts).expect("at least one attempt"),
    )
}
