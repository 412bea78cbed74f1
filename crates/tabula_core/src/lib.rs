//! Core data types for the Tabula text-to-SQL pipeline.
//!
//! This crate provides the plain data passed between the pipeline stages:
//! conversation messages for the completion service, the inbound task
//! request, the schema snapshot, and query results.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod message;
mod request;
mod result;
mod role;
mod schema;
mod task;

pub use message::Message;
pub use request::{
    GenerateRequest, GenerateRequestBuilder, GenerateRequestBuilderError, GenerateResponse,
    TokenUsage,
};
pub use result::{QueryResult, Row};
pub use role::Role;
pub use schema::{ColumnInfo, SchemaInfo, SqlDialect};
pub use task::TaskRequest;
