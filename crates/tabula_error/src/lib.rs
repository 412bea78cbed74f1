//! Error types for the Tabula text-to-SQL pipeline.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! | Error | Raised by | Retried? |
//! |-------|-----------|----------|
//! | [`ConfigError`] | startup configuration | no, fatal at startup |
//! | [`DatabaseError`] (`Connection`) | acquiring a connection | no |
//! | [`DatabaseError`] (`Query`) | executing a statement | yes |
//! | [`GenerationError`] | completion service | yes |
//! | [`ExtractionError`] | fenced-block extraction | yes |
//! | [`ExhaustedError`] | retry loop | terminal |

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod database;
mod error;
mod exhausted;
mod extraction;
mod generation;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind, DatabaseResult};
pub use error::{TabulaError, TabulaErrorKind, TabulaResult};
pub use exhausted::ExhaustedError;
pub use extraction::{ExtractionError, ExtractionErrorKind};
pub use generation::{GenerationError, GenerationErrorKind};
