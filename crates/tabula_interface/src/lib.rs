//! Trait definitions for the Tabula text-to-SQL pipeline.
//!
//! The pipeline talks to two external capabilities:
//!
//! - a language-model completion service, behind [`CompletionDriver`]
//! - a database, behind [`Connector`] (acquisition) and
//!   [`DatabaseConnection`] (schema reflection and query execution)
//!
//! [`ConnectionGuard`] gives connections their scoped lifetime.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod guard;
mod traits;

pub use guard::ConnectionGuard;
pub use traits::{CompletionDriver, Connector, DatabaseConnection};
