//! Retry budget exhaustion.

use crate::TabulaError;

/// Every attempt of the generate/extract/execute unit failed.
///
/// Only the error from the final attempt is retained; earlier failures are
/// logged as they happen.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("All {} attempts failed; last error: {}", attempts, last)]
pub struct ExhaustedError {
    /// Number of attempts made
    pub attempts: u32,
    /// Error from the final attempt
    #[error(source)]
    pub last: Box<TabulaError>,
}

impl ExhaustedError {
    /// Record exhaustion after `attempts` tries ending in `last`.
    pub fn new(attempts: u32, last: TabulaError) -> Self {
        Self {
            attempts,
            last: Box::new(last),
        }
    }
}
