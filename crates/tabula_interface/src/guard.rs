//! Scoped connection release.

use crate::DatabaseConnection;
use std::ops::{Deref, DerefMut};
use tabula_error::DatabaseResult;
use tracing::{debug, warn};

/// Owns a connection and closes it exactly once.
///
/// Call [`ConnectionGuard::release`] to close explicitly and observe the
/// result; otherwise the connection is closed when the guard drops, on every
/// exit path including early returns and unwinding.
#[derive(Debug)]
pub struct ConnectionGuard<C: DatabaseConnection> {
    connection: C,
    released: bool,
}

impl<C: DatabaseConnection> ConnectionGuard<C> {
    /// Take ownership of an open connection.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            released: false,
        }
    }

    /// Close the connection now.
    pub fn release(mut self) -> DatabaseResult<()> {
        self.close_once()
    }

    fn close_once(&mut self) -> DatabaseResult<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;
        debug!(dialect = %self.connection.dialect(), "Releasing database connection");
        self.connection.close()
    }
}

impl<C: DatabaseConnection> Deref for ConnectionGuard<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.connection
    }
}

impl<C: DatabaseConnection> DerefMut for ConnectionGuard<C> {
    fn deref_mut(&mut self) -> &mut C {
        &mut self.connection
    }
}

impl<C: DatabaseConnection> Drop for ConnectionGuard<C> {
    fn drop(&mut self) {
        if let Err(e) = self.close_once() {
            warn!(error = %e, "Failed to close database connection");
        }
    }
}
