//! Atomic unit-of-work seam.
//!
//! # Responsibility
//! - Run a group of store calls with all-or-nothing visibility.
//!
//! # Invariants
//! - `Ok` from the work closure commits; any `Err` rolls everything back.

use crate::repo::sqlite_store::{ensure_tracker_connection_ready, SqliteTrackerStore};
use crate::repo::store::{RepoError, RepoResult, TrackerStore};
use rusqlite::{Connection, TransactionBehavior};

/// Provides transactional access to a `TrackerStore`.
pub trait UnitOfWork {
    /// Runs `work` inside one transaction.
    fn atomically<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&dyn TrackerStore) -> Result<T, E>;
}

/// SQLite unit of work backed by `BEGIN IMMEDIATE` transactions.
pub struct SqliteUnitOfWork<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteUnitOfWork<'conn> {
    /// Wraps a migrated connection, rejecting ones without tracker tables.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_tracker_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn atomically<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        E: From<RepoError>,
        F: FnOnce(&dyn TrackerStore) -> Result<T, E>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(RepoError::from)?;

        // Dropping `tx` on the error path rolls back.
        let value = {
            let store = SqliteTrackerStore::new(&tx);
            work(&store as &dyn TrackerStore)?
        };

        tx.commit().map_err(RepoError::from)?;
        Ok(value)
    }
}
