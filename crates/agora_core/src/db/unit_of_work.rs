//! Transactional scope bounding one action's persistence work.
//!
//! # Responsibility
//! - Hand repositories a connection view that writes into one transaction.
//! - Make commit and rollback explicit, consuming calls.
//!
//! # Invariants
//! - A unit of work ends exactly once: commit, rollback, or drop.
//! - Dropping an unfinished unit of work rolls it back.

use super::DbResult;
use log::{debug, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::time::Instant;

/// Persistence scope handed to import and export orchestration.
///
/// Import orchestration is generic over this trait so the commit/rollback
/// decision can be observed independently from SQLite.
pub trait UnitOfWork {
    /// Connection view whose writes belong to this unit of work.
    fn conn(&self) -> &Connection;

    /// Makes every write performed through [`UnitOfWork::conn`] durable.
    fn commit(self) -> DbResult<()>
    where
        Self: Sized;

    /// Discards every write performed through [`UnitOfWork::conn`].
    fn rollback(self) -> DbResult<()>
    where
        Self: Sized;
}

/// SQLite transaction-backed unit of work.
pub struct SqliteUnitOfWork<'conn> {
    tx: Transaction<'conn>,
    label: &'static str,
    started_at: Instant,
}

impl<'conn> SqliteUnitOfWork<'conn> {
    /// Starts a write scope, taking the database write lock up front.
    pub fn begin(conn: &'conn mut Connection, label: &'static str) -> DbResult<Self> {
        Self::begin_with(conn, label, TransactionBehavior::Immediate)
    }

    /// Starts a read scope; the lock is only taken when a statement runs.
    pub fn begin_read(conn: &'conn mut Connection, label: &'static str) -> DbResult<Self> {
        Self::begin_with(conn, label, TransactionBehavior::Deferred)
    }

    fn begin_with(
        conn: &'conn mut Connection,
        label: &'static str,
        behavior: TransactionBehavior,
    ) -> DbResult<Self> {
        let tx = conn.transaction_with_behavior(behavior)?;
        debug!("event=uow_begin module=db status=ok label={label}");
        Ok(Self {
            tx,
            label,
            started_at: Instant::now(),
        })
    }

    /// Ends a read scope, logging instead of failing when release errors.
    pub fn release(self) {
        let label = self.label;
        if let Err(err) = self.rollback() {
            warn!("event=uow_release module=db status=error label={label} error={err}");
        }
    }
}

impl UnitOfWork for SqliteUnitOfWork<'_> {
    fn conn(&self) -> &Connection {
        &self.tx
    }

    fn commit(self) -> DbResult<()> {
        let label = self.label;
        let elapsed = self.started_at.elapsed().as_millis();
        match self.tx.commit() {
            Ok(()) => {
                debug!(
                    "event=uow_commit module=db status=ok label={label} duration_ms={elapsed}"
                );
                Ok(())
            }
            Err(err) => {
                warn!(
                    "event=uow_commit module=db status=error label={label} duration_ms={elapsed} error={err}"
                );
                Err(err.into())
            }
        }
    }

    fn rollback(self) -> DbResult<()> {
        let label = self.label;
        let elapsed = self.started_at.elapsed().as_millis();
        self.tx.rollback()?;
        debug!("event=uow_rollback module=db status=ok label={label} duration_ms={elapsed}");
        Ok(())
    }
}
