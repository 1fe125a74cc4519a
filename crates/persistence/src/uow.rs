//! Unit of Work
//!
//! One atomic database transaction. Every write of a money movement goes
//! through the same `UnitOfWork`, and the caller decides whether it is
//! committed or rolled back. Dropping an open unit rolls it back, which
//! covers early returns and cancelled futures.
//!
//! Units start with `BEGIN IMMEDIATE`, so the write lock is taken before the
//! first read. Two units touching the same account queue on that lock
//! (bounded by the pool's busy timeout) instead of both reading and then
//! failing to upgrade.

use crate::error::{PersistenceError, PersistenceResult};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UowState {
    Open,
    Committed,
    RolledBack,
}

pub struct UnitOfWork {
    tx: Option<Transaction<'static, Sqlite>>,
    state: UowState,
}

impl UnitOfWork {
    /// Open a new transaction on the pool
    pub async fn begin(pool: &SqlitePool) -> PersistenceResult<Self> {
        let tx = pool.begin_with("BEGIN IMMEDIATE").await?;
        tracing::debug!("unit of work opened");
        Ok(Self {
            tx: Some(tx),
            state: UowState::Open,
        })
    }

    pub fn state(&self) -> UowState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == UowState::Open
    }

    /// Connection of the underlying transaction, for reads and writes
    pub fn conn(&mut self) -> PersistenceResult<&mut SqliteConnection> {
        match self.state {
            UowState::Committed => Err(PersistenceError::AlreadyCommitted),
            UowState::RolledBack => Err(PersistenceError::AlreadyRolledBack),
            UowState::Open => self
                .tx
                .as_mut()
                .map(|tx| &mut **tx)
                .ok_or(PersistenceError::AlreadyRolledBack),
        }
    }

    /// Make every write visible. Fails with `AlreadyCommitted` on a second call.
    pub async fn commit(&mut self) -> PersistenceResult<()> {
        match self.state {
            UowState::Committed => return Err(PersistenceError::AlreadyCommitted),
            UowState::RolledBack => return Err(PersistenceError::AlreadyRolledBack),
            UowState::Open => {}
        }

        let tx = self.tx.take().ok_or(PersistenceError::AlreadyRolledBack)?;
        match tx.commit().await {
            Ok(()) => {
                self.state = UowState::Committed;
                tracing::debug!("unit of work committed");
                Ok(())
            }
            Err(err) => {
                // The transaction was consumed; sqlite discards it on failure.
                self.state = UowState::RolledBack;
                Err(err.into())
            }
        }
    }

    /// Discard every write. Fails with `AlreadyCommitted` after a commit;
    /// rolling back twice is a no-op.
    pub async fn rollback(&mut self) -> PersistenceResult<()> {
        match self.state {
            UowState::Committed => Err(PersistenceError::AlreadyCommitted),
            UowState::RolledBack => Ok(()),
            UowState::Open => {
                self.state = UowState::RolledBack;
                if let Some(tx) = self.tx.take() {
                    tx.rollback().await?;
                }
                tracing::debug!("unit of work rolled back");
                Ok(())
            }
        }
    }
}

impl Drop for UnitOfWork {
    fn drop(&mut self) {
        if self.is_open() && self.tx.is_some() {
            // sqlx rolls the transaction back when it is dropped
            tracing::warn!("unit of work dropped while open; rolling back");
        }
    }
}
