//! Service context and shared result types

use crate::error::BusinessResult;
use bankdesk_core::{Account, LedgerEntry, Transaction};
use bankdesk_persistence::{Database, UnitOfWork};
use serde::Serialize;
use sqlx::SqlitePool;

/// Context for business operations - contains database access
#[derive(Clone)]
pub struct ServiceContext {
    db: Database,
}

impl ServiceContext {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Get database pool
    pub fn pool(&self) -> &SqlitePool {
        self.db.pool()
    }

    /// Start a unit of work
    pub async fn begin(&self) -> BusinessResult<UnitOfWork> {
        Ok(self.db.begin().await?)
    }
}

/// Commit the unit when `result` is Ok, roll it back otherwise.
///
/// A failed commit is returned as the error of the whole operation. A failed
/// rollback is logged and the original error wins.
pub async fn settle<T>(mut uow: UnitOfWork, result: BusinessResult<T>) -> BusinessResult<T> {
    match result {
        Ok(value) => {
            uow.commit().await?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = uow.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

/// Outcome of a deposit or withdrawal
#[derive(Debug, Clone, Serialize)]
pub struct MovementReceipt {
    pub account: Account,
    pub transaction: Transaction,
    pub ledger_entries: Vec<LedgerEntry>,
}

/// Outcome of a transfer
#[derive(Debug, Clone, Serialize)]
pub struct TransferReceipt {
    pub from_account: Account,
    pub to_account: Account,
    pub transactions: Vec<Transaction>,
    /// Empty for transfers inside one bank
    pub ledger_entries: Vec<LedgerEntry>,
}
