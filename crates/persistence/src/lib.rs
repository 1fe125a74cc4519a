//! # Bankdesk Persistence
//!
//! SQLite storage for accounts, the transaction journal and the ledger.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │                   Database                    │
//! │  ┌──────────────┐         ┌────────────────┐  │
//! │  │  SqlitePool  │ ──────▶ │  UnitOfWork    │  │
//! │  │   (reads)    │  begin  │  (one tx)      │  │
//! │  └──────────────┘         └────────────────┘  │
//! │            Repos: query either one            │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bankdesk_persistence::{AccountRepo, Database};
//!
//! let db = Database::init("sqlite:data/bankdesk.db", 5).await?;
//!
//! let mut uow = db.begin().await?;
//! let account = AccountRepo::get_active_by_id(uow.conn()?, account_id).await?;
//! AccountRepo::update_balance(&mut uow, account.id, new_balance, account.version).await?;
//! uow.commit().await?;
//! ```

pub mod error;
pub mod page;
pub mod sqlite;
pub mod uow;

pub use error::{PersistenceError, PersistenceResult};
pub use page::{Page, Paginated, DEFAULT_LIMIT, MAX_LIMIT};
pub use sqlite::{
    init_database, AccountFilter, AccountRepo, BankFilter, BankRepo, CustomerFilter, CustomerRepo,
    LedgerFilter, LedgerRepo, TransactionFilter, TransactionRepo, DEFAULT_BUSY_TIMEOUT,
};
pub use uow::{UnitOfWork, UowState};

use sqlx::SqlitePool;
use std::time::Duration;

/// Database facade: the pool plus unit-of-work creation
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect and run migrations, with the default busy timeout
    pub async fn init(db_url: &str, max_connections: u32) -> PersistenceResult<Self> {
        Self::init_with(db_url, max_connections, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Connect and run migrations. A unit that cannot get the write lock
    /// within `busy_timeout` fails with a lock-contention error.
    pub async fn init_with(
        db_url: &str,
        max_connections: u32,
        busy_timeout: Duration,
    ) -> PersistenceResult<Self> {
        let pool = init_database(db_url, max_connections, busy_timeout).await?;
        Ok(Self { pool })
    }

    /// Get SQLite connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a unit of work
    pub async fn begin(&self) -> PersistenceResult<UnitOfWork> {
        UnitOfWork::begin(&self.pool).await
    }
}
