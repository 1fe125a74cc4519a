//! SQLite persistence module
//!
//! Repository pattern for SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    create_pool, init_database, run_migrations, AccountFilter, AccountRepo, BankFilter, BankRepo,
    CustomerFilter, CustomerRepo, LedgerFilter, LedgerRepo, TransactionFilter, TransactionRepo,
    DEFAULT_BUSY_TIMEOUT,
};
pub use schema::{AccountRow, BankRow, CustomerRow, LedgerRow, TransactionRow};
