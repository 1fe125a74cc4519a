//! # Bankdesk Core
//!
//! Domain types for the Bankdesk back office: money, accounts, banks,
//! customers, journal transactions and double-entry ledger entries.
//! Nothing here touches the database.

pub mod account;
pub mod bank;
pub mod customer;
pub mod error;
pub mod ledger;
pub mod money;
pub mod transaction;

pub use account::Account;
pub use bank::Bank;
pub use customer::{Customer, Role};
pub use error::{CoreError, CoreResult};
pub use ledger::{EntryType, LedgerEntry};
pub use money::Amount;
pub use transaction::{Transaction, TransactionKind};
