//! # Bankdesk Business
//!
//! Business logic layer - account movements, ledger, journal, and the
//! bank / customer / account back-office services.
//!
//! Every service borrows a `ServiceContext` and takes the caller's
//! `Principal` explicitly:
//!
//! ```rust,ignore
//! let ctx = ServiceContext::new(db);
//! let receipt = MovementService::new(&ctx)
//!     .deposit(&principal, account_id, dec!(50))
//!     .await?;
//! ```

pub mod access;
pub mod account;
pub mod bank;
pub mod customer;
pub mod error;
pub mod journal;
pub mod ledger;
pub mod movement;
pub mod services;

pub use access::Principal;
pub use account::AccountService;
pub use bank::BankService;
pub use customer::{CustomerService, CustomerUpdate, NewCustomer};
pub use error::{BusinessError, BusinessResult};
pub use journal::JournalService;
pub use ledger::LedgerService;
pub use movement::MovementService;
pub use services::{settle, MovementReceipt, ServiceContext, TransferReceipt};
