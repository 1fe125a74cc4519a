//! # Error Module
//!
//! Domain errors for Bankdesk. These never touch infrastructure; persistence
//! and business layers wrap them.

use rust_decimal::Decimal;
use thiserror::Error;

/// Core domain errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    // === Money errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Insufficient balance: need {needed}, available {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },

    // === Enum parsing errors ===
    #[error("Invalid entry type: {0} (expected 'debit' or 'credit')")]
    InvalidEntryType(String),

    #[error("Invalid transaction kind: {0}")]
    InvalidTransactionKind(String),

    #[error("Invalid role: {0}")]
    InvalidRole(String),

    // === Validation errors ===
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    pub fn is_insufficient_balance(&self) -> bool {
        matches!(self, CoreError::InsufficientBalance { .. })
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::Validation(message.into())
    }
}
