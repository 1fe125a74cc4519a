//! Business layer errors
//!
//! Every service returns `BusinessError`. Domain and persistence errors are
//! folded into the variants the API layer knows how to present.

use bankdesk_core::CoreError;
use bankdesk_persistence::PersistenceError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Business operation errors
#[derive(Debug, Error)]
pub enum BusinessError {
    // === Validation errors ===
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid entry type: {0}")]
    InvalidEntryType(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance {
        required: Decimal,
        available: Decimal,
    },

    #[error("Cannot transfer from an account to itself")]
    SameAccountTransfer,

    // === Permission errors ===
    #[error("Account {account_id} is not owned by the caller")]
    NotOwner { account_id: String },

    #[error("Operation not permitted: {0}")]
    Forbidden(String),

    // === State errors ===
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: String, id: String },

    #[error("Unit of work already committed")]
    AlreadyCommitted,

    #[error("Conflicting update: {0}")]
    Conflict(String),

    // === Infrastructure ===
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

impl BusinessError {
    pub fn insufficient_balance(required: Decimal, available: Decimal) -> Self {
        Self::InsufficientBalance {
            required,
            available,
        }
    }

    pub fn not_owner(account_id: impl ToString) -> Self {
        Self::NotOwner {
            account_id: account_id.to_string(),
        }
    }

    pub fn forbidden(operation: &str) -> Self {
        Self::Forbidden(operation.to_string())
    }

    pub fn not_found(entity: &str, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    /// True for failures the caller cannot fix by changing the request
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::AlreadyCommitted)
    }
}

impl From<CoreError> for BusinessError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidAmount(msg) => Self::InvalidAmount(msg),
            CoreError::InsufficientBalance { needed, available } => {
                Self::insufficient_balance(needed, available)
            }
            CoreError::InvalidEntryType(value) => Self::InvalidEntryType(value),
            CoreError::InvalidTransactionKind(value) => {
                Self::Validation(format!("unknown transaction kind '{}'", value))
            }
            CoreError::InvalidRole(value) => Self::Validation(format!("unknown role '{}'", value)),
            CoreError::Validation(msg) => Self::Validation(msg),
        }
    }
}

impl From<PersistenceError> for BusinessError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::NotFound { entity, id } => Self::NotFound { entity, id },
            PersistenceError::AlreadyExists { entity, id } => Self::AlreadyExists { entity, id },
            PersistenceError::ConcurrentUpdate { entity, id } => {
                Self::Conflict(format!("{} {} was modified concurrently", entity, id))
            }
            PersistenceError::AlreadyCommitted => Self::AlreadyCommitted,
            // Another unit kept the write lock past the busy timeout
            err if err.is_lock_contention() => {
                Self::Conflict(format!("store busy, retry the request: {}", err))
            }
            // Anything else is a store failure or corrupt row
            other => Self::Internal(other.to_string()),
        }
    }
}
