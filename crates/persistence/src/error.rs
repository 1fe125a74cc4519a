//! # Persistence Errors
//!
//! Error types for the persistence layer, wrapping sqlx and row conversion errors.

use thiserror::Error;

/// Persistence layer errors
#[derive(Debug, Error)]
pub enum PersistenceError {
    // === Database errors ===
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Record already exists: {entity} with {id}")]
    AlreadyExists { entity: String, id: String },

    #[error("Concurrent update detected on {entity} {id}")]
    ConcurrentUpdate { entity: String, id: String },

    // === Unit of work errors ===
    #[error("Unit of work already committed")]
    AlreadyCommitted,

    #[error("Unit of work already rolled back")]
    AlreadyRolledBack,

    // === Conversion errors ===
    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),

    #[error("Invalid uuid value: {0}")]
    InvalidUuid(String),

    #[error("Invalid enum value: {field} = {value}")]
    InvalidEnumValue { field: String, value: String },

    #[error("Invalid stored value: {0}")]
    Core(#[from] bankdesk_core::CoreError),
}

const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;

/// Result type alias for PersistenceError
pub type PersistenceResult<T> = Result<T, PersistenceError>;

impl PersistenceError {
    pub fn not_found(entity: &str, id: &str) -> Self {
        Self::NotFound {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn already_exists(entity: &str, id: &str) -> Self {
        Self::AlreadyExists {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn concurrent_update(entity: &str, id: &str) -> Self {
        Self::ConcurrentUpdate {
            entity: entity.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// SQLITE_BUSY or SQLITE_LOCKED, including their extended codes: another
    /// unit held the write lock for longer than the busy timeout.
    pub fn is_lock_contention(&self) -> bool {
        let Self::Database(sqlx::Error::Database(db_err)) = self else {
            return false;
        };
        db_err
            .code()
            .and_then(|code| code.parse::<i32>().ok())
            .is_some_and(|code| matches!(code & 0xff, SQLITE_BUSY | SQLITE_LOCKED))
    }

    /// Map a unique constraint violation to `AlreadyExists`, pass anything else through
    pub(crate) fn from_write(err: sqlx::Error, entity: &str, key: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                Self::already_exists(entity, key)
            }
            _ => Self::Database(err),
        }
    }
}
