//! Database schema definitions
//!
//! Row types for sqlx mapping from SQLite tables.
//! Schema is defined in migrations/20261001000000_init.sql

use crate::error::{PersistenceError, PersistenceResult};
use bankdesk_core::{
    Account, Amount, Bank, Customer, EntryType, LedgerEntry, Role, Transaction, TransactionKind,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Row type for table `customers`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct CustomerRow {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type for table `banks`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct BankRow {
    pub id: String,
    pub name: String,
    pub abbreviation: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Row type for table `accounts`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: String,
    pub customer_id: String,
    pub bank_id: String,
    pub balance: String, // Decimal stored as TEXT
    pub is_active: bool,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row type for table `transactions`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TransactionRow {
    pub id: String,
    pub account_id: String,
    pub related_account_id: Option<String>,
    pub amount: String, // Decimal stored as TEXT
    pub kind: String,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

/// Row type for table `ledger_entries`
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct LedgerRow {
    pub id: String,
    pub account_id: Option<String>,
    pub bank_from_id: Option<String>,
    pub bank_to_id: Option<String>,
    pub amount: String, // Decimal stored as TEXT
    pub transaction_type: String,
    pub entry_type: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

// === Column parsing ===

pub(crate) fn parse_uuid(value: &str) -> PersistenceResult<Uuid> {
    Uuid::parse_str(value).map_err(|_| PersistenceError::InvalidUuid(value.to_string()))
}

fn parse_opt_uuid(value: Option<&str>) -> PersistenceResult<Option<Uuid>> {
    value.map(parse_uuid).transpose()
}

pub(crate) fn parse_decimal(value: &str) -> PersistenceResult<Decimal> {
    Decimal::from_str(value).map_err(|e| PersistenceError::InvalidDecimal(format!("{}: {}", value, e)))
}

fn parse_amount(value: &str) -> PersistenceResult<Amount> {
    Ok(Amount::new(parse_decimal(value)?)?)
}

fn enum_error(field: &str, value: &str) -> PersistenceError {
    PersistenceError::InvalidEnumValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

// === Conversion implementations ===

impl TryFrom<CustomerRow> for Customer {
    type Error = PersistenceError;

    fn try_from(row: CustomerRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            role: Role::parse(&row.role).map_err(|_| enum_error("role", &row.role))?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            password_hash: row.password_hash,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<BankRow> for Bank {
    type Error = PersistenceError;

    fn try_from(row: BankRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            name: row.name,
            abbreviation: row.abbreviation,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<AccountRow> for Account {
    type Error = PersistenceError;

    fn try_from(row: AccountRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            customer_id: parse_uuid(&row.customer_id)?,
            bank_id: parse_uuid(&row.bank_id)?,
            balance: parse_decimal(&row.balance)?,
            is_active: row.is_active,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<TransactionRow> for Transaction {
    type Error = PersistenceError;

    fn try_from(row: TransactionRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            account_id: parse_uuid(&row.account_id)?,
            related_account_id: parse_opt_uuid(row.related_account_id.as_deref())?,
            amount: parse_amount(&row.amount)?,
            kind: TransactionKind::parse(&row.kind).map_err(|_| enum_error("kind", &row.kind))?,
            note: row.note,
            created_at: row.created_at,
        })
    }
}

impl TryFrom<LedgerRow> for LedgerEntry {
    type Error = PersistenceError;

    fn try_from(row: LedgerRow) -> PersistenceResult<Self> {
        Ok(Self {
            id: parse_uuid(&row.id)?,
            account_id: parse_opt_uuid(row.account_id.as_deref())?,
            bank_from_id: parse_opt_uuid(row.bank_from_id.as_deref())?,
            bank_to_id: parse_opt_uuid(row.bank_to_id.as_deref())?,
            amount: parse_amount(&row.amount)?,
            transaction_type: TransactionKind::parse(&row.transaction_type)
                .map_err(|_| enum_error("transaction_type", &row.transaction_type))?,
            entry_type: EntryType::parse(&row.entry_type)
                .map_err(|_| enum_error("entry_type", &row.entry_type))?,
            description: row.description,
            created_at: row.created_at,
        })
    }
}
