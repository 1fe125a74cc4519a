//! # Ledger Module
//!
//! Double-entry ledger entries. A balance change inside one bank produces a
//! single entry (credit for deposits, debit for withdrawals). A transfer
//! across banks produces a debit on the source account and a credit on the
//! destination account, both tagged with the same `(bank_from, bank_to)` pair.

use crate::error::{CoreError, CoreResult};
use crate::money::Amount;
use crate::transaction::TransactionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Debit,
    Credit,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Debit => "debit",
            EntryType::Credit => "credit",
        }
    }

    /// Lenient parse: surrounding whitespace and case are ignored
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(EntryType::Debit),
            "credit" => Ok(EntryType::Credit),
            _ => Err(CoreError::InvalidEntryType(s.to_string())),
        }
    }
}

impl fmt::Display for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Transaction type implied by an entry: `transfer` when both banks are
/// known, otherwise `deposit` for credits and `withdraw` for debits.
pub fn derive_transaction_type(
    entry_type: EntryType,
    bank_from_id: Option<Uuid>,
    bank_to_id: Option<Uuid>,
) -> TransactionKind {
    match (bank_from_id, bank_to_id, entry_type) {
        (Some(_), Some(_), _) => TransactionKind::Transfer,
        (_, _, EntryType::Credit) => TransactionKind::Deposit,
        (_, _, EntryType::Debit) => TransactionKind::Withdraw,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_from_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_to_id: Option<Uuid>,
    pub amount: Amount,
    pub transaction_type: TransactionKind,
    pub entry_type: EntryType,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    pub fn new(
        account_id: Uuid,
        amount: Amount,
        entry_type: EntryType,
        description: &str,
        bank_from_id: Option<Uuid>,
        bank_to_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id: Some(account_id),
            bank_from_id,
            bank_to_id,
            amount,
            transaction_type: derive_transaction_type(entry_type, bank_from_id, bank_to_id),
            entry_type,
            description: description.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_entry_type_parse() {
        assert_eq!(EntryType::parse(" Debit ").unwrap(), EntryType::Debit);
        assert_eq!(EntryType::parse("CREDIT").unwrap(), EntryType::Credit);
        assert_eq!(
            EntryType::parse("refund"),
            Err(CoreError::InvalidEntryType("refund".to_string()))
        );
    }

    #[test]
    fn test_derive_transaction_type() {
        let a = Some(Uuid::new_v4());
        let b = Some(Uuid::new_v4());

        assert_eq!(derive_transaction_type(EntryType::Debit, a, b), TransactionKind::Transfer);
        assert_eq!(derive_transaction_type(EntryType::Credit, a, b), TransactionKind::Transfer);
        assert_eq!(derive_transaction_type(EntryType::Credit, None, None), TransactionKind::Deposit);
        assert_eq!(derive_transaction_type(EntryType::Debit, None, None), TransactionKind::Withdraw);
        // A single bank id is not enough to call it a transfer
        assert_eq!(derive_transaction_type(EntryType::Credit, a, None), TransactionKind::Deposit);
    }

    #[test]
    fn test_new_entry() {
        let account = Uuid::new_v4();
        let entry = LedgerEntry::new(
            account,
            Amount::new(dec!(50)).unwrap(),
            EntryType::Credit,
            "Deposit",
            None,
            None,
        );

        assert_eq!(entry.account_id, Some(account));
        assert_eq!(entry.transaction_type, TransactionKind::Deposit);
        assert!(entry.bank_from_id.is_none() && entry.bank_to_id.is_none());
    }
}
