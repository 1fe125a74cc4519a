//! # Transaction Module
//!
//! Journal records. Append-only: one record per deposit or withdrawal, two
//! per transfer (one on each side, pointing at each other).

use crate::error::{CoreError, CoreResult};
use crate::money::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdraw,
    Transfer,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdraw => "withdraw",
            TransactionKind::Transfer => "transfer",
        }
    }

    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdraw" => Ok(TransactionKind::Withdraw),
            "transfer" => Ok(TransactionKind::Transfer),
            _ => Err(CoreError::InvalidTransactionKind(s.to_string())),
        }
    }

    /// Default note written with the record
    fn note(&self, outgoing: bool) -> &'static str {
        match (self, outgoing) {
            (TransactionKind::Deposit, _) => "Deposit",
            (TransactionKind::Withdraw, _) => "Withdrawal",
            (TransactionKind::Transfer, true) => "Transfer to account",
            (TransactionKind::Transfer, false) => "Transfer from account",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An immutable journal record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub account_id: Uuid,
    /// Counterparty for transfers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_account_id: Option<Uuid>,
    pub amount: Amount,
    pub kind: TransactionKind,
    pub note: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    fn new(
        kind: TransactionKind,
        account_id: Uuid,
        related_account_id: Option<Uuid>,
        amount: Amount,
        outgoing: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            related_account_id,
            amount,
            kind,
            note: kind.note(outgoing).to_string(),
            created_at: Utc::now(),
        }
    }

    pub fn deposit(account_id: Uuid, amount: Amount) -> Self {
        Self::new(TransactionKind::Deposit, account_id, None, amount, false)
    }

    pub fn withdrawal(account_id: Uuid, amount: Amount) -> Self {
        Self::new(TransactionKind::Withdraw, account_id, None, amount, true)
    }

    /// The source-side and destination-side records of one transfer
    pub fn transfer_pair(from: Uuid, to: Uuid, amount: Amount) -> (Self, Self) {
        (
            Self::new(TransactionKind::Transfer, from, Some(to), amount, true),
            Self::new(TransactionKind::Transfer, to, Some(from), amount, false),
        )
    }
}
