//! # Account Module
//!
//! An Account belongs to exactly one Customer and one Bank. Its balance is
//! never negative and only the movement service changes it. Closing an
//! account flips `is_active` and keeps the row for the audit trail.

use crate::error::{CoreError, CoreResult};
use crate::money::Amount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A customer's account at a bank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub bank_id: Uuid,
    pub balance: Decimal,
    pub is_active: bool,
    /// Optimistic concurrency token, bumped on every balance write.
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Open a new account with a zero balance
    pub fn open(customer_id: Uuid, bank_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            customer_id,
            bank_id,
            balance: Decimal::ZERO,
            is_active: true,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, customer_id: Uuid) -> bool {
        self.customer_id == customer_id
    }

    /// Balance after crediting `amount`
    pub fn credited(&self, amount: Amount) -> Decimal {
        self.balance + amount.value()
    }

    /// Balance after debiting `amount`, or `InsufficientBalance`
    pub fn debited(&self, amount: Amount) -> CoreResult<Decimal> {
        if self.balance < amount.value() {
            return Err(CoreError::InsufficientBalance {
                needed: amount.value(),
                available: self.balance,
            });
        }
        Ok(self.balance - amount.value())
    }
}
