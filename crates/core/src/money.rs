//! # Money Module
//!
//! `Amount` is a strictly positive `rust_decimal::Decimal`. Every movement,
//! journal record and ledger entry carries one, so a zero or negative value
//! can never reach the store.

use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A positive amount of money.
///
/// # Examples
/// ```
/// use bankdesk_core::Amount;
/// use rust_decimal::Decimal;
///
/// let amount = Amount::new(Decimal::new(5000, 2)).unwrap();
/// assert_eq!(amount.to_string(), "50.00");
/// assert!(Amount::new(Decimal::ZERO).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    /// Create an amount, rejecting anything `<= 0`
    pub fn new(value: Decimal) -> CoreResult<Self> {
        if value <= Decimal::ZERO {
            return Err(CoreError::InvalidAmount(format!(
                "amount must be greater than zero, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Underlying decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CoreError;

    fn try_from(value: Decimal) -> CoreResult<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Amount::new(value).map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
