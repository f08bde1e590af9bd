use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::receipt::ReceiptError;

/// A non-negative monetary amount as read off a receipt.
///
/// The decimal is stored exactly as parsed; display rounds to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    pub fn from_decimal(decimal: Decimal) -> Result<Self, ReceiptError> {
        if decimal.is_sign_negative() && !decimal.is_zero() {
            return Err(ReceiptError::NegativeAmount(decimal));
        }
        Ok(Money(decimal))
    }

    pub fn from_cents(cents: u64) -> Self {
        Money(Decimal::from(cents) / Decimal::from(100))
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ReceiptError;
    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Money::from_decimal(value)
    }
}

impl From<Money> for Decimal {
    fn from(value: Money) -> Self {
        value.0
    }
}
