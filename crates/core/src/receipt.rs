use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Money;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ReceiptError {
    #[error("Receipt has no business name")]
    MissingBusinessName,
    #[error("Receipt total must be greater than zero")]
    ZeroTotal,
    #[error("Amount cannot be negative: {0}")]
    NegativeAmount(Decimal),
}

/// Structured fields assembled from one receipt transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRecord {
    pub business_name: String,
    pub address: String,
    pub phone_number: String,
    pub transaction_date: NaiveDate,
    pub total_amount: Money,
    pub gst_amount: Option<Money>,
    /// The full transcript joined by `\n`, exactly as recognized.
    pub raw_text: String,
    pub created_at: DateTime<Utc>,
}

impl ReceiptRecord {
    /// Whether the record may be committed: it needs a business name and a positive total.
    pub fn is_save_worthy(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn validate(&self) -> Result<(), ReceiptError> {
        if self.business_name.is_empty() {
            return Err(ReceiptError::MissingBusinessName);
        }
        if self.total_amount.is_zero() {
            return Err(ReceiptError::ZeroTotal);
        }
        Ok(())
    }
}

/// Field values entered by the user before assembly.
///
/// `business_name` and `address` are kept when non-empty. The remaining
/// fields are starting values that a matching transcript line replaces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptSeed {
    pub business_name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub transaction_date: Option<NaiveDate>,
    pub total_amount: Option<Money>,
    pub gst_amount: Option<Money>,
}

impl ReceiptSeed {
    pub fn is_empty(&self) -> bool {
        *self == ReceiptSeed::default()
    }
}
