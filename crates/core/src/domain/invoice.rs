use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub String);

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl FromStr for InvoiceStatus {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(DomainError::UnknownInvoiceStatus(other.to_string())),
        }
    }
}

/// Money in minor units (cents). Always strictly positive once constructed
/// through [`AmountCents::from_major`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountCents(pub i64);

impl AmountCents {
    /// Converts whole currency units to cents, rounding half away from zero.
    pub fn from_major(amount: Decimal) -> Result<Self, DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::NonPositiveAmount);
        }

        let cents = amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .ok_or_else(|| DomainError::AmountOutOfRange(amount.to_string()))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        let cents =
            cents.to_i64().ok_or_else(|| DomainError::AmountOutOfRange(amount.to_string()))?;

        // sub-cent amounts round down to nothing
        if cents <= 0 {
            return Err(DomainError::NonPositiveAmount);
        }

        Ok(Self(cents))
    }

    pub fn to_major(self) -> Decimal {
        Decimal::new(self.0, 2)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// Row contents for an insert; the store assigns the id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewInvoice {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

/// The mutable subset of an invoice. `id` and `date` never change after creation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceChanges {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

impl Invoice {
    pub fn apply(&mut self, changes: InvoiceChanges) {
        self.customer_id = changes.customer_id;
        self.amount = changes.amount;
        self.status = changes.status;
    }
}
