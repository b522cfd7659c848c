use thiserror::Error;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("unknown invoice status `{0}` (expected pending|paid)")]
    UnknownInvoiceStatus(String),
    #[error("invoice amount must be greater than zero")]
    NonPositiveAmount,
    #[error("invoice amount `{0}` does not fit in minor units")]
    AmountOutOfRange(String),
}
