pub mod config;
pub mod domain;
pub mod errors;
pub mod validation;

pub use domain::customer::{Customer, CustomerId};
pub use domain::invoice::{
    AmountCents, Invoice, InvoiceChanges, InvoiceId, InvoiceStatus, NewInvoice,
};
pub use errors::DomainError;
pub use validation::{
    validate_invoice_form, FieldErrors, InvoiceFields, InvoiceFormInput, Validation,
};
