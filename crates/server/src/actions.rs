//! Invoice mutations submitted from the dashboard forms.
//!
//! Each operation runs `validate -> persist -> invalidate` once, with a single
//! store call and no retries. Failures are folded into [`ActionOutcome`] so
//! nothing escapes the operation as an error.

use std::sync::Arc;

use acme_core::domain::invoice::InvoiceId;
use acme_core::validation::{validate_invoice_form, FieldErrors, InvoiceFormInput, Validation};
use acme_db::InvoiceRepository;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::ViewInvalidator;

pub const INVOICES_PATH: &str = "/dashboard/invoices";

pub const CREATE_INVALID_MESSAGE: &str = "Missing Fields. Failed to Create Invoice.";
pub const UPDATE_INVALID_MESSAGE: &str = "Missing Fields. Failed to Update Invoice.";
pub const CREATE_FAILED_MESSAGE: &str = "Database Error: Failed to Create Invoice.";
pub const UPDATE_FAILED_MESSAGE: &str = "Database Error: Failed to Update Invoice.";
pub const DELETE_FAILED_MESSAGE: &str = "Database Error: Failed to Delete Invoice.";
pub const DELETE_SUCCEEDED_MESSAGE: &str = "Deleted Invoice.";

/// What the form gets back after a submission.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FormState {
    pub fn message(message: &str) -> Self {
        Self { errors: FieldErrors::default(), message: Some(message.to_string()) }
    }

    fn rejected(errors: FieldErrors, message: &str) -> Self {
        Self { errors, message: Some(message.to_string()) }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Persisted and invalidated; send the browser to this path.
    Redirect(&'static str),
    /// Persisted and invalidated; the caller stays where it is.
    Completed(FormState),
    /// Validation failed before the store was touched.
    Invalid(FormState),
    /// The store rejected the statement.
    Failed(FormState),
}

#[derive(Clone)]
pub struct InvoiceActions {
    invoices: Arc<dyn InvoiceRepository>,
    invalidator: Arc<dyn ViewInvalidator>,
    today: fn() -> NaiveDate,
}

fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

impl InvoiceActions {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self { invoices, invalidator, today: utc_today }
    }

    /// Replaces the clock used to stamp new invoices.
    pub fn with_today(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn create_invoice(&self, input: &InvoiceFormInput) -> ActionOutcome {
        let correlation_id = Uuid::new_v4().to_string();

        let fields = match validate_invoice_form(input) {
            Validation::Valid(fields) => fields,
            Validation::Invalid(errors) => {
                info!(
                    event_name = "invoice.create.rejected",
                    correlation_id = %correlation_id,
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "invoice form failed validation"
                );
                return ActionOutcome::Invalid(FormState::rejected(errors, CREATE_INVALID_MESSAGE));
            }
        };

        let invoice = fields.into_new_invoice((self.today)());
        let amount = invoice.amount.0;
        match self.invoices.insert(invoice).await {
            Ok(invoice_id) => {
                info!(
                    event_name = "invoice.create.persisted",
                    correlation_id = %correlation_id,
                    invoice_id = %invoice_id,
                    amount_cents = amount,
                    "invoice created"
                );
            }
            Err(error) => {
                warn!(
                    event_name = "invoice.create.failed",
                    correlation_id = %correlation_id,
                    error_class = error.class(),
                    error = %error,
                    "invoice insert failed"
                );
                return ActionOutcome::Failed(FormState::message(CREATE_FAILED_MESSAGE));
            }
        }

        self.invalidator.invalidate(INVOICES_PATH).await;
        ActionOutcome::Redirect(INVOICES_PATH)
    }

    /// A missing `id` is not detected; the update silently matches nothing.
    pub async fn update_invoice(&self, id: &InvoiceId, input: &InvoiceFormInput) -> ActionOutcome {
        let correlation_id = Uuid::new_v4().to_string();

        let fields = match validate_invoice_form(input) {
            Validation::Valid(fields) => fields,
            Validation::Invalid(errors) => {
                info!(
                    event_name = "invoice.update.rejected",
                    correlation_id = %correlation_id,
                    invoice_id = %id,
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "invoice form failed validation"
                );
                return ActionOutcome::Invalid(FormState::rejected(errors, UPDATE_INVALID_MESSAGE));
            }
        };

        if let Err(error) = self.invoices.update(id, fields.into_changes()).await {
            warn!(
                event_name = "invoice.update.failed",
                correlation_id = %correlation_id,
                invoice_id = %id,
                error_class = error.class(),
                error = %error,
                "invoice update failed"
            );
            return ActionOutcome::Failed(FormState::message(UPDATE_FAILED_MESSAGE));
        }

        info!(
            event_name = "invoice.update.persisted",
            correlation_id = %correlation_id,
            invoice_id = %id,
            "invoice updated"
        );
        self.invalidator.invalidate(INVOICES_PATH).await;
        ActionOutcome::Redirect(INVOICES_PATH)
    }

    /// Deleting an unknown id succeeds. No redirect: the caller is already on
    /// the listing.
    pub async fn delete_invoice(&self, id: &InvoiceId) -> ActionOutcome {
        let correlation_id = Uuid::new_v4().to_string();

        if let Err(error) = self.invoices.delete(id).await {
            warn!(
                event_name = "invoice.delete.failed",
                correlation_id = %correlation_id,
                invoice_id = %id,
                error_class = error.class(),
                error = %error,
                "invoice delete failed"
            );
            return ActionOutcome::Failed(FormState::message(DELETE_FAILED_MESSAGE));
        }

        info!(
            event_name = "invoice.delete.persisted",
            correlation_id = %correlation_id,
            invoice_id = %id,
            "invoice deleted"
        );
        self.invalidator.invalidate(INVOICES_PATH).await;
        ActionOutcome::Completed(FormState::message(DELETE_SUCCEEDED_MESSAGE))
    }
}
