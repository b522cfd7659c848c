//! Validation of the raw invoice form.
//!
//! Create and update share one field set, so a single validator covers both;
//! the caller picks the summary message for its operation.

use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::customer::CustomerId;
use crate::domain::invoice::{AmountCents, InvoiceChanges, InvoiceStatus, NewInvoice};
use crate::errors::DomainError;

pub const FIELD_CUSTOMER_ID: &str = "customerId";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_STATUS: &str = "status";

pub const CUSTOMER_REQUIRED_MESSAGE: &str = "Please select a customer.";
pub const AMOUNT_POSITIVE_MESSAGE: &str = "Please enter an amount greater than $0.";
pub const AMOUNT_RANGE_MESSAGE: &str = "Please enter a smaller amount.";
pub const STATUS_REQUIRED_MESSAGE: &str = "Please select an invoice status.";

/// Raw form fields as submitted. Absent fields stay `None`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormInput {
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

impl InvoiceFormInput {
    pub fn new(
        customer_id: impl Into<String>,
        amount: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            customer_id: Some(customer_id.into()),
            amount: Some(amount.into()),
            status: Some(status.into()),
        }
    }
}

/// Field name to the list of messages for that field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.entry(field.to_string()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// Typed, constrained values produced by a successful validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceFields {
    pub customer_id: CustomerId,
    pub amount: AmountCents,
    pub status: InvoiceStatus,
}

impl InvoiceFields {
    pub fn into_new_invoice(self, date: NaiveDate) -> NewInvoice {
        NewInvoice { customer_id: self.customer_id, amount: self.amount, status: self.status, date }
    }

    pub fn into_changes(self) -> InvoiceChanges {
        InvoiceChanges { customer_id: self.customer_id, amount: self.amount, status: self.status }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Validation {
    Valid(InvoiceFields),
    Invalid(FieldErrors),
}

/// Checks every field and collects all failures before returning.
pub fn validate_invoice_form(input: &InvoiceFormInput) -> Validation {
    let mut errors = FieldErrors::default();

    // blank means unselected; anything else is kept exactly as submitted
    let customer_id = match input.customer_id.as_deref() {
        Some(value) if !value.trim().is_empty() => Some(CustomerId(value.to_string())),
        _ => {
            errors.push(FIELD_CUSTOMER_ID, CUSTOMER_REQUIRED_MESSAGE);
            None
        }
    };

    let amount = match parse_amount(input.amount.as_deref()) {
        Ok(amount) => Some(amount),
        Err(message) => {
            errors.push(FIELD_AMOUNT, message);
            None
        }
    };

    let status = match input.status.as_deref().map(InvoiceStatus::from_str) {
        Some(Ok(status)) => Some(status),
        _ => {
            errors.push(FIELD_STATUS, STATUS_REQUIRED_MESSAGE);
            None
        }
    };

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) if errors.is_empty() => {
            Validation::Valid(InvoiceFields { customer_id, amount, status })
        }
        _ => Validation::Invalid(errors),
    }
}

/// Amount text to minor units, or the message to show on the amount field.
fn parse_amount(raw: Option<&str>) -> Result<AmountCents, &'static str> {
    let value = match coerce_number(raw) {
        Coerced::Number(value) => value,
        Coerced::NotANumber => return Err(AMOUNT_POSITIVE_MESSAGE),
        Coerced::TooLarge => return Err(AMOUNT_RANGE_MESSAGE),
    };

    AmountCents::from_major(value).map_err(|error| match error {
        DomainError::AmountOutOfRange(_) => AMOUNT_RANGE_MESSAGE,
        _ => AMOUNT_POSITIVE_MESSAGE,
    })
}

#[derive(Debug, PartialEq, Eq)]
enum Coerced {
    Number(Decimal),
    NotANumber,
    TooLarge,
}

/// Numeric coercion of form text: blank or absent input is zero, anything
/// that is not a plain decimal or scientific literal is not a number.
fn coerce_number(raw: Option<&str>) -> Coerced {
    let trimmed = raw.unwrap_or_default().trim();
    if trimmed.is_empty() {
        return Coerced::Number(Decimal::ZERO);
    }
    if !is_decimal_literal(trimmed) {
        return Coerced::NotANumber;
    }

    match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
        Ok(value) => Coerced::Number(value),
        Err(_) => match trimmed.parse::<f64>() {
            Ok(value) if value >= 1.0 => Coerced::TooLarge,
            // hugely negative or finer than Decimal's scale: never a positive amount
            _ => Coerced::Number(Decimal::ZERO),
        },
    }
}

/// `[+-]digits[.digits][(e|E)[+-]digits]`, with digits on at least one side of the point.
fn is_decimal_literal(text: &str) -> bool {
    let digits = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());

    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.find(['e', 'E']) {
        Some(at) => (&unsigned[..at], Some(&unsigned[at + 1..])),
        None => (unsigned, None),
    };

    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if (whole.is_empty() && fraction.is_empty()) || !digits(whole) || !digits(fraction) {
        return false;
    }

    match exponent {
        Some(exponent) => {
            let exponent = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
            !exponent.is_empty() && digits(exponent)
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{
        coerce_number, is_decimal_literal, validate_invoice_form, Coerced, InvoiceFormInput,
        Validation, AMOUNT_POSITIVE_MESSAGE, AMOUNT_RANGE_MESSAGE, CUSTOMER_REQUIRED_MESSAGE,
        FIELD_AMOUNT, FIELD_CUSTOMER_ID, FIELD_STATUS, STATUS_REQUIRED_MESSAGE,
    };
    use crate::domain::customer::CustomerId;
    use crate::domain::invoice::{AmountCents, InvoiceStatus};

    fn invalid_fields(input: InvoiceFormInput) -> super::FieldErrors {
        match validate_invoice_form(&input) {
            Validation::Invalid(errors) => errors,
            Validation::Valid(fields) => panic!("expected validation failure, got {fields:?}"),
        }
    }

    #[test]
    fn valid_form_produces_typed_fields() {
        let result = validate_invoice_form(&InvoiceFormInput::new("c1", "15.50", "paid"));

        let Validation::Valid(fields) = result else {
            panic!("expected valid form");
        };
        assert_eq!(fields.customer_id, CustomerId("c1".to_string()));
        assert_eq!(fields.amount, AmountCents(1550));
        assert_eq!(fields.status, InvoiceStatus::Paid);
    }

    #[test]
    fn non_positive_amounts_are_rejected_on_amount_field() {
        for amount in ["0", "-1", "-0.01", "0.00", "", "   "] {
            let errors = invalid_fields(InvoiceFormInput::new("c1", amount, "pending"));
            assert_eq!(
                errors.get(FIELD_AMOUNT),
                Some(&[AMOUNT_POSITIVE_MESSAGE.to_string()][..]),
                "amount `{amount}` should be rejected"
            );
            assert!(!errors.contains(FIELD_CUSTOMER_ID));
            assert!(!errors.contains(FIELD_STATUS));
        }
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        for amount in ["twelve", "1_000", "1__5", "0x10", "Infinity", "1,5", "1e", "."] {
            let errors = invalid_fields(InvoiceFormInput::new("c1", amount, "paid"));
            assert_eq!(
                errors.get(FIELD_AMOUNT),
                Some(&[AMOUNT_POSITIVE_MESSAGE.to_string()][..]),
                "amount `{amount}` should not be read as a number"
            );
        }
    }

    #[test]
    fn oversized_amount_gets_range_message() {
        for amount in ["1e30", "1e20", "99999999999999999999999999999999"] {
            let errors = invalid_fields(InvoiceFormInput::new("c1", amount, "paid"));
            assert_eq!(
                errors.get(FIELD_AMOUNT),
                Some(&[AMOUNT_RANGE_MESSAGE.to_string()][..]),
                "amount `{amount}` should be reported as too large"
            );
        }

        let negative = invalid_fields(InvoiceFormInput::new("c1", "-1e30", "paid"));
        assert_eq!(negative.get(FIELD_AMOUNT), Some(&[AMOUNT_POSITIVE_MESSAGE.to_string()][..]));
    }

    #[test]
    fn customer_id_is_kept_as_submitted() {
        let result = validate_invoice_form(&InvoiceFormInput::new(" c1 ", "10", "paid"));

        let Validation::Valid(fields) = result else {
            panic!("padded customer id should still be accepted");
        };
        assert_eq!(fields.customer_id, CustomerId(" c1 ".to_string()));
    }

    #[test]
    fn missing_amount_coerces_to_zero_and_fails() {
        let errors = invalid_fields(InvoiceFormInput {
            customer_id: Some("c1".to_string()),
            amount: None,
            status: Some("paid".to_string()),
        });
        assert!(errors.contains(FIELD_AMOUNT));
    }

    #[test]
    fn unknown_status_is_rejected_on_status_field() {
        for status in ["overdue", "PAID", "", " paid"] {
            let errors = invalid_fields(InvoiceFormInput::new("c1", "10", status));
            assert_eq!(
                errors.get(FIELD_STATUS),
                Some(&[STATUS_REQUIRED_MESSAGE.to_string()][..]),
                "status `{status}` should be rejected"
            );
        }
    }

    #[test]
    fn missing_customer_is_rejected_on_customer_field() {
        let errors = invalid_fields(InvoiceFormInput {
            customer_id: None,
            amount: Some("10".to_string()),
            status: Some("paid".to_string()),
        });
        assert_eq!(
            errors.get(FIELD_CUSTOMER_ID),
            Some(&[CUSTOMER_REQUIRED_MESSAGE.to_string()][..])
        );

        let blank = invalid_fields(InvoiceFormInput::new("  ", "10", "paid"));
        assert!(blank.contains(FIELD_CUSTOMER_ID));
    }

    #[test]
    fn all_failing_fields_are_reported_together() {
        let errors = invalid_fields(InvoiceFormInput::default());

        assert_eq!(errors.len(), 3);
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec![FIELD_AMOUNT, FIELD_CUSTOMER_ID, FIELD_STATUS]
        );
    }

    #[test]
    fn field_errors_serialize_as_plain_map() {
        let errors = invalid_fields(InvoiceFormInput::new("c1", "0", "paid"));
        let json = serde_json::to_value(&errors).expect("serialize");

        assert_eq!(json, serde_json::json!({ "amount": [AMOUNT_POSITIVE_MESSAGE] }));
    }

    #[test]
    fn form_input_deserializes_from_camel_case_keys() {
        let input: InvoiceFormInput =
            serde_json::from_value(serde_json::json!({ "customerId": "c9", "amount": "3" }))
                .expect("deserialize");

        assert_eq!(input.customer_id.as_deref(), Some("c9"));
        assert_eq!(input.amount.as_deref(), Some("3"));
        assert_eq!(input.status, None);
    }

    #[test]
    fn number_coercion_accepts_padding_and_scientific_notation() {
        assert_eq!(coerce_number(Some(" 42 ")), Coerced::Number(Decimal::from(42)));
        assert_eq!(coerce_number(Some("1e2")), Coerced::Number(Decimal::from(100)));
        assert_eq!(coerce_number(Some("-2.5")), Coerced::Number(Decimal::new(-25, 1)));
        assert_eq!(coerce_number(None), Coerced::Number(Decimal::ZERO));
        assert_eq!(coerce_number(Some("1.2.3")), Coerced::NotANumber);
        assert_eq!(coerce_number(Some("1_000")), Coerced::NotANumber);
        assert_eq!(coerce_number(Some("1e30")), Coerced::TooLarge);
    }

    #[test]
    fn decimal_literal_grammar() {
        for accepted in ["0", "15.50", ".5", "5.", "+3", "-1", "1e2", "2.5E-3", "7e+1"] {
            assert!(is_decimal_literal(accepted), "`{accepted}` should be a literal");
        }
        for rejected in ["", ".", "+", "1_0", "1e", "e5", "1e2.5", "--1", "1 000", "NaN"] {
            assert!(!is_decimal_literal(rejected), "`{rejected}` should not be a literal");
        }
    }
}
