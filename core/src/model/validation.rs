// src/model/validation.rs

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

/// One offending input field, as reported back to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field: String,
  pub code: String,
  pub message: String,
}

impl FieldError {
  pub fn new(field: impl Into<String>, code: impl Into<String>, message: impl Into<String>) -> Self {
    Self {
      field: field.into(),
      code: code.into(),
      message: message.into(),
    }
  }
}

/// Flattens `validator` output into a list sorted by field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
  let mut out: Vec<FieldError> = errors
    .field_errors()
    .into_iter()
    .flat_map(|(field, errs)| {
      let field = field.to_string();
      errs.iter().map(move |e| {
        let message = e
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| default_message(&e.code));
        FieldError::new(field.clone(), e.code.to_string(), message)
      })
    })
    .collect();
  out.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.code.cmp(&b.code)));
  out
}

fn default_message(code: &str) -> String {
  match code {
    "length" => "must not be empty".to_string(),
    "range" => "is out of range".to_string(),
    other => format!("failed `{other}` check"),
  }
}

/// Largest amount a `NUMERIC(10, 2)` price column holds.
pub const MAX_PRICE: Decimal = Decimal::from_parts(999_999_999, 0, 0, false, 2);

/// Prices are non-negative and must fit the storage column after rounding to cents.
pub(crate) fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
  if value.is_sign_negative() && !value.is_zero() {
    let mut err = ValidationError::new("non_negative");
    err.message = Some(Cow::Borrowed("must not be negative"));
    return Err(err);
  }
  if crate::model::product::round_price(*value) > MAX_PRICE {
    let mut err = ValidationError::new("max_price");
    err.message = Some(Cow::Borrowed("must not exceed 99999999.99"));
    return Err(err);
  }
  Ok(())
}

pub(crate) fn validate_slug(slug: &str) -> Result<(), ValidationError> {
  let ok = slug
    .chars()
    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
  if !ok {
    let mut err = ValidationError::new("slug");
    err.message = Some(Cow::Borrowed("may only contain lowercase letters, digits and '-'"));
    return Err(err);
  }
  Ok(())
}
