//! Request-body validation.
//!
//! [`ValidatedJson`] parses the body and runs its [`Validate`] rules before
//! the handler sees it, so no handler ever mutates state on invalid input.

use axum::{
  body::Bytes,
  extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::{ApiError, FieldError};

/// A JSON body that has passed validation.
///
/// An empty body is read as `{}` so that missing required fields are
/// reported as validation errors rather than a parse failure.
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
  S: Send + Sync,
  T: DeserializeOwned + Validate,
{
  type Rejection = ApiError;

  async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
    let bytes = Bytes::from_request(req, state)
      .await
      .map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) { b"{}" } else { &bytes[..] };
    let value: T = serde_json::from_slice(raw)
      .map_err(|e| ApiError::BadRequest(format!("invalid JSON body: {e}")))?;

    value.validate()?;
    Ok(ValidatedJson(value))
  }
}

impl From<ValidationErrors> for ApiError {
  fn from(errors: ValidationErrors) -> Self { ApiError::Validation(field_errors(&errors)) }
}

/// Flatten validator output into one entry per field, sorted by field name.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
  let mut out: Vec<FieldError> = errors
    .field_errors()
    .into_iter()
    .filter_map(|(field, errs)| {
      errs.first().map(|e| FieldError {
        field:   field.to_string(),
        message: e
          .message
          .as_ref()
          .map(|m| m.to_string())
          .unwrap_or_else(|| format!("{field} is invalid")),
      })
    })
    .collect();
  out.sort_by(|a, b| a.field.cmp(&b.field));
  out
}

/// Reject strings that are empty after trimming. Pair with `required` on
/// `Option` fields; the attribute supplies the message.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
  if value.trim().is_empty() {
    return Err(ValidationError::new("blank"));
  }
  Ok(())
}

/// Treat empty and whitespace-only strings as absent.
pub fn non_empty(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}
