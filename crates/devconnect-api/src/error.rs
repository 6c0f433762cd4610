//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! Every failure is rendered as the same JSON document:
//! `{"kind": "...", "message": "...", "errors": [...]}`, where `errors` is
//! only present for validation failures.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// One failing field in a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   String,
  pub message: String,
}

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("request validation failed")]
  Validation(Vec<FieldError>),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("invalid id: {0}")]
  InvalidId(String),

  #[error("not found: {0}")]
  NotFound(String),

  #[error("unauthorized: {0}")]
  Unauthorized(&'static str),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Wrap a backend error.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }

  pub fn kind(&self) -> &'static str {
    match self {
      ApiError::Validation(_) => "validation",
      ApiError::BadRequest(_) => "bad_request",
      ApiError::InvalidId(_) => "invalid_id",
      ApiError::NotFound(_) => "not_found",
      ApiError::Unauthorized(_) => "unauthorized",
      ApiError::Store(_) => "server_error",
    }
  }

  pub fn status(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) | ApiError::BadRequest(_) | ApiError::InvalidId(_) => {
        StatusCode::BAD_REQUEST
      }
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
      ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
  kind:    &'static str,
  message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  errors:  Option<&'a [FieldError]>,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let message = match &self {
      ApiError::Validation(_) => self.to_string(),
      ApiError::BadRequest(m) | ApiError::InvalidId(m) | ApiError::NotFound(m) => m.clone(),
      ApiError::Unauthorized(m) => (*m).to_owned(),
      // Backend details stay in the log.
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store error");
        "server error".to_owned()
      }
    };
    let errors = match &self {
      ApiError::Validation(fields) => Some(fields.as_slice()),
      _ => None,
    };
    let body = ErrorBody { kind: self.kind(), message, errors };
    (self.status(), Json(body)).into_response()
  }
}
