//! API error type and [`axum::response::IntoResponse`] implementation.

use std::{fmt::Display, str::FromStr};

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use contrace_core::store::{StoreError, StoreErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  /// The request was understood but tracing could not produce a result.
  #[error("{0}")]
  Unprocessable(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ApiError {
  /// Map a backend error onto a response category.
  pub fn store<E: StoreError>(err: E) -> Self {
    match err.kind() {
      StoreErrorKind::NotFound => Self::NotFound(err.to_string()),
      StoreErrorKind::Conflict => Self::Conflict(err.to_string()),
      StoreErrorKind::Internal => Self::Store(Box::new(err)),
    }
  }

  /// Parse a raw path segment, reporting failures as a JSON 400.
  pub fn parse_segment<T>(raw: &str) -> Result<T, Self>
  where
    T: FromStr,
    T::Err: Display,
  {
    raw.parse().map_err(|e| Self::BadRequest(format!("{e}")))
  }
}

impl From<contrace_trace::Error> for ApiError {
  fn from(err: contrace_trace::Error) -> Self {
    use contrace_trace::Error as E;
    match err {
      E::UnresolvedReference(e) => Self::NotFound(e.to_string()),
      e @ (E::NotInfected(_) | E::NoRecentVisits { .. } | E::NoContactsFound(_)) => {
        Self::Unprocessable(e.to_string())
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Unprocessable(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
      }
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
