//! Error type for `contrace-store-sqlite`.

use contrace_core::{
  PersonId, PlaceId, Visit,
  store::{StoreError, StoreErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] contrace_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  /// A stored column could not be turned back into a domain value.
  #[error("decode error: {0}")]
  Decode(String),

  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("place not found: {0}")]
  PlaceNotFound(PlaceId),

  #[error("visit not found: {0}")]
  VisitNotFound(Visit),

  #[error("duplicate person identifier: {0}")]
  DuplicatePerson(PersonId),

  #[error("duplicate place identifier: {0}")]
  DuplicatePlace(PlaceId),

  #[error("duplicate visit: {0}")]
  DuplicateVisit(Visit),
}

impl StoreError for Error {
  fn kind(&self) -> StoreErrorKind {
    match self {
      Self::PersonNotFound(_) | Self::PlaceNotFound(_) | Self::VisitNotFound(_) => {
        StoreErrorKind::NotFound
      }
      Self::DuplicatePerson(_) | Self::DuplicatePlace(_) | Self::DuplicateVisit(_) => {
        StoreErrorKind::Conflict
      }
      Self::Core(e) if e.is_unresolved() => StoreErrorKind::NotFound,
      Self::Core(_) | Self::Database(_) | Self::Sqlite(_) | Self::Json(_) | Self::Decode(_) => {
        StoreErrorKind::Internal
      }
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
