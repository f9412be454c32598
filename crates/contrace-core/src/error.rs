//! Error types for `contrace-core`.

use thiserror::Error;

use crate::{PersonId, PlaceId, Visit};

#[derive(Debug, Error)]
pub enum Error {
  #[error("person not found: {0}")]
  PersonNotFound(PersonId),

  #[error("place not found: {0}")]
  PlaceNotFound(PlaceId),

  /// A 1-based position that falls outside the displayed list.
  #[error("position {position} is out of range (list has {len} entries)")]
  PositionOutOfRange { position: usize, len: usize },

  #[error("duplicate person identifier: {0}")]
  DuplicatePerson(PersonId),

  #[error("duplicate place identifier: {0}")]
  DuplicatePlace(PlaceId),

  #[error("duplicate visit: {0}")]
  DuplicateVisit(Visit),

  #[error("invalid identifier {value:?}: {reason}")]
  InvalidIdentifier { value: String, reason: &'static str },

  #[error("invalid flag {0:?}: expected yes, no, or a YYYY-MM-DD date")]
  InvalidFlag(String),
}

impl Error {
  /// Whether this error means a supplied reference did not resolve.
  pub fn is_unresolved(&self) -> bool {
    matches!(
      self,
      Self::PersonNotFound(_)
        | Self::PlaceNotFound(_)
        | Self::PositionOutOfRange { .. }
    )
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
