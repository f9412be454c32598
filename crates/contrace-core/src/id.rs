//! Namespaced record identifiers.
//!
//! People and places live in separate identifier namespaces, distinguished by
//! a single leading marker character: `P` for people and `L` for places
//! (locations). The marker makes an identifier self-describing wherever it is
//! printed, and lets the command layer tell an identifier from a list
//! position at a glance.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Checks the shape shared by both identifier kinds.
fn validate(marker: char, value: &str) -> Result<()> {
  let invalid = |reason| Error::InvalidIdentifier {
    value: value.to_owned(),
    reason,
  };

  let mut chars = value.chars();
  if chars.next() != Some(marker) {
    return Err(invalid(match marker {
      PersonId::MARKER => "person identifiers must start with 'P'",
      _ => "place identifiers must start with 'L'",
    }));
  }
  if chars.as_str().is_empty() {
    return Err(invalid("nothing follows the marker"));
  }
  if value.chars().any(char::is_whitespace) {
    return Err(invalid("identifiers may not contain whitespace"));
  }
  Ok(())
}

/// Eight hex characters taken from a fresh v4 UUID.
fn generated_suffix() -> String {
  let mut simple = Uuid::new_v4().simple().to_string();
  simple.truncate(8);
  simple
}

// ─── PersonId ────────────────────────────────────────────────────────────────

/// Identifier of a [`Person`](crate::Person), e.g. `P1024`.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct PersonId(String);

impl PersonId {
  pub const MARKER: char = 'P';

  pub fn new(value: impl Into<String>) -> Result<Self> {
    let value = value.into();
    validate(Self::MARKER, &value)?;
    Ok(Self(value))
  }

  /// A fresh identifier for callers that don't supply their own.
  pub fn generate() -> Self { Self(format!("{}{}", Self::MARKER, generated_suffix())) }

  pub fn as_str(&self) -> &str { &self.0 }
}

// ─── PlaceId ─────────────────────────────────────────────────────────────────

/// Identifier of a [`Place`](crate::Place), e.g. `L7`.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
  pub const MARKER: char = 'L';

  pub fn new(value: impl Into<String>) -> Result<Self> {
    let value = value.into();
    validate(Self::MARKER, &value)?;
    Ok(Self(value))
  }

  pub fn generate() -> Self { Self(format!("{}{}", Self::MARKER, generated_suffix())) }

  pub fn as_str(&self) -> &str { &self.0 }
}

// ─── Conversions ─────────────────────────────────────────────────────────────

impl fmt::Display for PersonId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for PlaceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl FromStr for PersonId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::new(s) }
}

impl FromStr for PlaceId {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> { Self::new(s) }
}

impl TryFrom<String> for PersonId {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::new(value) }
}

impl TryFrom<String> for PlaceId {
  type Error = Error;

  fn try_from(value: String) -> Result<Self> { Self::new(value) }
}

impl From<PersonId> for String {
  fn from(id: PersonId) -> Self { id.0 }
}

impl From<PlaceId> for String {
  fn from(id: PlaceId) -> Self { id.0 }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_marked_identifiers() {
    assert_eq!(PersonId::new("P17").unwrap().as_str(), "P17");
    assert_eq!(PlaceId::new("L7").unwrap().as_str(), "L7");
  }

  #[test]
  fn rejects_wrong_namespace() {
    assert!(PersonId::new("L7").is_err());
    assert!(PlaceId::new("P17").is_err());
    assert!(PersonId::new("17").is_err());
  }

  #[test]
  fn rejects_bare_marker_and_whitespace() {
    assert!(PersonId::new("P").is_err());
    assert!(PlaceId::new("L 7").is_err());
    assert!(PersonId::new("").is_err());
  }

  #[test]
  fn generated_identifiers_are_valid() {
    let p = PersonId::generate();
    assert!(PersonId::new(p.as_str()).is_ok());
    assert_eq!(p.as_str().len(), 9);

    let l = PlaceId::generate();
    assert!(PlaceId::new(l.as_str()).is_ok());
  }

  #[test]
  fn deserialization_validates() {
    let ok: PersonId = serde_json::from_str("\"P1\"").unwrap();
    assert_eq!(ok.as_str(), "P1");
    assert!(serde_json::from_str::<PersonId>("\"L1\"").is_err());
  }
}
