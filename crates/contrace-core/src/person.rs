//! People and their health status.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{Error, PersonId, Result};

// ─── Flag ────────────────────────────────────────────────────────────────────

/// A status that is either simply set/unset or set since a known date.
///
/// Used for both quarantine and infection. Tracing only ever asks "is it
/// set?"; the onset date is kept for the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "since", rename_all = "snake_case")]
pub enum Flag {
  #[default]
  No,
  Yes,
  Since(NaiveDate),
}

impl Flag {
  pub fn is_set(&self) -> bool { !matches!(self, Self::No) }

  /// The onset date, when one was recorded.
  pub fn since(&self) -> Option<NaiveDate> {
    match self {
      Self::Since(date) => Some(*date),
      _ => None,
    }
  }
}

impl From<bool> for Flag {
  fn from(set: bool) -> Self { if set { Self::Yes } else { Self::No } }
}

impl fmt::Display for Flag {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::No => f.write_str("no"),
      Self::Yes => f.write_str("yes"),
      Self::Since(date) => write!(f, "{date}"),
    }
  }
}

impl FromStr for Flag {
  type Err = Error;

  /// Accepts `yes`/`true`/`y`, `no`/`false`/`n` (any case), or an ISO date.
  fn from_str(s: &str) -> Result<Self> {
    let trimmed = s.trim();
    match trimmed.to_ascii_lowercase().as_str() {
      "yes" | "true" | "y" => Ok(Self::Yes),
      "no" | "false" | "n" => Ok(Self::No),
      _ => NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .map(Self::Since)
        .map_err(|_| Error::InvalidFlag(s.to_owned())),
    }
  }
}

// ─── Person ──────────────────────────────────────────────────────────────────

/// A tracked individual.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
  pub id:          PersonId,
  pub name:        String,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  /// Registered home address. Visits here don't count as exposing.
  pub address:     Option<String>,
  pub quarantined: Flag,
  pub infected:    Flag,
}

impl Person {
  pub fn is_infected(&self) -> bool { self.infected.is_set() }

  pub fn is_quarantined(&self) -> bool { self.quarantined.is_set() }

  /// Whether `address` is this person's registered home address.
  ///
  /// Comparison ignores surrounding whitespace and ASCII case. A blank
  /// address never matches anything.
  pub fn lives_at(&self, address: &str) -> bool {
    match self.address.as_deref().map(str::trim) {
      Some(home) if !home.is_empty() => home.eq_ignore_ascii_case(address.trim()),
      _ => false,
    }
  }

  /// Apply an edit in place. The identifier never changes.
  pub fn apply(&mut self, patch: PersonPatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(phone) = patch.phone {
      self.phone = phone;
    }
    if let Some(email) = patch.email {
      self.email = email;
    }
    if let Some(address) = patch.address {
      self.address = address;
    }
    if let Some(quarantined) = patch.quarantined {
      self.quarantined = quarantined;
    }
    if let Some(infected) = patch.infected {
      self.infected = infected;
    }
  }
}

// ─── NewPerson ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::RecordStore::add_person`].
/// When `id` is `None` the store generates one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPerson {
  pub id:          Option<PersonId>,
  pub name:        String,
  #[serde(default)]
  pub phone:       Option<String>,
  #[serde(default)]
  pub email:       Option<String>,
  #[serde(default)]
  pub address:     Option<String>,
  #[serde(default)]
  pub quarantined: Flag,
  #[serde(default)]
  pub infected:    Flag,
}

impl NewPerson {
  /// Convenience constructor with all optional fields left empty.
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn into_person(self) -> Person {
    Person {
      id:          self.id.unwrap_or_else(PersonId::generate),
      name:        self.name,
      phone:       self.phone,
      email:       self.email,
      address:     self.address,
      quarantined: self.quarantined,
      infected:    self.infected,
    }
  }
}

// ─── PersonPatch ─────────────────────────────────────────────────────────────

/// A partial edit. `None` leaves a field untouched; for optional contact
/// fields, `Some(None)` clears the value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonPatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:        Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub phone:       Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub email:       Option<Option<String>>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub address:     Option<Option<String>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub quarantined: Option<Flag>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub infected:    Option<Flag>,
}

impl PersonPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.phone.is_none()
      && self.email.is_none()
      && self.address.is_none()
      && self.quarantined.is_none()
      && self.infected.is_none()
  }
}

/// Distinguishes an explicit JSON `null` (clear the field) from an absent
/// key (leave it alone).
pub(crate) fn double_option<'de, D, T>(
  deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}
