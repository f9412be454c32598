//! Places where visits happen.

use serde::{Deserialize, Serialize};

use crate::{PlaceId, person::double_option};

/// A location people can visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
  pub id:      PlaceId,
  pub name:    String,
  pub address: Option<String>,
}

impl Place {
  /// Apply an edit in place. The identifier never changes.
  pub fn apply(&mut self, patch: PlacePatch) {
    if let Some(name) = patch.name {
      self.name = name;
    }
    if let Some(address) = patch.address {
      self.address = address;
    }
  }
}

/// Input to [`crate::store::RecordStore::add_place`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPlace {
  pub id:      Option<PlaceId>,
  pub name:    String,
  #[serde(default)]
  pub address: Option<String>,
}

impl NewPlace {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  pub fn into_place(self) -> Place {
    Place {
      id:      self.id.unwrap_or_else(PlaceId::generate),
      name:    self.name,
      address: self.address,
    }
  }
}

/// A partial edit; see [`crate::PersonPatch`] for the `Option<Option<_>>`
/// convention.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlacePatch {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub name:    Option<String>,
  #[serde(
    default,
    deserialize_with = "double_option",
    skip_serializing_if = "Option::is_none"
  )]
  pub address: Option<Option<String>>,
}

impl PlacePatch {
  pub fn is_empty(&self) -> bool { self.name.is_none() && self.address.is_none() }
}
