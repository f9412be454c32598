//! Visits: dated links between a person and a place.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{PersonId, PlaceId};

/// One person at one place on one calendar date.
///
/// The triple is the visit's whole identity: two visits with the same
/// person, place and date are the same visit. Only identifiers are held;
/// the person's and place's current attributes are always looked up through
/// [`crate::Records`], so edits never leave a stale copy behind.
#[derive(
  Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Visit {
  pub person_id: PersonId,
  pub place_id:  PlaceId,
  pub date:      NaiveDate,
}

impl Visit {
  pub fn new(person_id: PersonId, place_id: PlaceId, date: NaiveDate) -> Self {
    Self { person_id, place_id, date }
  }
}

impl fmt::Display for Visit {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} at {} on {}", self.person_id, self.place_id, self.date)
  }
}
