//! [`Records`] — an immutable, validated snapshot of people, places and
//! visits.
//!
//! The snapshot is the read model handed to the tracing engine. It is built
//! once from whatever a [`crate::store::RecordStore`] returns and never
//! mutated afterwards; the store remains the only place mutations happen.

use std::{
  collections::{BTreeSet, HashMap, HashSet},
  fmt,
  str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::{Error, Person, PersonId, Place, PlaceId, Result, Visit};

// ─── References ──────────────────────────────────────────────────────────────

/// How the command layer points at a person: by 1-based position in the
/// displayed list, or by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PersonRef {
  Position(usize),
  Id(PersonId),
}

/// As [`PersonRef`], for places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaceRef {
  Position(usize),
  Id(PlaceId),
}

impl FromStr for PersonRef {
  type Err = Error;

  /// All-digit input is a position, anything else must be an identifier.
  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    match s.parse::<usize>() {
      Ok(position) => Ok(Self::Position(position)),
      Err(_) => PersonId::new(s).map(Self::Id),
    }
  }
}

impl FromStr for PlaceRef {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    let s = s.trim();
    match s.parse::<usize>() {
      Ok(position) => Ok(Self::Position(position)),
      Err(_) => PlaceId::new(s).map(Self::Id),
    }
  }
}

impl From<PersonId> for PersonRef {
  fn from(id: PersonId) -> Self { Self::Id(id) }
}

impl From<PlaceId> for PlaceRef {
  fn from(id: PlaceId) -> Self { Self::Id(id) }
}

impl fmt::Display for PersonRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Position(n) => write!(f, "#{n}"),
      Self::Id(id) => write!(f, "{id}"),
    }
  }
}

// ─── ViewFilter ──────────────────────────────────────────────────────────────

/// A record that can be selected by a [`ViewFilter`].
pub trait Keyed {
  type Key: Ord;

  fn key(&self) -> &Self::Key;
}

impl Keyed for Person {
  type Key = PersonId;

  fn key(&self) -> &PersonId { &self.id }
}

impl Keyed for Place {
  type Key = PlaceId;

  fn key(&self) -> &PlaceId { &self.id }
}

/// "Identifier is a member of this set": the predicate a query hands back to
/// the caller, who applies it to a listing for display.
///
/// The set is ordered, so iterating it or applying it is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewFilter<K: Ord> {
  ids: BTreeSet<K>,
}

impl<K: Ord> ViewFilter<K> {
  pub fn matches(&self, id: &K) -> bool { self.ids.contains(id) }

  /// Keep only the items whose key is in the set, preserving input order.
  pub fn apply<'a, T>(&self, items: &'a [T]) -> Vec<&'a T>
  where
    T: Keyed<Key = K>,
  {
    items.iter().filter(|item| self.matches(item.key())).collect()
  }

  pub fn ids(&self) -> impl Iterator<Item = &K> { self.ids.iter() }

  pub fn len(&self) -> usize { self.ids.len() }

  pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

impl<K: Ord> FromIterator<K> for ViewFilter<K> {
  fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
    Self { ids: iter.into_iter().collect() }
  }
}

impl<K: Ord> IntoIterator for ViewFilter<K> {
  type Item = K;
  type IntoIter = std::collections::btree_set::IntoIter<K>;

  fn into_iter(self) -> Self::IntoIter { self.ids.into_iter() }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A validated snapshot of the whole record store.
///
/// Construction enforces the model invariants: identifiers are unique
/// within their collection, no two visits share a (person, place, date)
/// triple, and every visit points at an existing person and place.
/// Listings are kept in a stable order (people and places by identifier,
/// visits by date then person then place) so positional references resolve
/// the same way every time.
#[derive(Debug, Clone, Default)]
pub struct Records {
  people:       Vec<Person>,
  places:       Vec<Place>,
  visits:       Vec<Visit>,
  person_index: HashMap<PersonId, usize>,
  place_index:  HashMap<PlaceId, usize>,
}

impl Records {
  pub fn new(
    mut people: Vec<Person>,
    mut places: Vec<Place>,
    mut visits: Vec<Visit>,
  ) -> Result<Self> {
    people.sort_by(|a, b| a.id.cmp(&b.id));
    places.sort_by(|a, b| a.id.cmp(&b.id));
    visits.sort_by(|a, b| {
      (a.date, &a.person_id, &a.place_id).cmp(&(b.date, &b.person_id, &b.place_id))
    });

    let mut person_index = HashMap::with_capacity(people.len());
    for (i, person) in people.iter().enumerate() {
      if person_index.insert(person.id.clone(), i).is_some() {
        return Err(Error::DuplicatePerson(person.id.clone()));
      }
    }

    let mut place_index = HashMap::with_capacity(places.len());
    for (i, place) in places.iter().enumerate() {
      if place_index.insert(place.id.clone(), i).is_some() {
        return Err(Error::DuplicatePlace(place.id.clone()));
      }
    }

    let mut seen = HashSet::with_capacity(visits.len());
    for visit in &visits {
      if !person_index.contains_key(&visit.person_id) {
        return Err(Error::PersonNotFound(visit.person_id.clone()));
      }
      if !place_index.contains_key(&visit.place_id) {
        return Err(Error::PlaceNotFound(visit.place_id.clone()));
      }
      if !seen.insert(visit) {
        return Err(Error::DuplicateVisit(visit.clone()));
      }
    }

    Ok(Self { people, places, visits, person_index, place_index })
  }

  // ── Listings ──────────────────────────────────────────────────────────────

  pub fn people(&self) -> &[Person] { &self.people }

  pub fn places(&self) -> &[Place] { &self.places }

  pub fn visits(&self) -> &[Visit] { &self.visits }

  // ── Lookups ───────────────────────────────────────────────────────────────

  pub fn person(&self, id: &PersonId) -> Result<&Person> {
    self
      .person_index
      .get(id)
      .map(|&i| &self.people[i])
      .ok_or_else(|| Error::PersonNotFound(id.clone()))
  }

  pub fn place(&self, id: &PlaceId) -> Result<&Place> {
    self
      .place_index
      .get(id)
      .map(|&i| &self.places[i])
      .ok_or_else(|| Error::PlaceNotFound(id.clone()))
  }

  /// The person at 1-based `position` in [`Self::people`].
  pub fn person_at(&self, position: usize) -> Result<&Person> {
    position
      .checked_sub(1)
      .and_then(|i| self.people.get(i))
      .ok_or(Error::PositionOutOfRange { position, len: self.people.len() })
  }

  /// The place at 1-based `position` in [`Self::places`].
  pub fn place_at(&self, position: usize) -> Result<&Place> {
    position
      .checked_sub(1)
      .and_then(|i| self.places.get(i))
      .ok_or(Error::PositionOutOfRange { position, len: self.places.len() })
  }

  pub fn resolve_person(&self, reference: &PersonRef) -> Result<&Person> {
    match reference {
      PersonRef::Position(n) => self.person_at(*n),
      PersonRef::Id(id) => self.person(id),
    }
  }

  pub fn resolve_place(&self, reference: &PlaceRef) -> Result<&Place> {
    match reference {
      PlaceRef::Position(n) => self.place_at(*n),
      PlaceRef::Id(id) => self.place(id),
    }
  }

  // ── Filtered views ────────────────────────────────────────────────────────

  pub fn filtered_people(&self, filter: &ViewFilter<PersonId>) -> Vec<&Person> {
    filter.apply(&self.people)
  }

  pub fn filtered_places(&self, filter: &ViewFilter<PlaceId>) -> Vec<&Place> {
    filter.apply(&self.places)
  }

  pub fn visits_of<'a>(
    &'a self,
    person_id: &'a PersonId,
  ) -> impl Iterator<Item = &'a Visit> + 'a {
    self.visits.iter().filter(move |v| &v.person_id == person_id)
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{NewPerson, NewPlace};

  fn person(id: &str) -> Person {
    let mut p = NewPerson::new(id).into_person();
    p.id = PersonId::new(id).unwrap();
    p
  }

  fn place(id: &str) -> Place {
    let mut l = NewPlace::new(id).into_place();
    l.id = PlaceId::new(id).unwrap();
    l
  }

  fn visit(p: &str, l: &str, day: u32) -> Visit {
    Visit::new(
      PersonId::new(p).unwrap(),
      PlaceId::new(l).unwrap(),
      NaiveDate::from_ymd_opt(2026, 10, day).unwrap(),
    )
  }

  #[test]
  fn listings_are_sorted_and_positions_are_one_based() {
    let records = Records::new(
      vec![person("P2"), person("P1")],
      vec![place("L9"), place("L3")],
      vec![],
    )
    .unwrap();

    assert_eq!(records.person_at(1).unwrap().id.as_str(), "P1");
    assert_eq!(records.person_at(2).unwrap().id.as_str(), "P2");
    assert!(matches!(
      records.person_at(0),
      Err(Error::PositionOutOfRange { position: 0, len: 2 })
    ));
    assert!(records.person_at(3).is_err());
    assert_eq!(records.place_at(1).unwrap().id.as_str(), "L3");
  }

  #[test]
  fn rejects_duplicate_people_and_places() {
    let err = Records::new(vec![person("P1"), person("P1")], vec![], vec![])
      .unwrap_err();
    assert!(matches!(err, Error::DuplicatePerson(_)));

    let err = Records::new(vec![], vec![place("L1"), place("L1")], vec![])
      .unwrap_err();
    assert!(matches!(err, Error::DuplicatePlace(_)));
  }

  #[test]
  fn rejects_duplicate_visit_triples() {
    let err = Records::new(
      vec![person("P1")],
      vec![place("L1")],
      vec![visit("P1", "L1", 3), visit("P1", "L1", 3)],
    )
    .unwrap_err();
    assert!(matches!(err, Error::DuplicateVisit(_)));

    // Same pair on another day is a different visit.
    assert!(
      Records::new(
        vec![person("P1")],
        vec![place("L1")],
        vec![visit("P1", "L1", 3), visit("P1", "L1", 4)],
      )
      .is_ok()
    );
  }

  #[test]
  fn rejects_dangling_visits() {
    let err = Records::new(vec![], vec![place("L1")], vec![visit("P1", "L1", 3)])
      .unwrap_err();
    assert!(matches!(err, Error::PersonNotFound(_)));

    let err = Records::new(vec![person("P1")], vec![], vec![visit("P1", "L1", 3)])
      .unwrap_err();
    assert!(matches!(err, Error::PlaceNotFound(_)));
  }

  #[test]
  fn resolves_references() {
    let records = Records::new(vec![person("P5")], vec![], vec![]).unwrap();
    let by_pos = records.resolve_person(&"1".parse().unwrap()).unwrap();
    let by_id = records.resolve_person(&"P5".parse().unwrap()).unwrap();
    assert_eq!(by_pos.id, by_id.id);

    let err = records
      .resolve_person(&PersonRef::Id(PersonId::new("P6").unwrap()))
      .unwrap_err();
    assert!(err.is_unresolved());
  }

  #[test]
  fn view_filter_preserves_listing_order() {
    let records = Records::new(
      vec![person("P1"), person("P2"), person("P3")],
      vec![],
      vec![],
    )
    .unwrap();
    let filter: ViewFilter<PersonId> = ["P3", "P1"]
      .into_iter()
      .map(|s| PersonId::new(s).unwrap())
      .collect();

    let shown: Vec<_> = records
      .filtered_people(&filter)
      .into_iter()
      .map(|p| p.id.as_str())
      .collect();
    assert_eq!(shown, ["P1", "P3"]);
    assert!(!filter.matches(&PersonId::new("P2").unwrap()));
  }
}
