//! Contact resolution: who shared a place and a calendar date with an
//! infected person.
//!
//! Matching is on the exact date of each of the infected person's visits,
//! never on the window as a whole. Visiting the same café on a different day
//! is not contact.

use std::collections::HashSet;

use chrono::NaiveDate;
use contrace_core::{Person, PersonId, PersonRef, PlaceId, Records, ViewFilter, Visit};
use tracing::debug;

use crate::{Error, Result, TraceWindow, exposure::recent_visits_of_infected, windowed};

/// Whether `visit` is `person` staying at their own registered address.
///
/// Such visits are never exposing, whatever the person's quarantine status.
fn is_home_visit(records: &Records, person: &Person, visit: &Visit) -> bool {
  records
    .place(&visit.place_id)
    .ok()
    .and_then(|place| place.address.as_deref())
    .is_some_and(|address| person.lives_at(address))
}

/// Other people who visited one of the infected person's places on the same
/// date, within `window`.
///
/// Fails with [`Error::NoContactsFound`] when the match is empty, in addition
/// to the failures of [`crate::exposure::exposed_places`].
pub fn contacts(
  records: &Records,
  reference: &PersonRef,
  window: &TraceWindow,
) -> Result<ViewFilter<PersonId>> {
  let (infected, recent) = recent_visits_of_infected(records, reference, window)?;

  let exposing: HashSet<(&PlaceId, NaiveDate)> = recent
    .iter()
    .filter(|v| !is_home_visit(records, infected, v))
    .map(|v| (&v.place_id, v.date))
    .collect();

  let found: ViewFilter<PersonId> =
    windowed(records.visits(), window.anchor, window.days)
      .into_iter()
      .filter(|v| v.person_id != infected.id)
      .filter(|v| exposing.contains(&(&v.place_id, v.date)))
      .map(|v| v.person_id.clone())
      .collect();

  debug!(
    person = %infected.id,
    exposing_visits = exposing.len(),
    contacts = found.len(),
    "resolved contacts"
  );

  if found.is_empty() {
    return Err(Error::NoContactsFound(infected.id.clone()));
  }
  Ok(found)
}
