//! Exposure resolution: the places an infected person visited recently.

use contrace_core::{Person, PersonRef, PlaceId, Records, ViewFilter, Visit};
use tracing::debug;

use crate::{Error, Result, TraceWindow, windowed};

/// Resolve `reference` to an infected person and return their visits inside
/// `window`.
///
/// Fails with [`Error::NotInfected`] or [`Error::NoRecentVisits`]; an
/// unresolvable reference surfaces as [`Error::UnresolvedReference`].
pub(crate) fn recent_visits_of_infected<'a>(
  records: &'a Records,
  reference: &PersonRef,
  window: &TraceWindow,
) -> Result<(&'a Person, Vec<&'a Visit>)> {
  let person = records.resolve_person(reference)?;
  if !person.is_infected() {
    return Err(Error::NotInfected(person.id.clone()));
  }

  let recent = windowed(records.visits_of(&person.id), window.anchor, window.days);
  if recent.is_empty() {
    return Err(Error::NoRecentVisits {
      person: person.id.clone(),
      days:   window.days,
    });
  }

  Ok((person, recent))
}

/// Places visited by the infected person behind `reference` within `window`.
///
/// The returned filter selects exactly those places when applied to the
/// place listing.
pub fn exposed_places(
  records: &Records,
  reference: &PersonRef,
  window: &TraceWindow,
) -> Result<ViewFilter<PlaceId>> {
  let (person, recent) = recent_visits_of_infected(records, reference, window)?;

  let places: ViewFilter<PlaceId> =
    recent.into_iter().map(|v| v.place_id.clone()).collect();

  debug!(person = %person.id, places = places.len(), "resolved exposed places");
  Ok(places)
}
