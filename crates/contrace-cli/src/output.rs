//! Plain-text rendering of listings and trace reports.
//!
//! Every table numbers rows by their position in the full listing, so the
//! numbers printed next to a filtered view can be fed back as references.

use std::fmt::Write as _;

use contrace_api::trace::{Contacts, ExposedPlaces, HighRiskPlaces};
use contrace_core::{Person, PersonId, Place, PlaceId, Records, ViewFilter, Visit};

fn dash(value: Option<&str>) -> &str { value.unwrap_or("-") }

/// Left-align `rows` into columns separated by two spaces.
fn table(header: &[&str], rows: Vec<Vec<String>>) -> String {
  let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
  for row in &rows {
    for (width, cell) in widths.iter_mut().zip(row) {
      *width = (*width).max(cell.chars().count());
    }
  }

  let mut out = String::new();
  let mut line = |cells: Vec<&str>| {
    let mut text = String::new();
    for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
      if i > 0 {
        text.push_str("  ");
      }
      let _ = write!(text, "{cell:<width$}");
    }
    out.push_str(text.trim_end());
    out.push('\n');
  };

  line(header.to_vec());
  for row in &rows {
    line(row.iter().map(String::as_str).collect());
  }
  out
}

fn person_row(position: usize, person: &Person) -> Vec<String> {
  vec![
    position.to_string(),
    person.id.to_string(),
    person.name.clone(),
    dash(person.phone.as_deref()).to_owned(),
    dash(person.email.as_deref()).to_owned(),
    dash(person.address.as_deref()).to_owned(),
    person.quarantined.to_string(),
    person.infected.to_string(),
  ]
}

fn place_row(position: usize, place: &Place) -> Vec<String> {
  vec![
    position.to_string(),
    place.id.to_string(),
    place.name.clone(),
    dash(place.address.as_deref()).to_owned(),
  ]
}

const PERSON_HEADER: &[&str] =
  &["#", "ID", "NAME", "PHONE", "EMAIL", "ADDRESS", "QUARANTINED", "INFECTED"];
const PLACE_HEADER: &[&str] = &["#", "ID", "NAME", "ADDRESS"];

/// The people listing, optionally narrowed by `filter`.
pub fn people(records: &Records, filter: Option<&ViewFilter<PersonId>>) -> String {
  let rows = records
    .people()
    .iter()
    .enumerate()
    .filter(|(_, p)| filter.is_none_or(|f| f.matches(&p.id)))
    .map(|(i, p)| person_row(i + 1, p))
    .collect();
  table(PERSON_HEADER, rows)
}

/// The place listing, optionally narrowed by `filter`.
pub fn places(records: &Records, filter: Option<&ViewFilter<PlaceId>>) -> String {
  let rows = records
    .places()
    .iter()
    .enumerate()
    .filter(|(_, p)| filter.is_none_or(|f| f.matches(&p.id)))
    .map(|(i, p)| place_row(i + 1, p))
    .collect();
  table(PLACE_HEADER, rows)
}

/// Visits with names resolved through the snapshot.
pub fn visits(records: &Records) -> String {
  let name_of_person =
    |v: &Visit| records.person(&v.person_id).map_or("?", |p| p.name.as_str()).to_owned();
  let name_of_place =
    |v: &Visit| records.place(&v.place_id).map_or("?", |p| p.name.as_str()).to_owned();

  let rows = records
    .visits()
    .iter()
    .map(|v| {
      vec![
        v.date.to_string(),
        v.person_id.to_string(),
        name_of_person(v),
        v.place_id.to_string(),
        name_of_place(v),
      ]
    })
    .collect();
  table(&["DATE", "PERSON", "NAME", "PLACE", "NAME"], rows)
}

pub fn person(person: &Person) -> String {
  format!(
    "{} {}\n  phone:       {}\n  email:       {}\n  address:     {}\n  quarantined: {}\n  infected:    {}\n",
    person.id,
    person.name,
    dash(person.phone.as_deref()),
    dash(person.email.as_deref()),
    dash(person.address.as_deref()),
    person.quarantined,
    person.infected,
  )
}

pub fn place(place: &Place) -> String {
  format!(
    "{} {}\n  address: {}\n",
    place.id,
    place.name,
    dash(place.address.as_deref()),
  )
}

pub fn exposed_places(records: &Records, report: &ExposedPlaces) -> String {
  let filter: ViewFilter<PlaceId> =
    report.places.iter().map(|p| p.id.clone()).collect();
  format!(
    "Places visited by {} ({}) from {} to {}:\n{}",
    report.person.name,
    report.person.id,
    report.window.start(),
    report.window.anchor,
    places(records, Some(&filter)),
  )
}

pub fn contacts(records: &Records, report: &Contacts) -> String {
  let filter: ViewFilter<PersonId> =
    report.contacts.iter().map(|p| p.id.clone()).collect();
  format!(
    "People who shared a place and day with {} ({}) from {} to {}:\n{}",
    report.person.name,
    report.person.id,
    report.window.start(),
    report.window.anchor,
    people(records, Some(&filter)),
  )
}

/// Ranked places, most infected visits first.
pub fn high_risk(report: &HighRiskPlaces) -> String {
  let rows = report
    .places
    .iter()
    .enumerate()
    .map(|(rank, r)| {
      vec![
        (rank + 1).to_string(),
        r.place.id.to_string(),
        r.place.name.clone(),
        r.infected_visits.to_string(),
      ]
    })
    .collect();
  format!(
    "{} of {} places had an infected visitor; showing {}:\n{}",
    report.infected_places,
    report.total_places,
    report.places.len(),
    table(&["RANK", "ID", "NAME", "INFECTED VISITS"], rows),
  )
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;
  use contrace_core::{Flag, NewPerson, NewPlace};

  use super::*;

  fn records() -> Records {
    let mut ana = NewPerson::new("Ana");
    ana.id = Some(PersonId::new("P1").unwrap());
    ana.infected = Flag::Yes;
    let mut ben = NewPerson::new("Ben");
    ben.id = Some(PersonId::new("P2").unwrap());
    let mut cafe = NewPlace::new("Cafe");
    cafe.id = Some(PlaceId::new("L1").unwrap());

    let visit = Visit::new(
      PersonId::new("P1").unwrap(),
      PlaceId::new("L1").unwrap(),
      NaiveDate::from_ymd_opt(2026, 10, 15).unwrap(),
    );
    Records::new(
      vec![ben.into_person(), ana.into_person()],
      vec![cafe.into_place()],
      vec![visit],
    )
    .unwrap()
  }

  #[test]
  fn people_table_is_numbered_by_listing_position() {
    let text = people(&records(), None);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("#  ID  NAME"));
    assert!(lines[1].starts_with("1  P1  Ana"));
    assert!(lines[2].starts_with("2  P2  Ben"));
  }

  #[test]
  fn filtered_rows_keep_their_position() {
    let filter: ViewFilter<PersonId> = [PersonId::new("P2").unwrap()].into_iter().collect();
    let text = people(&records(), Some(&filter));
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("2  P2  Ben"));
  }

  #[test]
  fn visits_resolve_names() {
    let text = visits(&records());
    assert!(text.contains("2026-10-15  P1      Ana   L1     Cafe"));
  }
}
