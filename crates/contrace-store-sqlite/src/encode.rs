//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Identifiers are stored as-is. Dates are stored as `YYYY-MM-DD` strings so
//! they sort and compare correctly as text. Flags are stored as compact JSON.

use chrono::NaiveDate;
use contrace_core::{Flag, Person, PersonId, Place, PlaceId, Visit};

use crate::{Error, Result};

// ─── Identifiers ─────────────────────────────────────────────────────────────

pub fn decode_person_id(s: &str) -> Result<PersonId> { Ok(PersonId::new(s)?) }

pub fn decode_place_id(s: &str) -> Result<PlaceId> { Ok(PlaceId::new(s)?) }

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String { date.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::Decode(format!("bad visit date {s:?}: {e}")))
}

// ─── Flag ────────────────────────────────────────────────────────────────────

pub fn encode_flag(flag: Flag) -> Result<String> { Ok(serde_json::to_string(&flag)?) }

pub fn decode_flag(s: &str) -> Result<Flag> { Ok(serde_json::from_str(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `people` row.
pub struct RawPerson {
  pub person_id:   String,
  pub name:        String,
  pub phone:       Option<String>,
  pub email:       Option<String>,
  pub address:     Option<String>,
  pub quarantined: String,
  pub infected:    String,
}

impl RawPerson {
  pub const COLUMNS: &'static str =
    "person_id, name, phone, email, address, quarantined, infected";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:   row.get(0)?,
      name:        row.get(1)?,
      phone:       row.get(2)?,
      email:       row.get(3)?,
      address:     row.get(4)?,
      quarantined: row.get(5)?,
      infected:    row.get(6)?,
    })
  }

  pub fn into_person(self) -> Result<Person> {
    Ok(Person {
      id:          decode_person_id(&self.person_id)?,
      name:        self.name,
      phone:       self.phone,
      email:       self.email,
      address:     self.address,
      quarantined: decode_flag(&self.quarantined)?,
      infected:    decode_flag(&self.infected)?,
    })
  }
}

/// Raw strings read directly from a `places` row.
pub struct RawPlace {
  pub place_id: String,
  pub name:     String,
  pub address:  Option<String>,
}

impl RawPlace {
  pub const COLUMNS: &'static str = "place_id, name, address";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      place_id: row.get(0)?,
      name:     row.get(1)?,
      address:  row.get(2)?,
    })
  }

  pub fn into_place(self) -> Result<Place> {
    Ok(Place {
      id:      decode_place_id(&self.place_id)?,
      name:    self.name,
      address: self.address,
    })
  }
}

/// Raw strings read directly from a `visits` row.
pub struct RawVisit {
  pub person_id:  String,
  pub place_id:   String,
  pub visit_date: String,
}

impl RawVisit {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      person_id:  row.get(0)?,
      place_id:   row.get(1)?,
      visit_date: row.get(2)?,
    })
  }

  pub fn into_visit(self) -> Result<Visit> {
    Ok(Visit {
      person_id: decode_person_id(&self.person_id)?,
      place_id:  decode_place_id(&self.place_id)?,
      date:      decode_date(&self.visit_date)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_round_trip_as_sortable_text() {
    let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    assert_eq!(encode_date(date), "2026-01-05");
    assert_eq!(decode_date("2026-01-05").unwrap(), date);
    assert!(matches!(decode_date("05/01/2026"), Err(Error::Decode(_))));
  }

  #[test]
  fn flags_match_the_column_default() {
    assert_eq!(encode_flag(Flag::No).unwrap(), r#"{"kind":"no"}"#);
    let since = Flag::Since(NaiveDate::from_ymd_opt(2026, 10, 1).unwrap());
    assert_eq!(decode_flag(&encode_flag(since).unwrap()).unwrap(), since);
  }
}
