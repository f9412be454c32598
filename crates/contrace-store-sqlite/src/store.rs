//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use contrace_core::{
  NewPerson, NewPlace, Person, PersonId, PersonPatch, Place, PlaceId,
  PlacePatch, Records, Visit, store::RecordStore,
};
use rusqlite::{Connection, OptionalExtension as _};
use tracing::{debug, info};

use crate::{
  Error, Result,
  encode::{RawPerson, RawPlace, RawVisit, encode_date, encode_flag},
  schema::SCHEMA,
};

// ─── Insert outcomes ─────────────────────────────────────────────────────────

/// What happened inside a check-then-insert closure. The checks and the
/// insert run in one `call` so nothing can slip in between them.
enum Outcome {
  Inserted,
  Duplicate,
  MissingPerson,
  MissingPlace,
}

fn row_exists(
  conn: &Connection,
  sql: &str,
  params: impl rusqlite::Params,
) -> rusqlite::Result<bool> {
  Ok(conn.query_row(sql, params, |_| Ok(())).optional()?.is_some())
}

// ─── Row access ──────────────────────────────────────────────────────────────

// Synchronous helpers that run on the connection thread. Callers compose
// them inside a single `call` when several statements must see one state.

fn select_person(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawPerson>> {
  let sql = format!("SELECT {} FROM people WHERE person_id = ?1", RawPerson::COLUMNS);
  conn
    .query_row(&sql, rusqlite::params![id], RawPerson::from_row)
    .optional()
}

fn select_place(conn: &Connection, id: &str) -> rusqlite::Result<Option<RawPlace>> {
  let sql = format!("SELECT {} FROM places WHERE place_id = ?1", RawPlace::COLUMNS);
  conn
    .query_row(&sql, rusqlite::params![id], RawPlace::from_row)
    .optional()
}

fn all_people(conn: &Connection) -> rusqlite::Result<Vec<RawPerson>> {
  let sql = format!("SELECT {} FROM people ORDER BY person_id", RawPerson::COLUMNS);
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map([], RawPerson::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn all_places(conn: &Connection) -> rusqlite::Result<Vec<RawPlace>> {
  let sql = format!("SELECT {} FROM places ORDER BY place_id", RawPlace::COLUMNS);
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt
    .query_map([], RawPlace::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

fn all_visits(conn: &Connection) -> rusqlite::Result<Vec<RawVisit>> {
  let mut stmt = conn.prepare(
    "SELECT person_id, place_id, visit_date FROM visits
     ORDER BY visit_date, person_id, place_id",
  )?;
  let rows = stmt
    .query_map([], RawVisit::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  Ok(rows)
}

/// Read, patch and write back one person in a single transaction.
/// `None` if no such person exists.
fn edit_person_in(
  conn: &mut Connection,
  id: &str,
  patch: PersonPatch,
) -> Result<Option<Person>> {
  let tx = conn.transaction()?;
  let Some(raw) = select_person(&tx, id)? else {
    return Ok(None);
  };
  let mut person = raw.into_person()?;
  person.apply(patch);

  tx.execute(
    "UPDATE people
       SET name = ?2, phone = ?3, email = ?4, address = ?5,
           quarantined = ?6, infected = ?7
     WHERE person_id = ?1",
    rusqlite::params![
      id,
      person.name,
      person.phone,
      person.email,
      person.address,
      encode_flag(person.quarantined)?,
      encode_flag(person.infected)?,
    ],
  )?;
  tx.commit()?;
  Ok(Some(person))
}

fn edit_place_in(
  conn: &mut Connection,
  id: &str,
  patch: PlacePatch,
) -> Result<Option<Place>> {
  let tx = conn.transaction()?;
  let Some(raw) = select_place(&tx, id)? else {
    return Ok(None);
  };
  let mut place = raw.into_place()?;
  place.apply(patch);

  tx.execute(
    "UPDATE places SET name = ?2, address = ?3 WHERE place_id = ?1",
    rusqlite::params![id, place.name, place.address],
  )?;
  tx.commit()?;
  Ok(Some(place))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contrace record store backed by a single SQLite file.
///
/// Clones share the same underlying connection.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open a private in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  // ── People ────────────────────────────────────────────────────────────────

  async fn add_person(&self, input: NewPerson) -> Result<Person> {
    let person = input.into_person();

    let id          = person.id.to_string();
    let name        = person.name.clone();
    let phone       = person.phone.clone();
    let email       = person.email.clone();
    let address     = person.address.clone();
    let quarantined = encode_flag(person.quarantined)?;
    let infected    = encode_flag(person.infected)?;

    let outcome = self
      .conn
      .call(move |conn| {
        if row_exists(
          conn,
          "SELECT 1 FROM people WHERE person_id = ?1",
          rusqlite::params![id],
        )? {
          return Ok(Outcome::Duplicate);
        }
        conn.execute(
          "INSERT INTO people (
             person_id, name, phone, email, address, quarantined, infected
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id, name, phone, email, address, quarantined, infected],
        )?;
        Ok(Outcome::Inserted)
      })
      .await?;

    match outcome {
      Outcome::Inserted => {
        info!(person = %person.id, "added person");
        Ok(person)
      }
      _ => Err(Error::DuplicatePerson(person.id)),
    }
  }

  async fn edit_person(&self, id: PersonId, patch: PersonPatch) -> Result<Person> {
    let id_str = id.to_string();
    let person = self
      .conn
      .call(move |conn| Ok(edit_person_in(conn, &id_str, patch)))
      .await??
      .ok_or(Error::PersonNotFound(id))?;

    info!(person = %person.id, infected = person.is_infected(), "edited person");
    Ok(person)
  }

  async fn delete_person(&self, id: PersonId) -> Result<Person> {
    let person = self
      .get_person(id.clone())
      .await?
      .ok_or_else(|| Error::PersonNotFound(id.clone()))?;

    let id_str = id.to_string();
    let removed_visits: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let visits: i64 = tx.query_row(
          "SELECT COUNT(*) FROM visits WHERE person_id = ?1",
          rusqlite::params![id_str],
          |r| r.get(0),
        )?;
        tx.execute(
          "DELETE FROM people WHERE person_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(visits as usize)
      })
      .await?;

    info!(person = %id, removed_visits, "deleted person");
    Ok(person)
  }

  async fn get_person(&self, id: PersonId) -> Result<Option<Person>> {
    let id_str = id.to_string();
    let raw = self
      .conn
      .call(move |conn| Ok(select_person(conn, &id_str)?))
      .await?;

    raw.map(RawPerson::into_person).transpose()
  }

  async fn list_people(&self) -> Result<Vec<Person>> {
    let raws = self.conn.call(|conn| Ok(all_people(conn)?)).await?;
    raws.into_iter().map(RawPerson::into_person).collect()
  }

  // ── Places ────────────────────────────────────────────────────────────────

  async fn add_place(&self, input: NewPlace) -> Result<Place> {
    let place = input.into_place();

    let id      = place.id.to_string();
    let name    = place.name.clone();
    let address = place.address.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        if row_exists(
          conn,
          "SELECT 1 FROM places WHERE place_id = ?1",
          rusqlite::params![id],
        )? {
          return Ok(Outcome::Duplicate);
        }
        conn.execute(
          "INSERT INTO places (place_id, name, address) VALUES (?1, ?2, ?3)",
          rusqlite::params![id, name, address],
        )?;
        Ok(Outcome::Inserted)
      })
      .await?;

    match outcome {
      Outcome::Inserted => {
        info!(place = %place.id, "added place");
        Ok(place)
      }
      _ => Err(Error::DuplicatePlace(place.id)),
    }
  }

  async fn edit_place(&self, id: PlaceId, patch: PlacePatch) -> Result<Place> {
    let id_str = id.to_string();
    let place = self
      .conn
      .call(move |conn| Ok(edit_place_in(conn, &id_str, patch)))
      .await??
      .ok_or(Error::PlaceNotFound(id))?;

    info!(place = %place.id, "edited place");
    Ok(place)
  }

  async fn delete_place(&self, id: PlaceId) -> Result<Place> {
    let place = self
      .get_place(id.clone())
      .await?
      .ok_or_else(|| Error::PlaceNotFound(id.clone()))?;

    let id_str = id.to_string();
    let removed_visits: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let visits: i64 = tx.query_row(
          "SELECT COUNT(*) FROM visits WHERE place_id = ?1",
          rusqlite::params![id_str],
          |r| r.get(0),
        )?;
        tx.execute(
          "DELETE FROM places WHERE place_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(visits as usize)
      })
      .await?;

    info!(place = %id, removed_visits, "deleted place");
    Ok(place)
  }

  async fn get_place(&self, id: PlaceId) -> Result<Option<Place>> {
    let id_str = id.to_string();
    let raw = self
      .conn
      .call(move |conn| Ok(select_place(conn, &id_str)?))
      .await?;

    raw.map(RawPlace::into_place).transpose()
  }

  async fn list_places(&self) -> Result<Vec<Place>> {
    let raws = self.conn.call(|conn| Ok(all_places(conn)?)).await?;
    raws.into_iter().map(RawPlace::into_place).collect()
  }

  // ── Visits ────────────────────────────────────────────────────────────────

  async fn add_visit(&self, visit: Visit) -> Result<Visit> {
    let person_id = visit.person_id.to_string();
    let place_id  = visit.place_id.to_string();
    let date      = encode_date(visit.date);

    let outcome = self
      .conn
      .call(move |conn| {
        if !row_exists(
          conn,
          "SELECT 1 FROM people WHERE person_id = ?1",
          rusqlite::params![person_id],
        )? {
          return Ok(Outcome::MissingPerson);
        }
        if !row_exists(
          conn,
          "SELECT 1 FROM places WHERE place_id = ?1",
          rusqlite::params![place_id],
        )? {
          return Ok(Outcome::MissingPlace);
        }
        if row_exists(
          conn,
          "SELECT 1 FROM visits
           WHERE person_id = ?1 AND place_id = ?2 AND visit_date = ?3",
          rusqlite::params![person_id, place_id, date],
        )? {
          return Ok(Outcome::Duplicate);
        }
        conn.execute(
          "INSERT INTO visits (person_id, place_id, visit_date) VALUES (?1, ?2, ?3)",
          rusqlite::params![person_id, place_id, date],
        )?;
        Ok(Outcome::Inserted)
      })
      .await?;

    match outcome {
      Outcome::Inserted => {
        info!(%visit, "added visit");
        Ok(visit)
      }
      Outcome::Duplicate => Err(Error::DuplicateVisit(visit)),
      Outcome::MissingPerson => Err(Error::PersonNotFound(visit.person_id)),
      Outcome::MissingPlace => Err(Error::PlaceNotFound(visit.place_id)),
    }
  }

  async fn delete_visit(&self, visit: Visit) -> Result<()> {
    let person_id = visit.person_id.to_string();
    let place_id  = visit.place_id.to_string();
    let date      = encode_date(visit.date);

    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM visits
           WHERE person_id = ?1 AND place_id = ?2 AND visit_date = ?3",
          rusqlite::params![person_id, place_id, date],
        )?)
      })
      .await?;

    if removed == 0 {
      return Err(Error::VisitNotFound(visit));
    }
    info!(%visit, "deleted visit");
    Ok(())
  }

  async fn list_visits(&self) -> Result<Vec<Visit>> {
    let raws = self.conn.call(|conn| Ok(all_visits(conn)?)).await?;
    raws.into_iter().map(RawVisit::into_visit).collect()
  }

  // ── Snapshot ──────────────────────────────────────────────────────────────

  /// All three tables are read inside one transaction, so a concurrent
  /// write is either fully visible or not at all.
  async fn snapshot(&self) -> Result<Records> {
    let (people, places, visits) = self
      .conn
      .call(|conn| {
        let tx = conn.transaction()?;
        let rows = (all_people(&tx)?, all_places(&tx)?, all_visits(&tx)?);
        tx.commit()?;
        Ok(rows)
      })
      .await?;

    let people = people
      .into_iter()
      .map(RawPerson::into_person)
      .collect::<Result<Vec<_>>>()?;
    let places = places
      .into_iter()
      .map(RawPlace::into_place)
      .collect::<Result<Vec<_>>>()?;
    let visits = visits
      .into_iter()
      .map(RawVisit::into_visit)
      .collect::<Result<Vec<_>>>()?;

    debug!(
      people = people.len(),
      places = places.len(),
      visits = visits.len(),
      "loaded snapshot"
    );
    Ok(Records::new(people, places, visits)?)
  }
}
