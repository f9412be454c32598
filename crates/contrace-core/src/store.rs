//! The `RecordStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `contrace-store-sqlite`).
//! Higher layers (`contrace-api`, `contrace-cli`) depend on this abstraction,
//! not on any concrete backend. The tracing engine never sees the store at
//! all; it works on the [`Records`] snapshot returned by
//! [`RecordStore::snapshot`].

use std::future::Future;

use crate::{
  NewPerson, NewPlace, Person, PersonId, PersonPatch, Place, PlaceId,
  PlacePatch, Records, Visit,
};

// ─── Error classification ────────────────────────────────────────────────────

/// Coarse category of a store failure, so callers can react without knowing
/// the concrete backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorKind {
  /// A referenced person, place or visit does not exist.
  NotFound,
  /// The write would break a uniqueness invariant.
  Conflict,
  /// Anything else: I/O, corruption, driver errors.
  Internal,
}

pub trait StoreError: std::error::Error + Send + Sync + 'static {
  fn kind(&self) -> StoreErrorKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a contrace record store backend.
///
/// Implementations must uphold the model invariants at the boundary:
/// - person and place identifiers are unique within their collection;
/// - a visit is rejected unless its person and place exist;
/// - no two visits share a (person, place, date) triple;
/// - deleting a person or place deletes every visit that references it.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: StoreError;

  // ── People ────────────────────────────────────────────────────────────

  /// Persist a new person. Generates an identifier when none is given.
  fn add_person(
    &self,
    input: NewPerson,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Apply `patch` and return the updated person.
  fn edit_person(
    &self,
    id: PersonId,
    patch: PersonPatch,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Remove a person and all of their visits. Returns the removed record.
  fn delete_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Person, Self::Error>> + Send + '_;

  /// Retrieve a person by identifier. Returns `None` if not found.
  fn get_person(
    &self,
    id: PersonId,
  ) -> impl Future<Output = Result<Option<Person>, Self::Error>> + Send + '_;

  /// All people, ordered by identifier.
  fn list_people(
    &self,
  ) -> impl Future<Output = Result<Vec<Person>, Self::Error>> + Send + '_;

  // ── Places ────────────────────────────────────────────────────────────

  fn add_place(
    &self,
    input: NewPlace,
  ) -> impl Future<Output = Result<Place, Self::Error>> + Send + '_;

  fn edit_place(
    &self,
    id: PlaceId,
    patch: PlacePatch,
  ) -> impl Future<Output = Result<Place, Self::Error>> + Send + '_;

  /// Remove a place and every visit made to it.
  fn delete_place(
    &self,
    id: PlaceId,
  ) -> impl Future<Output = Result<Place, Self::Error>> + Send + '_;

  fn get_place(
    &self,
    id: PlaceId,
  ) -> impl Future<Output = Result<Option<Place>, Self::Error>> + Send + '_;

  /// All places, ordered by identifier.
  fn list_places(
    &self,
  ) -> impl Future<Output = Result<Vec<Place>, Self::Error>> + Send + '_;

  // ── Visits ────────────────────────────────────────────────────────────

  /// Record a visit after checking referential integrity and uniqueness.
  fn add_visit(
    &self,
    visit: Visit,
  ) -> impl Future<Output = Result<Visit, Self::Error>> + Send + '_;

  fn delete_visit(
    &self,
    visit: Visit,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// All visits, ordered by date, then person, then place.
  fn list_visits(
    &self,
  ) -> impl Future<Output = Result<Vec<Visit>, Self::Error>> + Send + '_;

  // ── Snapshot ──────────────────────────────────────────────────────────

  /// Read every collection and assemble a validated [`Records`] snapshot.
  fn snapshot(
    &self,
  ) -> impl Future<Output = Result<Records, Self::Error>> + Send + '_;
}
