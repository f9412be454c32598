//! Core types and trait definitions for the contrace tracing tool.
//!
//! No HTTP or database dependencies live here. The crate defines the
//! people / places / visits model, the read-only [`Records`] snapshot
//! consumed by the tracing engine, and the [`store::RecordStore`] trait
//! implemented by persistence backends.

pub mod error;
pub mod id;
pub mod person;
pub mod place;
pub mod records;
pub mod store;
pub mod visit;

pub use error::{Error, Result};
pub use id::{PersonId, PlaceId};
pub use person::{Flag, NewPerson, Person, PersonPatch};
pub use place::{NewPlace, Place, PlacePatch};
pub use records::{PersonRef, PlaceRef, Records, ViewFilter};
pub use visit::Visit;
