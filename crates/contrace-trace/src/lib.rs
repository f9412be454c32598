//! The exposure-tracing engine.
//!
//! Everything here is a synchronous, side-effect-free query over a
//! [`Records`](contrace_core::Records) snapshot:
//!
//! - [`window`] narrows visits to a trailing date window;
//! - [`exposure`] answers "which places did this infected person expose?";
//! - [`contacts`] answers "who was co-located with them on the same day?";
//! - [`risk`] ranks places by infected-visit frequency into a shortlist.
//!
//! Results come back as [`ViewFilter`](contrace_core::ViewFilter)s that the
//! caller applies to a listing. Nothing in this crate mutates the store.

pub mod contacts;
pub mod error;
pub mod exposure;
pub mod risk;
pub mod tracer;
pub mod window;

pub use error::{Error, Result};
pub use risk::{HighRisk, PlaceRank, RiskPolicy};
pub use tracer::Tracer;
pub use window::{DEFAULT_WINDOW_DAYS, TraceWindow, windowed};

#[cfg(test)]
mod tests;
