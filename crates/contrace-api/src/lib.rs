//! JSON REST API for contrace.
//!
//! Exposes an axum [`Router`] backed by any
//! [`contrace_core::store::RecordStore`]: plain record endpoints plus the
//! three tracing queries. Transport concerns are the caller's
//! responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", contrace_api::api_router(store.clone(), TraceDefaults::default()))
//! ```

pub mod error;
pub mod people;
pub mod places;
pub mod trace;
pub mod visits;

use std::sync::Arc;

use axum::{
  Router,
  routing::get,
};
use contrace_core::store::RecordStore;
use contrace_trace::{DEFAULT_WINDOW_DAYS, RiskPolicy};

pub use error::ApiError;

/// Tracing parameters used when a request doesn't override them.
#[derive(Debug, Clone, Copy)]
pub struct TraceDefaults {
  pub window_days: u32,
  pub policy:      RiskPolicy,
}

impl Default for TraceDefaults {
  fn default() -> Self {
    Self { window_days: DEFAULT_WINDOW_DAYS, policy: RiskPolicy::default() }
  }
}

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub defaults: TraceDefaults,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), defaults: self.defaults }
  }
}

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(store: Arc<S>, defaults: TraceDefaults) -> Router<()>
where
  S: RecordStore + 'static,
{
  let state = ApiState { store, defaults };

  Router::new()
    // People
    .route("/people", get(people::list::<S>).post(people::create::<S>))
    .route(
      "/people/{id}",
      get(people::get_one::<S>)
        .patch(people::edit::<S>)
        .delete(people::remove::<S>),
    )
    // Places
    .route("/places", get(places::list::<S>).post(places::create::<S>))
    .route(
      "/places/{id}",
      get(places::get_one::<S>)
        .patch(places::edit::<S>)
        .delete(places::remove::<S>),
    )
    // Visits
    .route(
      "/visits",
      get(visits::list::<S>)
        .post(visits::create::<S>)
        .delete(visits::remove::<S>),
    )
    // Tracing
    .route("/trace/people/{person}/places", get(trace::exposed_places::<S>))
    .route("/trace/people/{person}/contacts", get(trace::contacts::<S>))
    .route("/trace/high-risk", get(trace::high_risk::<S>))
    .with_state(state)
}
