//! Handlers for the `/trace` queries.
//!
//! | Method | Path | Query |
//! |--------|------|-------|
//! | `GET`  | `/trace/people/:person/places`   | `window_days`, `as_of` |
//! | `GET`  | `/trace/people/:person/contacts` | `window_days`, `as_of` |
//! | `GET`  | `/trace/high-risk`               | `count` |
//!
//! `:person` is either an identifier or a 1-based position in the
//! identifier-ordered people listing. Each request works on a fresh snapshot
//! of the store.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::NaiveDate;
use contrace_core::{Person, PersonRef, Place, Records, store::RecordStore};
use contrace_trace::{RiskPolicy, TraceWindow, Tracer};
use serde::{Deserialize, Serialize};

use crate::{ApiState, error::ApiError};

/// Optional overrides for the trailing window.
#[derive(Debug, Default, Deserialize)]
pub struct TraceParams {
  pub window_days: Option<u32>,
  /// Last day of the window; defaults to today.
  pub as_of:       Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct HighRiskParams {
  pub count: Option<usize>,
}

/// Body of `GET /trace/people/:person/places`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExposedPlaces {
  pub person: Person,
  pub window: TraceWindow,
  pub places: Vec<Place>,
}

/// Body of `GET /trace/people/:person/contacts`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Contacts {
  pub person:   Person,
  pub window:   TraceWindow,
  pub contacts: Vec<Person>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankedPlace {
  pub place:           Place,
  pub infected_visits: usize,
}

/// Body of `GET /trace/high-risk`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HighRiskPlaces {
  pub infected_places: usize,
  pub total_places:    usize,
  pub places:          Vec<RankedPlace>,
}

impl ExposedPlaces {
  /// Run the exposure query and collect the matching places in listing
  /// order.
  pub fn build(
    records: &Records,
    reference: &PersonRef,
    window: TraceWindow,
  ) -> contrace_trace::Result<Self> {
    let filter = Tracer::new(records).with_window(window).exposed_places(reference)?;
    let person = records.resolve_person(reference)?;
    Ok(Self {
      person: person.clone(),
      window,
      places: records.filtered_places(&filter).into_iter().cloned().collect(),
    })
  }
}

impl Contacts {
  pub fn build(
    records: &Records,
    reference: &PersonRef,
    window: TraceWindow,
  ) -> contrace_trace::Result<Self> {
    let filter = Tracer::new(records).with_window(window).contacts(reference)?;
    let person = records.resolve_person(reference)?;
    Ok(Self {
      person: person.clone(),
      window,
      contacts: records.filtered_people(&filter).into_iter().cloned().collect(),
    })
  }
}

impl HighRiskPlaces {
  /// Classify over the full visit history. `count` overrides `policy`.
  pub fn build(
    records: &Records,
    count: Option<usize>,
    policy: RiskPolicy,
  ) -> contrace_trace::Result<Self> {
    let outcome = Tracer::new(records).with_policy(policy).high_risk(count);

    let mut places = Vec::with_capacity(outcome.len());
    for rank in &outcome.ranked {
      places.push(RankedPlace {
        place:           records.place(&rank.place_id)?.clone(),
        infected_visits: rank.infected_visits,
      });
    }

    Ok(Self {
      infected_places: outcome.infected_places,
      total_places: outcome.total_places,
      places,
    })
  }
}

fn window_for<S>(state: &ApiState<S>, params: &TraceParams) -> TraceWindow {
  let days = params.window_days.unwrap_or(state.defaults.window_days);
  match params.as_of {
    Some(anchor) => TraceWindow::new(anchor, days),
    None => TraceWindow::ending_today(days),
  }
}

/// `GET /trace/people/:person/places`
pub async fn exposed_places<S>(
  State(state): State<ApiState<S>>,
  Path(person): Path<String>,
  Query(params): Query<TraceParams>,
) -> Result<Json<ExposedPlaces>, ApiError>
where
  S: RecordStore,
{
  let reference: PersonRef = ApiError::parse_segment(&person)?;
  let window = window_for(&state, &params);
  let records = state.store.snapshot().await.map_err(ApiError::store)?;
  Ok(Json(ExposedPlaces::build(&records, &reference, window)?))
}

/// `GET /trace/people/:person/contacts`
pub async fn contacts<S>(
  State(state): State<ApiState<S>>,
  Path(person): Path<String>,
  Query(params): Query<TraceParams>,
) -> Result<Json<Contacts>, ApiError>
where
  S: RecordStore,
{
  let reference: PersonRef = ApiError::parse_segment(&person)?;
  let window = window_for(&state, &params);
  let records = state.store.snapshot().await.map_err(ApiError::store)?;
  Ok(Json(Contacts::build(&records, &reference, window)?))
}

/// `GET /trace/high-risk`
pub async fn high_risk<S>(
  State(state): State<ApiState<S>>,
  Query(params): Query<HighRiskParams>,
) -> Result<Json<HighRiskPlaces>, ApiError>
where
  S: RecordStore,
{
  let records = state.store.snapshot().await.map_err(ApiError::store)?;
  let report = HighRiskPlaces::build(&records, params.count, state.defaults.policy)?;
  Ok(Json(report))
}
