//! Handlers for `/visits`.
//!
//! A visit has no identifier of its own; `DELETE` takes the whole
//! `{person_id, place_id, date}` triple as its body.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use contrace_core::{Visit, store::RecordStore};

use crate::{ApiState, error::ApiError};

/// `GET /visits`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Visit>>, ApiError>
where
  S: RecordStore,
{
  let visits = state.store.list_visits().await.map_err(ApiError::store)?;
  Ok(Json(visits))
}

/// `POST /visits`. 404 if the person or place is unknown, 409 if the same
/// visit is already recorded.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(visit): Json<Visit>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let visit = state.store.add_visit(visit).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(visit)))
}

/// `DELETE /visits`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Json(visit): Json<Visit>,
) -> Result<StatusCode, ApiError>
where
  S: RecordStore,
{
  state.store.delete_visit(visit).await.map_err(ApiError::store)?;
  Ok(StatusCode::NO_CONTENT)
}
