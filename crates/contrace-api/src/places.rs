//! Handlers for `/places` endpoints.
//!
//! Same shape as [`crate::people`]; deleting a place also deletes every visit
//! made to it.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use contrace_core::{NewPlace, Place, PlaceId, PlacePatch, store::RecordStore};

use crate::{ApiState, error::ApiError};

/// `GET /places`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Place>>, ApiError>
where
  S: RecordStore,
{
  let places = state.store.list_places().await.map_err(ApiError::store)?;
  Ok(Json(places))
}

/// `POST /places`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPlace>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  let place = state.store.add_place(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(place)))
}

/// `GET /places/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Place>, ApiError>
where
  S: RecordStore,
{
  let id: PlaceId = ApiError::parse_segment(&id)?;
  let place = state
    .store
    .get_place(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("place {id} not found")))?;
  Ok(Json(place))
}

/// `PATCH /places/:id`
pub async fn edit<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Json(patch): Json<PlacePatch>,
) -> Result<Json<Place>, ApiError>
where
  S: RecordStore,
{
  let id: PlaceId = ApiError::parse_segment(&id)?;
  if patch.is_empty() {
    return Err(ApiError::BadRequest("patch changes nothing".into()));
  }
  let place = state
    .store
    .edit_place(id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(place))
}

/// `DELETE /places/:id`
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Place>, ApiError>
where
  S: RecordStore,
{
  let id: PlaceId = ApiError::parse_segment(&id)?;
  let place = state.store.delete_place(id).await.map_err(ApiError::store)?;
  Ok(Json(place))
}
