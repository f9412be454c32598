//! Handlers for `/people` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/people` | Ordered by identifier |
//! | `POST`   | `/people` | Body: [`NewPerson`]; returns 201 + stored person |
//! | `GET`    | `/people/:id` | 404 if not found |
//! | `PATCH`  | `/people/:id` | Body: [`PersonPatch`] |
//! | `DELETE` | `/people/:id` | Also deletes the person's visits |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use contrace_core::{NewPerson, Person, PersonId, PersonPatch, store::RecordStore};

use crate::{ApiState, error::ApiError};

/// `GET /people`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Person>>, ApiError>
where
  S: RecordStore,
{
  let people = state.store.list_people().await.map_err(ApiError::store)?;
  Ok(Json(people))
}

/// `POST /people`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  Json(body): Json<NewPerson>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  if body.name.trim().is_empty() {
    return Err(ApiError::BadRequest("name must not be empty".into()));
  }
  let person = state.store.add_person(body).await.map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(person)))
}

/// `GET /people/:id`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError>
where
  S: RecordStore,
{
  let id: PersonId = ApiError::parse_segment(&id)?;
  let person = state
    .store
    .get_person(id.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("person {id} not found")))?;
  Ok(Json(person))
}

/// `PATCH /people/:id`
pub async fn edit<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
  Json(patch): Json<PersonPatch>,
) -> Result<Json<Person>, ApiError>
where
  S: RecordStore,
{
  let id: PersonId = ApiError::parse_segment(&id)?;
  if patch.is_empty() {
    return Err(ApiError::BadRequest("patch changes nothing".into()));
  }
  let person = state
    .store
    .edit_person(id, patch)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(person))
}

/// `DELETE /people/:id`, returning the removed person.
pub async fn remove<S>(
  State(state): State<ApiState<S>>,
  Path(id): Path<String>,
) -> Result<Json<Person>, ApiError>
where
  S: RecordStore,
{
  let id: PersonId = ApiError::parse_segment(&id)?;
  let person = state.store.delete_person(id).await.map_err(ApiError::store)?;
  Ok(Json(person))
}
