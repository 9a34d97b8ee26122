//! Handlers shared by every entity kind exposed over HTTP.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application_service::{DeleteOutcome, EntityStore, StoreError};
use crate::domain::{Entity, EntityId, ValidationError};
use crate::infrastructure::record_table::InMemoryRecordTable;

use super::error::{ApiError, MessageResponse};
use super::AppState;

/// An entity kind with its own collection of routes.
pub trait Resource: Entity {
    /// Update request body.
    type Body: DeserializeOwned + Send;

    /// Route prefix, e.g. `/products`.
    const PATH: &'static str;

    fn store(state: &AppState) -> &EntityStore<Self, InMemoryRecordTable<Self>>;

    fn draft_from_body(body: Self::Body) -> Self::Draft;

    /// Message returned to the caller when a field is rejected.
    fn rejection_message(error: &ValidationError) -> String {
        error.to_string()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct KeyQuery {
    pub id: Option<String>,
    pub name: Option<String>,
}

fn parse_id(raw: Option<&str>) -> Result<Option<EntityId>, ApiError> {
    EntityId::parse_optional(raw).map_err(|e| ApiError::BadRequest(e.to_string()))
}

fn not_found<R: Resource>(state: &AppState) -> ApiError {
    ApiError::not_found(R::KIND, &R::store(state).get_all())
}

pub(super) fn store_error<R: Resource>(state: &AppState, error: StoreError) -> ApiError {
    match error {
        StoreError::Validation(e) => ApiError::BadRequest(R::rejection_message(&e)),
        StoreError::NotFound => not_found::<R>(state),
        StoreError::DuplicateId(_) => ApiError::Conflict(error.to_string()),
        StoreError::Storage(_) => ApiError::Internal(error.to_string()),
    }
}

pub(super) async fn list_all<R: Resource>(State(state): State<Arc<AppState>>) -> Json<Vec<R>> {
    Json(R::store(&state).get_all())
}

pub(super) async fn read_one<R: Resource>(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<R>, ApiError> {
    let id = parse_id(query.id.as_deref())?;
    R::store(&state)
        .resolve(id.as_ref(), query.name.as_deref())
        .map(Json)
        .ok_or_else(|| not_found::<R>(&state))
}

/// 201 with a `Location` pointing at the new record.
pub(super) fn created<R: Resource>(
    state: &AppState,
    draft: R::Draft,
) -> Result<impl IntoResponse, ApiError> {
    let entity = R::store(state)
        .create(draft)
        .map_err(|e| store_error::<R>(state, e))?;
    let location = format!("{}?id={}", R::PATH, entity.id());
    Ok((StatusCode::CREATED, [(header::LOCATION, location)], Json(entity)))
}

pub(super) async fn update_one<R: Resource>(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<R::Body>,
) -> Result<Json<R>, ApiError> {
    let id = id
        .parse::<EntityId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    R::store(&state)
        .update(&id, R::draft_from_body(body))
        .map(Json)
        .map_err(|e| store_error::<R>(&state, e))
}

pub(super) fn delete_by_query<R: Resource>(
    state: &AppState,
    query: KeyQuery,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = parse_id(query.id.as_deref())?;
    let kind = R::KIND;

    let message = match R::store(state).delete_by_key(id.as_ref(), query.name.as_deref()) {
        DeleteOutcome::DeletedById { name_ignored: true } => format!(
            "{kind} successfully deleted. Both an id and a name were given, \
             so only the {} matching the id was deleted.",
            kind.label().to_lowercase()
        ),
        DeleteOutcome::DeletedById { .. } | DeleteOutcome::DeletedByName => {
            format!("{kind} successfully deleted.")
        }
        DeleteOutcome::MissingKey => {
            return Err(ApiError::BadRequest("Provide either an id or a name.".to_string()))
        }
        DeleteOutcome::NotFound => return Err(not_found::<R>(state)),
    };

    Ok(Json(MessageResponse { message }))
}
