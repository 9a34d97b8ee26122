use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::domain::{User, UserDraft, ValidationError};

use super::error::{ApiError, MessageResponse};
use super::resource::{self, KeyQuery, Resource};
use super::{AppState, UserStore};

pub const EMAIL_FORMAT_MESSAGE: &str =
    "The email format is invalid. Please use the following format: example@domain.com";

#[derive(Debug, Deserialize)]
pub struct UserBody {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub email: String,
}

impl Resource for User {
    type Body = UserBody;

    const PATH: &'static str = "/users";

    fn store(state: &AppState) -> &UserStore {
        &state.users
    }

    fn draft_from_body(body: UserBody) -> UserDraft {
        UserDraft::new(body.name, body.email)
    }

    fn rejection_message(error: &ValidationError) -> String {
        match error {
            ValidationError::Format(_) => EMAIL_FORMAT_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(resource::read_one::<User>).delete(delete_user))
        .route("/users/all", get(resource::list_all::<User>))
        .route("/users/{name}/{email}", post(create_user))
        .route("/users/{id}", put(resource::update_one::<User>))
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    Path((name, email)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    resource::created::<User>(&state, UserDraft::new(name, email))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    resource::delete_by_query::<User>(&state, query)
}
