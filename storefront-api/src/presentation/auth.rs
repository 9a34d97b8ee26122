use std::sync::Arc;

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::application_service::AuthError;

use super::error::ApiError;
use super::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/login", post(login))
}

async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state.auth.login(&request.username, &request.password)?;
    Ok(Json(TokenResponse { token }))
}

impl From<AuthError> for ApiError {
    fn from(error: AuthError) -> Self {
        match error {
            AuthError::Issuance(_) => ApiError::Internal(error.to_string()),
            _ => ApiError::Unauthorized(error.to_string()),
        }
    }
}

/// Token of an `Authorization` value. The scheme name is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(char::is_whitespace)?;
    scheme.eq_ignore_ascii_case("bearer").then(|| token.trim())
}

/// Subject of a verified `Authorization: Bearer <token>` header.
#[derive(Debug, Clone)]
pub struct BearerSubject(pub String);

impl FromRequestParts<Arc<AppState>> for BearerSubject {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(bearer_token)
            .unwrap_or_default();

        let subject = state.auth.verify(token)?;
        Ok(BearerSubject(subject))
    }
}
