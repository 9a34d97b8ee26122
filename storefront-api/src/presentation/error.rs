use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::EntityKind;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Failure outcomes of the HTTP surface.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Unauthorized(String),
    Conflict(String),
    /// Nothing matched. Carries the whole current table so the caller can
    /// pick a valid record.
    NotFound {
        kind: EntityKind,
        candidates: serde_json::Value,
    },
    Internal(String),
}

impl ApiError {
    pub fn not_found<E: Serialize>(kind: EntityKind, candidates: &[E]) -> Self {
        match serde_json::to_value(candidates) {
            Ok(candidates) => ApiError::NotFound { kind, candidates },
            Err(e) => ApiError::Internal(e.to_string()),
        }
    }
}

fn collection_key(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Product => "products",
        EntityKind::User => "users",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::NotFound { kind, candidates } => {
                let mut body = serde_json::Map::new();
                body.insert(
                    "warning".to_string(),
                    format!("{kind} not found. Please pick someone from this list.").into(),
                );
                body.insert(collection_key(kind).to_string(), candidates);
                return (StatusCode::NOT_FOUND, Json(body)).into_response();
            }
            ApiError::BadRequest(error) => (StatusCode::BAD_REQUEST, error),
            ApiError::Unauthorized(error) => (StatusCode::UNAUTHORIZED, error),
            ApiError::Conflict(error) => (StatusCode::CONFLICT, error),
            ApiError::Internal(error) => (StatusCode::INTERNAL_SERVER_ERROR, error),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_carries_hint_list() {
        let response = ApiError::not_found(EntityKind::User, &["a", "b"]).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(
            body["warning"],
            "User not found. Please pick someone from this list."
        );
        assert_eq!(body["users"], serde_json::json!(["a", "b"]));
    }

    #[tokio::test]
    async fn plain_errors_carry_message() {
        let response = ApiError::Conflict("taken".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(body_json(response).await["error"], "taken");
    }
}
