use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::application_service::{AuthService, EntityStore, TokenGate};
use crate::config::ServiceConfig;
use crate::domain::{Product, User};
use crate::infrastructure::jwt_token_gate::JwtTokenGate;
use crate::infrastructure::record_table::InMemoryRecordTable;
use crate::infrastructure::seed;

pub mod auth;
pub mod error;
pub mod product;
pub mod resource;
pub mod user;

pub type ProductStore = EntityStore<Product, InMemoryRecordTable<Product>>;
pub type UserStore = EntityStore<User, InMemoryRecordTable<User>>;

/// Shared by every handler for the lifetime of the process.
pub struct AppState {
    pub products: ProductStore,
    pub users: UserStore,
    pub auth: AuthService,
}

impl AppState {
    pub fn new(products: ProductStore, users: UserStore, auth: AuthService) -> Self {
        Self {
            products,
            users,
            auth,
        }
    }

    /// Wires the in-memory tables and the JWT gate described by `config`.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let (products, users) = if config.seed {
            (seed::products(), seed::users())
        } else {
            (Vec::new(), Vec::new())
        };
        let token_gate: Arc<dyn TokenGate> = Arc::new(JwtTokenGate::new(&config.jwt));

        Self::new(
            EntityStore::new(InMemoryRecordTable::with_rows(products)),
            EntityStore::new(InMemoryRecordTable::with_rows(users)),
            AuthService::new((&config.credentials).into(), token_gate),
        )
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth::routes())
        .merge(product::routes())
        .merge(user::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
