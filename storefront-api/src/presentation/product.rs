use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;

use crate::domain::{Product, ProductDraft};

use super::auth::BearerSubject;
use super::error::{ApiError, MessageResponse};
use super::resource::{self, KeyQuery, Resource};
use super::{AppState, ProductStore};

/// Update payload. A client-sent `id` is accepted and ignored.
#[derive(Debug, Deserialize)]
pub struct ProductBody {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub price: f64,
}

impl Resource for Product {
    type Body = ProductBody;

    const PATH: &'static str = "/products";

    fn store(state: &AppState) -> &ProductStore {
        &state.products
    }

    fn draft_from_body(body: ProductBody) -> ProductDraft {
        ProductDraft::new(body.name, body.price)
    }
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/products", get(resource::read_one::<Product>).delete(delete_product))
        .route("/products/all", get(resource::list_all::<Product>))
        .route("/products/{name}/{price}", post(create_product))
        .route("/products/{id}", put(resource::update_one::<Product>))
}

async fn create_product(
    State(state): State<Arc<AppState>>,
    Path((name, price)): Path<(String, f64)>,
) -> Result<impl IntoResponse, ApiError> {
    resource::created::<Product>(&state, ProductDraft::new(name, price))
}

async fn delete_product(
    BearerSubject(subject): BearerSubject,
    State(state): State<Arc<AppState>>,
    Query(query): Query<KeyQuery>,
) -> Result<Json<MessageResponse>, ApiError> {
    tracing::info!(%subject, "product delete authorized");
    resource::delete_by_query::<Product>(&state, query)
}
