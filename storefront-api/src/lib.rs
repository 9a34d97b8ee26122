pub mod application_service;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod presentation;

pub use config::ServiceConfig;
pub use domain::{EntityId, Product, ProductDraft, User, UserDraft};
pub use presentation::{create_router, AppState};
