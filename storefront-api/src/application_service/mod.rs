pub mod auth_service;
pub mod entity_store;
pub mod mutation_scope;

pub use auth_service::{AuthError, AuthService, Credentials, TokenGate};
pub use entity_store::{DeleteOutcome, EntityStore, RecordTable, StoreError};
