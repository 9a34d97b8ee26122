pub mod entity;
pub mod entity_id;
pub mod product;
pub mod sanitizer;
pub mod user;

pub use entity::{Entity, EntityKind, ValidationError};
pub use entity_id::{EntityId, InvalidEntityId};
pub use product::{Price, Product, ProductDraft};
pub use user::{User, UserDraft};
