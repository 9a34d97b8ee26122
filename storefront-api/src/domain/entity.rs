use std::fmt::{self, Debug};

use serde::Serialize;

use super::entity_id::EntityId;
use super::sanitizer::FormatError;

/// The two kinds of record the service keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Product,
    User,
}

impl EntityKind {
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Product => "Product",
            EntityKind::User => "User",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("name must not be empty")]
    EmptyName,
    #[error("price must be a non-negative number, got {0}")]
    InvalidPrice(f64),
}

/// Contract shared by every kind of stored record.
///
/// A `Draft` is the caller's untrusted input. It only reaches a record table
/// after [`Entity::clean`] has sanitized and validated it.
pub trait Entity: Clone + Debug + Serialize + Send + Sync + 'static {
    type Draft: Debug + Send;

    const KIND: EntityKind;

    fn id(&self) -> &EntityId;

    fn name(&self) -> &str;

    /// Identifier the caller asked for, if any.
    fn requested_id(draft: &Self::Draft) -> Option<EntityId>;

    fn clean(draft: Self::Draft) -> Result<Self::Draft, ValidationError>;

    fn from_draft(id: EntityId, draft: Self::Draft) -> Self;

    /// Overwrites the mutable fields. The identifier never changes.
    fn apply(&mut self, draft: Self::Draft);
}

pub(crate) fn clean_name(name: &str) -> Result<String, ValidationError> {
    let name = super::sanitizer::sanitize(name);
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(name)
}
