use serde::Serialize;

use super::entity::{clean_name, Entity, EntityKind, ValidationError};
use super::entity_id::EntityId;
use super::sanitizer::validate_email;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    id: EntityId,
    name: String,
    email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDraft {
    pub id: Option<EntityId>,
    pub name: String,
    pub email: String,
}

impl UserDraft {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }
}

impl User {
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Entity for User {
    type Draft = UserDraft;

    const KIND: EntityKind = EntityKind::User;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn requested_id(draft: &UserDraft) -> Option<EntityId> {
        draft.id.filter(|id| !id.is_nil())
    }

    fn clean(draft: UserDraft) -> Result<UserDraft, ValidationError> {
        Ok(UserDraft {
            id: draft.id,
            name: clean_name(&draft.name)?,
            email: validate_email(&draft.email)?,
        })
    }

    fn from_draft(id: EntityId, draft: UserDraft) -> Self {
        Self {
            id,
            name: draft.name,
            email: draft.email,
        }
    }

    fn apply(&mut self, draft: UserDraft) {
        self.name = draft.name;
        self.email = draft.email;
    }
}
