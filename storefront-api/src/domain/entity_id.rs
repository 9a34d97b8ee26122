use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier of a stored entity.
///
/// Assigned once at creation and never reassigned. The nil UUID stands for
/// "no identifier supplied" and is never handed out by [`EntityId::generate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid identifier: {0}")]
pub struct InvalidEntityId(pub String);

impl EntityId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(value: Uuid) -> Self {
        Self(value)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Parses an optional raw identifier. Blank input and the nil UUID both
    /// mean "absent".
    pub fn parse_optional(raw: Option<&str>) -> Result<Option<Self>, InvalidEntityId> {
        match raw.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => {
                let id: EntityId = value.parse()?;
                Ok((!id.is_nil()).then_some(id))
            }
        }
    }
}

impl FromStr for EntityId {
    type Err = InvalidEntityId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| InvalidEntityId(s.to_string()))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
