use serde::{Deserialize, Serialize};

use super::entity::{clean_name, Entity, EntityKind, ValidationError};
use super::entity_id::EntityId;

/// Product price. Always finite and non-negative once validated.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(f64);

impl Price {
    pub fn new(value: f64) -> Result<Self, ValidationError> {
        if !value.is_finite() || value < 0.0 {
            return Err(ValidationError::InvalidPrice(value));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    id: EntityId,
    name: String,
    price: Price,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub id: Option<EntityId>,
    pub name: String,
    pub price: f64,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }

    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = Some(id);
        self
    }
}

impl Product {
    pub fn price(&self) -> Price {
        self.price
    }
}

impl Entity for Product {
    type Draft = ProductDraft;

    const KIND: EntityKind = EntityKind::Product;

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn requested_id(draft: &ProductDraft) -> Option<EntityId> {
        draft.id.filter(|id| !id.is_nil())
    }

    fn clean(draft: ProductDraft) -> Result<ProductDraft, ValidationError> {
        let price = Price::new(draft.price)?;
        Ok(ProductDraft {
            id: draft.id,
            name: clean_name(&draft.name)?,
            price: price.value(),
        })
    }

    fn from_draft(id: EntityId, draft: ProductDraft) -> Self {
        Self {
            id,
            name: draft.name,
            price: Price(draft.price),
        }
    }

    fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.price = Price(draft.price);
    }
}
