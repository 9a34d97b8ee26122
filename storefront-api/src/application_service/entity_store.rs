use std::marker::PhantomData;

use tracing::{error, info, warn};

use crate::application_service::mutation_scope::MutationScope;
use crate::domain::sanitizer::sanitize;
use crate::domain::{Entity, EntityId, ValidationError};

/// Ordered rows of one entity kind, guarded by the implementation's own
/// mutual exclusion. Every call sees a consistent table.
pub trait RecordTable<E>: Send + Sync {
    fn read<R>(&self, f: impl FnOnce(&[E]) -> R) -> Result<R, StoreError>;

    fn write<R>(&self, f: impl FnOnce(&mut Vec<E>) -> R) -> Result<R, StoreError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StoreError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
    #[error("entity not found")]
    NotFound,
    #[error("identifier {0} is already in use")]
    DuplicateId(EntityId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result of a delete addressed by identifier and/or name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed by identifier. `name_ignored` is set when a name was supplied too.
    DeletedById { name_ignored: bool },
    DeletedByName,
    NotFound,
    /// Neither an identifier nor a name was supplied.
    MissingKey,
}

/// CRUD operations over one entity kind.
///
/// Reads never fail loudly: a missing record or a table fault both come back
/// as `None` (or an empty list), with faults logged. Create and delete run
/// inside a [`MutationScope`], so a failure leaves the table as it was.
pub struct EntityStore<E, T> {
    table: T,
    _entity: PhantomData<fn() -> E>,
}

impl<E, T> EntityStore<E, T>
where
    E: Entity,
    T: RecordTable<E>,
{
    pub fn new(table: T) -> Self {
        Self {
            table,
            _entity: PhantomData,
        }
    }

    pub fn create(&self, draft: E::Draft) -> Result<E, StoreError> {
        let created = self
            .table
            .write(|rows| {
                MutationScope::begin(rows, E::KIND, "create").run(|staged| {
                    let draft = E::clean(draft)?;
                    let id = E::requested_id(&draft).unwrap_or_else(EntityId::generate);
                    if staged.iter().any(|row| row.id() == &id) {
                        return Err(StoreError::DuplicateId(id));
                    }
                    let entity = E::from_draft(id, draft);
                    staged.push(entity.clone());
                    Ok(entity)
                })
            })
            .and_then(|result| result);

        match &created {
            Ok(entity) => info!(kind = %E::KIND, id = %entity.id(), "created"),
            Err(StoreError::Storage(reason)) => {
                error!(kind = %E::KIND, %reason, "create failed")
            }
            Err(e) => warn!(kind = %E::KIND, error = %e, "create rejected"),
        }
        created
    }

    pub fn read_by_id(&self, id: &EntityId) -> Option<E> {
        self.table
            .read(|rows| rows.iter().find(|row| row.id() == id).cloned())
            .unwrap_or_else(|e| {
                error!(kind = %E::KIND, %id, error = %e, "read by id failed");
                None
            })
    }

    /// First record, in table order, whose name contains `name`
    /// case-insensitively. Blank queries match nothing.
    pub fn read_by_name(&self, name: &str) -> Option<E> {
        let needle = sanitize(name).to_lowercase();
        if needle.is_empty() {
            return None;
        }

        self.table
            .read(|rows| {
                rows.iter()
                    .find(|row| row.name().to_lowercase().contains(&needle))
                    .cloned()
            })
            .unwrap_or_else(|e| {
                error!(kind = %E::KIND, %name, error = %e, "read by name failed");
                None
            })
    }

    /// Dual-key lookup: the identifier wins whenever it is present and the
    /// name is only consulted without one.
    pub fn resolve(&self, id: Option<&EntityId>, name: Option<&str>) -> Option<E> {
        match (id, name) {
            (Some(id), _) => self.read_by_id(id),
            (None, Some(name)) if !name.trim().is_empty() => self.read_by_name(name),
            _ => None,
        }
    }

    /// Validates the draft, then overwrites the record's mutable fields in
    /// place. Nothing is written when validation fails or the id is unknown.
    pub fn update(&self, id: &EntityId, draft: E::Draft) -> Result<E, StoreError> {
        let draft = E::clean(draft).inspect_err(|e| {
            warn!(kind = %E::KIND, %id, error = %e, "update rejected");
        })?;

        self.table
            .write(|rows| {
                let row = rows
                    .iter_mut()
                    .find(|row| row.id() == id)
                    .ok_or(StoreError::NotFound)?;
                row.apply(draft);
                Ok(row.clone())
            })
            .and_then(|result| result)
            .inspect(|_| info!(kind = %E::KIND, %id, "updated"))
    }

    pub fn delete_by_id(&self, id: &EntityId) -> bool {
        self.remove_first("delete by id", |row| row.id() == id)
    }

    /// Removes the first record whose name equals `name` exactly (after
    /// sanitization). Unlike [`EntityStore::read_by_name`] this is not a
    /// substring match.
    pub fn delete_by_name(&self, name: &str) -> bool {
        let name = sanitize(name);
        self.remove_first("delete by name", |row| row.name() == name)
    }

    pub fn delete_by_key(&self, id: Option<&EntityId>, name: Option<&str>) -> DeleteOutcome {
        let name = name.filter(|name| !name.is_empty());
        match (id, name) {
            (None, None) => DeleteOutcome::MissingKey,
            (Some(id), name) => {
                if self.delete_by_id(id) {
                    DeleteOutcome::DeletedById {
                        name_ignored: name.is_some(),
                    }
                } else {
                    DeleteOutcome::NotFound
                }
            }
            (None, Some(name)) => {
                if self.delete_by_name(name) {
                    DeleteOutcome::DeletedByName
                } else {
                    DeleteOutcome::NotFound
                }
            }
        }
    }

    pub fn get_all(&self) -> Vec<E> {
        self.table.read(|rows| rows.to_vec()).unwrap_or_else(|e| {
            error!(kind = %E::KIND, error = %e, "listing failed");
            Vec::new()
        })
    }

    fn remove_first(&self, operation: &'static str, matches: impl Fn(&E) -> bool) -> bool {
        let removed = self
            .table
            .write(|rows| {
                MutationScope::begin(rows, E::KIND, operation).run(|staged| {
                    match staged.iter().position(|row| matches(row)) {
                        Some(index) => Ok(staged.remove(index)),
                        None => Err(StoreError::NotFound),
                    }
                })
            })
            .and_then(|result| result);

        match removed {
            Ok(entity) => {
                info!(kind = %E::KIND, id = %entity.id(), operation, "deleted");
                true
            }
            Err(StoreError::NotFound) => false,
            Err(e) => {
                error!(kind = %E::KIND, operation, error = %e, "delete failed");
                false
            }
        }
    }
}
