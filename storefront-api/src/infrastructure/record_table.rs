use std::sync::{Arc, Mutex, MutexGuard};

use crate::application_service::{RecordTable, StoreError};

/// Process-lifetime record table. Nothing is persisted.
///
/// One mutex guards the whole table, so a lookup followed by a write inside
/// the same closure cannot interleave with another request.
pub struct InMemoryRecordTable<E> {
    rows: Arc<Mutex<Vec<E>>>,
}

impl<E> InMemoryRecordTable<E> {
    pub fn with_rows(rows: Vec<E>) -> Self {
        Self {
            rows: Arc::new(Mutex::new(rows)),
        }
    }

    // Mutations are staged before they are published, so rows behind a
    // poisoned lock are still consistent and can be reused.
    fn lock(&self) -> MutexGuard<'_, Vec<E>> {
        self.rows.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("record table lock was poisoned, recovering");
            poisoned.into_inner()
        })
    }
}

impl<E> Default for InMemoryRecordTable<E> {
    fn default() -> Self {
        Self::with_rows(Vec::new())
    }
}

impl<E> Clone for InMemoryRecordTable<E> {
    fn clone(&self) -> Self {
        Self {
            rows: Arc::clone(&self.rows),
        }
    }
}

impl<E: Send> RecordTable<E> for InMemoryRecordTable<E> {
    fn read<R>(&self, f: impl FnOnce(&[E]) -> R) -> Result<R, StoreError> {
        let guard = self.lock();
        Ok(f(&guard))
    }

    fn write<R>(&self, f: impl FnOnce(&mut Vec<E>) -> R) -> Result<R, StoreError> {
        let mut guard = self.lock();
        Ok(f(&mut guard))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let table = InMemoryRecordTable::default();
        table.write(|rows| rows.push(1)).unwrap();
        table.write(|rows| rows.push(2)).unwrap();

        assert_eq!(table.read(|rows| rows.to_vec()).unwrap(), vec![1, 2]);
    }

    #[test]
    fn clones_share_rows() {
        let table = InMemoryRecordTable::with_rows(vec!["a"]);
        let other = table.clone();
        other.write(|rows| rows.push("b")).unwrap();

        assert_eq!(table.read(|rows| rows.len()).unwrap(), 2);
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let table = InMemoryRecordTable::with_rows(vec![1]);
        let shared = table.clone();
        let _ = std::thread::spawn(move || {
            let _: Result<(), StoreError> = shared.write(|_rows| panic!("writer crashed"));
        })
        .join();

        assert_eq!(table.read(|rows| rows.to_vec()).unwrap(), vec![1]);
    }
}
