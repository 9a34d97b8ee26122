//! All-or-nothing mutation of a record table's rows.
//!
//! The body works on a staged copy of the rows. Only [`MutationScope::complete`]
//! copies the staged rows back; dropping an uncompleted scope discards them, so
//! a failing body leaves the live rows exactly as they were.

use crate::domain::EntityKind;

pub struct MutationScope<'a, E> {
    live: &'a mut Vec<E>,
    staged: Vec<E>,
    kind: EntityKind,
    operation: &'static str,
    completed: bool,
}

impl<'a, E: Clone> MutationScope<'a, E> {
    pub fn begin(live: &'a mut Vec<E>, kind: EntityKind, operation: &'static str) -> Self {
        let staged = live.clone();
        Self {
            live,
            staged,
            kind,
            operation,
            completed: false,
        }
    }

    pub fn rows_mut(&mut self) -> &mut Vec<E> {
        &mut self.staged
    }

    /// Commit marker: publishes the staged rows.
    pub fn complete(mut self) {
        *self.live = std::mem::take(&mut self.staged);
        self.completed = true;
    }

    /// Runs `body` against the staged rows and commits only if it succeeds.
    pub fn run<R, Er>(
        mut self,
        body: impl FnOnce(&mut Vec<E>) -> Result<R, Er>,
    ) -> Result<R, Er> {
        let outcome = body(self.rows_mut())?;
        self.complete();
        Ok(outcome)
    }
}

impl<E> Drop for MutationScope<'_, E> {
    fn drop(&mut self) {
        if !self.completed {
            tracing::warn!(
                kind = %self.kind,
                operation = self.operation,
                "mutation not completed, rolling back"
            );
        }
    }
}
