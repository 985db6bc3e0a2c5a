//! Storage port for persisted movesets.

use std::sync::Arc;

use async_trait::async_trait;
use moveset_core::{CreatureId, LearnRow, Transaction};

use super::error::Result;

/// Durable home of the `pokemon_movesets` table.
///
/// One store backs every creature; each [`Transaction`] is scoped to a single
/// creature and must commit all-or-nothing. Only one transaction is in flight
/// per creature at a time; callers await each one before issuing the next.
///
/// # Implementations
///
/// - `DetachedStore`: no-op, for memory-only editing
/// - `MemoryStore`: in-process table for tests and local runs
/// - `SqliteStore`: SQLite via sqlx (feature `sqlite`)
#[async_trait]
pub trait MovesetStore: Send + Sync {
    /// Whether executed statements reach storage.
    ///
    /// Detached stores return false so edits skip catalog resolution and
    /// statement planning entirely.
    fn is_persistent(&self) -> bool {
        true
    }

    /// All learn rows of `creature`, in insertion order.
    async fn load(&self, creature: CreatureId) -> Result<Vec<LearnRow>>;

    /// Execute every statement of `transaction`, or none of them.
    async fn execute(&self, transaction: &Transaction) -> Result<()>;
}

#[async_trait]
impl<S: MovesetStore + ?Sized> MovesetStore for Box<S> {
    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }

    async fn load(&self, creature: CreatureId) -> Result<Vec<LearnRow>> {
        (**self).load(creature).await
    }

    async fn execute(&self, transaction: &Transaction) -> Result<()> {
        (**self).execute(transaction).await
    }
}

#[async_trait]
impl<S: MovesetStore + ?Sized> MovesetStore for Arc<S> {
    fn is_persistent(&self) -> bool {
        (**self).is_persistent()
    }

    async fn load(&self, creature: CreatureId) -> Result<Vec<LearnRow>> {
        (**self).load(creature).await
    }

    async fn execute(&self, transaction: &Transaction) -> Result<()> {
        (**self).execute(transaction).await
    }
}
