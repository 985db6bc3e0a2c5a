//! No-op store for editing movesets purely in memory.

use async_trait::async_trait;
use moveset_core::{CreatureId, LearnRow, Transaction};

use super::{MovesetStore, Result};

/// Store that persists nothing.
///
/// Sessions over a detached store apply the move algebra to the caller's
/// moveset and never plan or execute statements.
#[derive(Clone, Copy, Debug, Default)]
pub struct DetachedStore;

#[async_trait]
impl MovesetStore for DetachedStore {
    fn is_persistent(&self) -> bool {
        false
    }

    async fn load(&self, _creature: CreatureId) -> Result<Vec<LearnRow>> {
        Ok(Vec::new())
    }

    async fn execute(&self, _transaction: &Transaction) -> Result<()> {
        Ok(())
    }
}
