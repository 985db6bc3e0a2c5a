//! In-memory MovesetStore implementation for tests and local runs.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use moveset_core::{CreatureId, LearnRow, Statement, Transaction};

use crate::repository::{MovesetStore, Result, StoreError};

/// In-process `pokemon_movesets` table.
///
/// Rows are unique per `(creature, move, method)`. A transaction is applied
/// to a staged copy of the creature's rows and published only when every
/// statement succeeded. Committed transactions are journaled so tests can
/// inspect the exact statements a batch produced.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<CreatureId, Vec<LearnRow>>>,
    journal: RwLock<Vec<Transaction>>,
    executed: AtomicUsize,
    fail_at: Option<usize>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose `index`-th executed transaction (0-based) fails.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    /// Seed rows for `creature`, bypassing the journal.
    pub fn with_rows(self, creature: CreatureId, rows: Vec<LearnRow>) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.insert(creature, rows);
        }
        self
    }

    /// Current rows of `creature`.
    pub fn rows(&self, creature: CreatureId) -> Result<Vec<LearnRow>> {
        let tables = self.tables.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(tables.get(&creature).cloned().unwrap_or_default())
    }

    /// Every committed transaction, oldest first.
    pub fn journal(&self) -> Result<Vec<Transaction>> {
        let journal = self.journal.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(journal.clone())
    }
}

fn apply_statement(rows: &mut Vec<LearnRow>, statement: &Statement) {
    match statement {
        Statement::InsertRows(inserted) => {
            for row in inserted {
                match rows.iter_mut().find(|existing| {
                    existing.move_id == row.move_id && existing.learn_method == row.learn_method
                }) {
                    Some(existing) => existing.level_learned = row.level_learned,
                    None => rows.push(*row),
                }
            }
        }
        Statement::UpdateLevel { move_id, level } => {
            for row in rows.iter_mut().filter(|row| row.move_id == *move_id) {
                row.level_learned = *level;
            }
        }
        Statement::DeleteMoves(move_ids) => {
            rows.retain(|row| !move_ids.contains(&row.move_id));
        }
        Statement::RetainMethods { move_id, methods } => {
            rows.retain(|row| row.move_id != *move_id || methods.has(row.learn_method));
        }
        Statement::ExchangeMoves { first, second } => {
            for row in rows.iter_mut() {
                if row.move_id == *first {
                    row.move_id = *second;
                } else if row.move_id == *second {
                    row.move_id = *first;
                }
            }
        }
    }
}

#[async_trait]
impl MovesetStore for MemoryStore {
    async fn load(&self, creature: CreatureId) -> Result<Vec<LearnRow>> {
        self.rows(creature)
    }

    async fn execute(&self, transaction: &Transaction) -> Result<()> {
        let index = self.executed.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(index) {
            return Err(StoreError::Rejected(format!(
                "injected failure on transaction {}",
                index
            )));
        }

        let mut tables = self.tables.write().map_err(|_| StoreError::LockPoisoned)?;
        let mut staged = tables
            .get(&transaction.creature)
            .cloned()
            .unwrap_or_default();
        for statement in &transaction.statements {
            apply_statement(&mut staged, statement);
        }
        tables.insert(transaction.creature, staged);
        drop(tables);

        self.journal
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .push(transaction.clone());

        tracing::debug!(
            creature = %transaction.creature,
            statements = transaction.statements.len(),
            "committed transaction to memory store"
        );
        Ok(())
    }
}
