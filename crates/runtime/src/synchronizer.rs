//! Commits planned batches to a [`MovesetStore`].
//!
//! The synchronizer executes the statements of a [`BatchPlan`] group by group
//! (or as one transaction, see [`Atomicity`]) and keeps the caller's moveset in
//! step with what storage actually committed.

use moveset_core::{BatchPlan, CreatureId, Moveset, OperationGroup, Transaction};
use tracing::{info, warn};

use crate::api::{EditError, Result};
use crate::config::Atomicity;
use crate::repository::MovesetStore;

/// Outcome of a committed batch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// Groups applied, in application order.
    pub committed: Vec<OperationGroup>,
    /// Statements sent to storage.
    pub statements: usize,
}

pub struct Synchronizer<'a, S: MovesetStore + ?Sized> {
    store: &'a S,
    creature: CreatureId,
    atomicity: Atomicity,
}

impl<'a, S: MovesetStore + ?Sized> Synchronizer<'a, S> {
    pub fn new(store: &'a S, creature: CreatureId, atomicity: Atomicity) -> Self {
        Self {
            store,
            creature,
            atomicity,
        }
    }

    /// Commit `plan`, mirroring every committed group into `moveset`.
    ///
    /// `plan` must have been built from `moveset`. On a storage failure the
    /// moveset reflects exactly the groups that committed.
    pub async fn commit(&self, moveset: &mut Moveset, plan: BatchPlan) -> Result<BatchReport> {
        match self.atomicity {
            Atomicity::PerGroup => self.commit_per_group(moveset, plan).await,
            Atomicity::Batch => self.commit_batch(moveset, plan).await,
        }
    }

    async fn commit_per_group(&self, moveset: &mut Moveset, plan: BatchPlan) -> Result<BatchReport> {
        let mut report = BatchReport::default();

        for step in plan.groups {
            if self.store.is_persistent() && !step.statements.is_empty() {
                let statements = step.statements.len();
                let transaction = Transaction::new(self.creature, step.statements);

                if let Err(source) = self.store.execute(&transaction).await {
                    warn!(
                        creature = %self.creature,
                        group = %step.group,
                        committed = ?report.committed,
                        error = %source,
                        "group failed to commit; earlier groups remain applied"
                    );
                    return Err(EditError::Storage {
                        group: step.group,
                        committed: report.committed,
                        source,
                    });
                }
                report.statements += statements;
            }

            for request in &step.requests {
                moveset.apply(request)?;
            }

            info!(
                creature = %self.creature,
                group = %step.group,
                requests = step.requests.len(),
                "committed group"
            );
            report.committed.push(step.group);
        }

        Ok(report)
    }

    async fn commit_batch(&self, moveset: &mut Moveset, plan: BatchPlan) -> Result<BatchReport> {
        let committed: Vec<OperationGroup> = plan.groups.iter().map(|step| step.group).collect();
        let statements: Vec<_> = plan
            .groups
            .into_iter()
            .flat_map(|group| group.statements)
            .collect();
        let count = statements.len();

        if self.store.is_persistent() && !statements.is_empty() {
            let transaction = Transaction::new(self.creature, statements);
            if let Err(source) = self.store.execute(&transaction).await {
                warn!(
                    creature = %self.creature,
                    error = %source,
                    "batch transaction failed; nothing was applied"
                );
                return Err(EditError::BatchStorage(source));
            }
        }

        *moveset = plan.result;
        info!(
            creature = %self.creature,
            groups = ?committed,
            statements = count,
            "committed batch"
        );

        Ok(BatchReport {
            committed,
            statements: if self.store.is_persistent() { count } else { 0 },
        })
    }
}
