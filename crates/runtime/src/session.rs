//! Editing session: the context object every edit runs through.
//!
//! An [`EditSession`] owns a store handle, the move and species catalogs and
//! the runtime configuration. There is no ambient state; callers build one
//! session per store and pass it around.

use moveset_core::{
    ChangeRequest, ClassifiedBatch, CreatureId, MoveResolver, Moveset, RawChangeRequest,
    TrainerRoster, fold_rows, plan_batch, unique_team_member_id,
};
use rand::Rng;

use crate::api::Result;
use crate::catalog::{MoveCatalog, SpeciesCatalog};
use crate::config::RuntimeConfig;
use crate::repository::MovesetStore;
use crate::synchronizer::{BatchReport, Synchronizer};

pub struct EditSession<S: MovesetStore> {
    store: S,
    moves: MoveCatalog,
    species: SpeciesCatalog,
    config: RuntimeConfig,
}

impl<S: MovesetStore> EditSession<S> {
    pub fn builder(store: S) -> EditSessionBuilder<S> {
        EditSessionBuilder::new(store)
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn moves(&self) -> &MoveCatalog {
        &self.moves
    }

    pub fn species(&self) -> &SpeciesCatalog {
        &self.species
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    fn resolver(&self) -> Option<&dyn MoveResolver> {
        if self.store.is_persistent() {
            Some(&self.moves)
        } else {
            None
        }
    }

    /// Read `creature`'s persisted moveset.
    ///
    /// Detached stores hold nothing, so this yields an empty moveset there.
    /// Entry order follows storage rows, which can differ from a mirrored
    /// moveset after a rename, slot replacement or swap.
    pub async fn load_moveset(&self, creature: CreatureId) -> Result<Moveset> {
        let rows = self.store.load(creature).await?;
        Ok(fold_rows(&rows, &self.moves)?)
    }

    /// Validate, persist and mirror a batch of change requests.
    ///
    /// The whole batch is checked against `moveset` before storage is
    /// touched; a validation failure leaves both unchanged.
    pub async fn apply_batch(
        &self,
        creature: CreatureId,
        moveset: &mut Moveset,
        requests: impl IntoIterator<Item = ChangeRequest>,
    ) -> Result<BatchReport> {
        let batch = ClassifiedBatch::from_requests(requests);
        self.commit(creature, moveset, &batch).await
    }

    /// Like [`apply_batch`](Self::apply_batch), for wire-shaped requests.
    pub async fn apply_raw_batch(
        &self,
        creature: CreatureId,
        moveset: &mut Moveset,
        requests: impl IntoIterator<Item = RawChangeRequest>,
    ) -> Result<BatchReport> {
        let batch = ClassifiedBatch::from_raw(requests)?;
        self.commit(creature, moveset, &batch).await
    }

    async fn commit(
        &self,
        creature: CreatureId,
        moveset: &mut Moveset,
        batch: &ClassifiedBatch,
    ) -> Result<BatchReport> {
        let plan = plan_batch(moveset, batch, self.resolver())?;
        tracing::debug!(
            %creature,
            requests = batch.len(),
            statements = plan.statement_count(),
            "batch validated"
        );

        Synchronizer::new(&self.store, creature, self.config.atomicity)
            .commit(moveset, plan)
            .await
    }

    /// Generate an id for a new member of `trainer`'s team.
    pub fn new_team_member_id<R: Rng + ?Sized>(
        &self,
        roster: Option<&TrainerRoster>,
        trainer: &str,
        species: &str,
        rng: &mut R,
    ) -> Result<String> {
        Ok(unique_team_member_id(
            roster,
            trainer,
            species,
            &self.species,
            rng,
            self.config.team_id_attempts,
        )?)
    }
}

/// Builder for [`EditSession`].
pub struct EditSessionBuilder<S: MovesetStore> {
    store: S,
    moves: MoveCatalog,
    species: SpeciesCatalog,
    config: RuntimeConfig,
}

impl<S: MovesetStore> EditSessionBuilder<S> {
    fn new(store: S) -> Self {
        Self {
            store,
            moves: MoveCatalog::default(),
            species: SpeciesCatalog::default(),
            config: RuntimeConfig::default(),
        }
    }

    pub fn moves(mut self, moves: MoveCatalog) -> Self {
        self.moves = moves;
        self
    }

    pub fn species(mut self, species: SpeciesCatalog) -> Self {
        self.species = species;
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> EditSession<S> {
        EditSession {
            store: self.store,
            moves: self.moves,
            species: self.species,
            config: self.config,
        }
    }
}
