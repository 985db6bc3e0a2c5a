//! Deterministic moveset editing rules shared by every backend.
//!
//! `moveset-core` defines the canonical move algebra and exposes pure APIs
//! that both the detached (memory-only) editor and the storage-backed runtime
//! reuse. All moveset mutation flows through [`Moveset::apply`]; the
//! [`plan`] module derives storage statements from the same effects so the
//! two representations cannot drift apart.
pub mod algebra;
pub mod classify;
pub mod error;
pub mod identity;
pub mod moveset;
pub mod plan;
pub mod request;

pub use algebra::Effect;
pub use classify::ClassifiedBatch;
pub use error::{EditorError, ErrorSeverity, Result, ValidationError};
pub use identity::{
    SHARD_COUNT, SpeciesResolver, TeamMember, TrainerRoster, partition_by_shard,
    round_up_to_hundred, shard_for, unique_team_member_id,
};
pub use moveset::{LearnMethod, LearnMethods, MoveEntry, MoveLearnRecord, Moveset};
pub use plan::{
    BatchPlan, CreatureId, GroupPlan, LearnRow, MoveId, MoveResolver, Statement, Transaction,
    fold_rows, plan_batch,
};
pub use request::{ChangeRequest, OperationGroup, OperationKind, RawChangeRequest};
