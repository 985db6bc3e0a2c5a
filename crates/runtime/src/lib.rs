//! Storage-backed moveset editing.
//!
//! This crate wires the move algebra from `moveset-core` to durable storage.
//! Consumers build an [`EditSession`] over a [`MovesetStore`] and apply change
//! batches through it; the [`Synchronizer`] keeps the caller's moveset in step
//! with what each transaction committed.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the editing context object and its builder
//! - [`synchronizer`] commits planned batches group by group
//! - [`api`] exposes the error types downstream clients interact with
//! - [`catalog`] and [`repository`] provide data adapters reused by the CLI
pub mod api;
pub mod catalog;
pub mod config;
pub mod repository;
pub mod session;
pub mod synchronizer;

pub use api::{EditError, Result};
pub use catalog::{MoveCatalog, SpeciesCatalog};
pub use config::{Atomicity, RuntimeConfig};
#[cfg(feature = "sqlite")]
pub use repository::SqliteStore;
pub use repository::{
    CreatureRecord, DetachedStore, FileShardRepository, MemoryStore, MovesetStore, StoreError,
};
pub use session::{EditSession, EditSessionBuilder};
pub use synchronizer::{BatchReport, Synchronizer};
