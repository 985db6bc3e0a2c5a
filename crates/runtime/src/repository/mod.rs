//! Storage layer for persisted movesets and creature records.
//!
//! - [`MovesetStore`] is the port the synchronizer writes through. Backends:
//!   [`DetachedStore`], [`MemoryStore`] and, with the `sqlite` feature,
//!   [`SqliteStore`].
//! - [`FileShardRepository`] keeps creature records in sharded JSON files.

mod detached;
mod error;
mod file;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;
mod traits;

pub use detached::DetachedStore;
pub use error::{Result, StoreError};
pub use file::{CreatureRecord, FileShardRepository};
pub use memory::MemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
pub use traits::MovesetStore;
