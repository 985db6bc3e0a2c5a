//! File-based repository implementations.

mod shards;

pub use shards::{CreatureRecord, FileShardRepository};
