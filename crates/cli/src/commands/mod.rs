//! Subcommand implementations.

mod apply;
mod export;
mod shard;
mod show;
mod team_id;

pub use apply::Apply;
pub use export::Export;
pub use shard::Shard;
pub use show::Show;
pub use team_id::TeamId;
