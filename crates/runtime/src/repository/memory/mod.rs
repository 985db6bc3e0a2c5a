//! In-memory repository implementations for testing and development.

mod moveset;

pub use moveset::MemoryStore;
