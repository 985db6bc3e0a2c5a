//! Static lookup tables consulted while editing.
//!
//! Catalogs are immutable during a batch; the moveset itself lives in the
//! store or in the caller's hands.
mod moves;
mod species;

pub use moves::MoveCatalog;
pub use species::SpeciesCatalog;
