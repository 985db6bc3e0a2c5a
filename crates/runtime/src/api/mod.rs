//! Public runtime API surface.
//!
//! Gathers the types exposed to consumers of the runtime crate so the session
//! and synchronizer can stay focused on orchestration.

pub mod errors;

pub use errors::{EditError, Result};
