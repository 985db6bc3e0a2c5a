//! Common error infrastructure for moveset-core.
//!
//! Every request in a change batch is checked against the moveset before any
//! storage is touched, so the only error this crate raises is
//! [`ValidationError`]. Storage failures live in the runtime crate and share
//! the [`EditorError`] classification defined here.

use crate::request::OperationKind;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the same batch may succeed if retried (e.g. a dropped connection)
/// - **Validation**: the batch itself is wrong and must be changed before retrying
/// - **Internal**: an invariant of the engine or its store was broken
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if retrying the same batch could succeed.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for errors raised while editing a moveset.
///
/// Implemented by [`ValidationError`] here and by the runtime's storage and
/// edit errors, so front-ends can classify failures without matching on
/// every variant.
pub trait EditorError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// A change request that cannot be applied to the current moveset.
///
/// Raised for a whole batch before any group reaches storage.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("unrecognized operation kind `{0}`")]
    UnknownOperation(String),

    #[error("unknown move reference `{name}` in {kind} request")]
    UnknownMove { kind: OperationKind, name: String },

    #[error("no move is learned at level {level}")]
    UnknownLevelSlot { level: u32 },

    #[error("{kind} request for `{name}` has level {level}; levels start at 1")]
    InvalidLevel {
        kind: OperationKind,
        name: String,
        level: u32,
    },

    #[error("{kind} request for `{name}` is missing its secondary move")]
    MissingSecondaryMove { kind: OperationKind, name: String },

    #[error("move `{0}` is not in the move catalog")]
    UnknownCatalogMove(String),

    #[error("move id {0} is not in the move catalog")]
    UnknownCatalogMoveId(i64),

    #[error("species `{0}` is not in the species catalog")]
    UnknownSpecies(String),

    #[error("team member id for trainer `{trainer}` collided on all {attempts} attempts")]
    IdentityCollision { trainer: String, attempts: usize },
}

impl EditorError for ValidationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            // A fresh random suffix may not collide next time.
            Self::IdentityCollision { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownOperation(_) => "unknown_operation",
            Self::UnknownMove { .. } => "unknown_move",
            Self::UnknownLevelSlot { .. } => "unknown_level_slot",
            Self::InvalidLevel { .. } => "invalid_level",
            Self::MissingSecondaryMove { .. } => "missing_secondary_move",
            Self::UnknownCatalogMove(_) => "unknown_catalog_move",
            Self::UnknownCatalogMoveId(_) => "unknown_catalog_move_id",
            Self::UnknownSpecies(_) => "unknown_species",
            Self::IdentityCollision { .. } => "identity_collision",
        }
    }
}

pub type Result<T> = core::result::Result<T, ValidationError>;
