//! Unified error types surfaced by editing sessions.
//!
//! Wraps validation failures from the move algebra and storage failures from
//! the synchronizer so clients can tell a rejected batch from one that was
//! partially applied.
use moveset_core::{EditorError, ErrorSeverity, OperationGroup, ValidationError};
use thiserror::Error;

pub use crate::repository::StoreError;

pub type Result<T> = std::result::Result<T, EditError>;

#[derive(Debug, Error)]
pub enum EditError {
    /// The batch was rejected before any storage call.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A per-group transaction failed. Groups in `committed` stay applied.
    #[error("{group} group failed to commit after {} committed group(s)", committed.len())]
    Storage {
        group: OperationGroup,
        committed: Vec<OperationGroup>,
        #[source]
        source: StoreError,
    },

    /// The single batch transaction failed; nothing was applied.
    #[error("batch transaction failed to commit")]
    BatchStorage(#[source] StoreError),

    /// Loading or another storage call outside a batch failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EditError {
    /// True when storage holds some, but not all, of the batch's groups.
    pub fn is_partially_applied(&self) -> bool {
        matches!(self, Self::Storage { committed, .. } if !committed.is_empty())
    }

    /// Groups committed before the failure.
    pub fn committed(&self) -> &[OperationGroup] {
        match self {
            Self::Storage { committed, .. } => committed,
            _ => &[],
        }
    }
}

impl EditorError for EditError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Validation(err) => err.severity(),
            Self::Storage { source, .. } | Self::BatchStorage(source) | Self::Store(source) => {
                source.severity()
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(err) => err.error_code(),
            Self::Storage { .. } => "group_storage",
            Self::BatchStorage(_) => "batch_storage",
            Self::Store(err) => err.error_code(),
        }
    }
}
