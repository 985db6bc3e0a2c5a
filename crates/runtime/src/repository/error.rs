//! Error types raised by moveset store and shard repository implementations.

use moveset_core::{EditorError, ErrorSeverity};
use thiserror::Error;

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("moveset store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "sqlite")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("corrupted row: {0}")]
    CorruptedRow(String),

    #[error("transaction rejected: {0}")]
    Rejected(String),
}

impl EditorError for StoreError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::LockPoisoned | Self::CorruptedRow(_) | Self::Json(_) => ErrorSeverity::Internal,
            Self::Io(_) | Self::Rejected(_) => ErrorSeverity::Recoverable,
            #[cfg(feature = "sqlite")]
            Self::Database(_) => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::LockPoisoned => "lock_poisoned",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
            #[cfg(feature = "sqlite")]
            Self::Database(_) => "database",
            Self::CorruptedRow(_) => "corrupted_row",
            Self::Rejected(_) => "rejected",
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
