//! Change requests submitted by the editor UI.
//!
//! [`ChangeRequest`] is the typed form the engine works with. The UI speaks a
//! looser wire shape ([`RawChangeRequest`]) with a string discriminator; it is
//! converted at the classifier boundary and unknown kinds are rejected there.

use crate::error::{Result, ValidationError};

/// The six ways a moveset can be edited.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Add = 0,
    Shift = 1,
    ReplaceMove = 2,
    ReplaceByLevel = 3,
    SwapMoves = 4,
    Delete = 5,
}

impl OperationKind {
    /// The group this kind is classified into.
    pub const fn group(self) -> OperationGroup {
        match self {
            Self::Add | Self::Shift => OperationGroup::AddShift,
            Self::ReplaceMove => OperationGroup::ReplaceMove,
            Self::ReplaceByLevel => OperationGroup::ReplaceByLevel,
            Self::SwapMoves => OperationGroup::SwapMoves,
            Self::Delete => OperationGroup::Delete,
        }
    }
}

/// A batch is split into these groups and each group is persisted together.
///
/// Declaration order is the order in which groups are applied. Additions and
/// re-levels share one group and keep the order the caller listed them in,
/// since a shift may target a move added earlier in the same batch and an add
/// may overwrite a move shifted before it.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum OperationGroup {
    AddShift = 0,
    ReplaceMove = 1,
    ReplaceByLevel = 2,
    SwapMoves = 3,
    Delete = 4,
}

impl OperationGroup {
    /// Position of this group in the batch application order.
    pub const fn order(self) -> usize {
        self as usize
    }
}

/// A single typed edit against one moveset.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "operation", rename_all = "snake_case")
)]
pub enum ChangeRequest {
    /// Learn `name` by level-up at `level`.
    Add { name: String, level: u32 },
    /// Re-level a move that is already learned.
    Shift { name: String, level: u32 },
    /// Forget `name`.
    Delete { name: String },
    /// Rename the entry at `name` to `replacement`, keeping its data.
    ReplaceMove { name: String, replacement: String },
    /// Put `name` into whichever slot is currently learned at `level`.
    ReplaceByLevel { level: u32, name: String },
    /// Exchange the records held by `name` and `other`.
    SwapMoves { name: String, other: String },
}

impl ChangeRequest {
    pub fn add(name: impl Into<String>, level: u32) -> Self {
        Self::Add {
            name: name.into(),
            level,
        }
    }

    pub fn shift(name: impl Into<String>, level: u32) -> Self {
        Self::Shift {
            name: name.into(),
            level,
        }
    }

    pub fn delete(name: impl Into<String>) -> Self {
        Self::Delete { name: name.into() }
    }

    pub fn replace_move(name: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self::ReplaceMove {
            name: name.into(),
            replacement: replacement.into(),
        }
    }

    pub fn replace_by_level(level: u32, name: impl Into<String>) -> Self {
        Self::ReplaceByLevel {
            level,
            name: name.into(),
        }
    }

    pub fn swap_moves(name: impl Into<String>, other: impl Into<String>) -> Self {
        Self::SwapMoves {
            name: name.into(),
            other: other.into(),
        }
    }

    pub fn kind(&self) -> OperationKind {
        match self {
            Self::Add { .. } => OperationKind::Add,
            Self::Shift { .. } => OperationKind::Shift,
            Self::Delete { .. } => OperationKind::Delete,
            Self::ReplaceMove { .. } => OperationKind::ReplaceMove,
            Self::ReplaceByLevel { .. } => OperationKind::ReplaceByLevel,
            Self::SwapMoves { .. } => OperationKind::SwapMoves,
        }
    }

    /// The primary move this request names.
    pub fn name(&self) -> &str {
        match self {
            Self::Add { name, .. }
            | Self::Shift { name, .. }
            | Self::Delete { name }
            | Self::ReplaceMove { name, .. }
            | Self::ReplaceByLevel { name, .. }
            | Self::SwapMoves { name, .. } => name,
        }
    }
}

/// Wire shape of a change request as the editor UI sends it.
///
/// `level` is only meaningful for add, shift and replace-by-level;
/// `secondaryMove` only for replace-move and swap-moves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawChangeRequest {
    pub operation: String,
    #[cfg_attr(feature = "serde", serde(rename = "move"))]
    pub move_name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    #[cfg_attr(feature = "serde", serde(rename = "secondaryMove", default))]
    pub secondary_move: String,
}

impl TryFrom<RawChangeRequest> for ChangeRequest {
    type Error = ValidationError;

    fn try_from(raw: RawChangeRequest) -> Result<Self> {
        let kind: OperationKind = raw
            .operation
            .parse()
            .map_err(|_| ValidationError::UnknownOperation(raw.operation.clone()))?;

        let secondary = |raw: RawChangeRequest| {
            if raw.secondary_move.is_empty() {
                Err(ValidationError::MissingSecondaryMove {
                    kind,
                    name: raw.move_name,
                })
            } else {
                Ok((raw.move_name, raw.secondary_move))
            }
        };

        Ok(match kind {
            OperationKind::Add => Self::Add {
                name: raw.move_name,
                level: raw.level,
            },
            OperationKind::Shift => Self::Shift {
                name: raw.move_name,
                level: raw.level,
            },
            OperationKind::Delete => Self::Delete {
                name: raw.move_name,
            },
            OperationKind::ReplaceMove => {
                let (name, replacement) = secondary(raw)?;
                Self::ReplaceMove { name, replacement }
            }
            OperationKind::ReplaceByLevel => Self::ReplaceByLevel {
                level: raw.level,
                name: raw.move_name,
            },
            OperationKind::SwapMoves => {
                let (name, other) = secondary(raw)?;
                Self::SwapMoves { name, other }
            }
        })
    }
}
