//! The move algebra: the effect of one change request on a moveset.
//!
//! Every backend goes through [`Moveset::apply`]. It mutates the moveset and
//! reports an [`Effect`] describing exactly which records were superseded,
//! which the persistence planner turns into storage statements.
//!
//! Learn-method rules:
//! - add, shift and replace-by-level write `{level-up}` or
//!   `{level-up, machine}` via [`LearnMethods::level_up_lineage`]
//! - replace-by-level takes its lineage from the record it evicts from the
//!   level slot, not from the incoming move's own history
//! - swap normalizes both records to the lineage of the first move
//! - replace-move carries the record over untouched

use crate::classify::ClassifiedBatch;
use crate::error::{Result, ValidationError};
use crate::moveset::{LearnMethods, MoveLearnRecord, Moveset};
use crate::request::{ChangeRequest, OperationKind};

/// What one applied request did to the moveset.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Add or shift wrote `record` under `name`, superseding `prior`.
    Written {
        name: String,
        prior: Option<MoveLearnRecord>,
        record: MoveLearnRecord,
    },
    /// Delete removed `name`.
    Removed {
        name: String,
        record: MoveLearnRecord,
    },
    /// Replace-move re-keyed `record` from `from` to `to`.
    ///
    /// `displaced` is the record `to` held before, if it was already learned.
    Renamed {
        from: String,
        to: String,
        record: MoveLearnRecord,
        displaced: Option<MoveLearnRecord>,
    },
    /// Replace-by-level evicted `vacated` from the slot and wrote `name` there.
    SlotReplaced {
        vacated: String,
        vacated_record: MoveLearnRecord,
        name: String,
        displaced: Option<MoveLearnRecord>,
        record: MoveLearnRecord,
    },
    /// Swap exchanged the records of `first` and `second`.
    Swapped {
        first: String,
        second: String,
        first_before: MoveLearnRecord,
        second_before: MoveLearnRecord,
        first_after: MoveLearnRecord,
        second_after: MoveLearnRecord,
    },
}

fn unknown_move(kind: OperationKind, name: &str) -> ValidationError {
    ValidationError::UnknownMove {
        kind,
        name: name.to_string(),
    }
}

fn check_level(kind: OperationKind, name: &str, level: u32) -> Result<()> {
    if level == 0 {
        return Err(ValidationError::InvalidLevel {
            kind,
            name: name.to_string(),
            level,
        });
    }
    Ok(())
}

impl Moveset {
    /// Apply one request in place.
    ///
    /// On error the moveset is left unchanged.
    pub fn apply(&mut self, request: &ChangeRequest) -> Result<Effect> {
        let kind = request.kind();
        match request {
            ChangeRequest::Add { name, level } => self.write_level_up(kind, name, *level),
            ChangeRequest::Shift { name, level } => {
                if !self.contains(name) {
                    return Err(unknown_move(kind, name));
                }
                self.write_level_up(kind, name, *level)
            }
            ChangeRequest::Delete { name } => {
                let record = self.remove(name).ok_or_else(|| unknown_move(kind, name))?;
                Ok(Effect::Removed {
                    name: name.clone(),
                    record,
                })
            }
            ChangeRequest::ReplaceMove { name, replacement } => {
                self.replace_move(kind, name, replacement)
            }
            ChangeRequest::ReplaceByLevel { level, name } => {
                self.replace_by_level(kind, *level, name)
            }
            ChangeRequest::SwapMoves { name, other } => self.swap_moves(kind, name, other),
        }
    }

    /// Apply a whole batch in classifier order, all or nothing.
    pub fn apply_batch(&mut self, requests: &[ChangeRequest]) -> Result<Vec<Effect>> {
        let batch = ClassifiedBatch::from_requests(requests.iter().cloned());
        self.apply_classified(&batch)
    }

    /// Apply pre-classified groups, all or nothing.
    pub fn apply_classified(&mut self, batch: &ClassifiedBatch) -> Result<Vec<Effect>> {
        let mut staged = self.clone();
        let effects = batch
            .requests()
            .map(|request| staged.apply(request))
            .collect::<Result<Vec<_>>>()?;
        *self = staged;
        Ok(effects)
    }

    fn write_level_up(&mut self, kind: OperationKind, name: &str, level: u32) -> Result<Effect> {
        check_level(kind, name, level)?;
        let prior = self.get(name).copied();
        let superseded = prior.map(|r| r.learn_method).unwrap_or_default();
        let record = MoveLearnRecord::new(level, LearnMethods::level_up_lineage(superseded));
        self.insert(name, record);
        Ok(Effect::Written {
            name: name.to_string(),
            prior,
            record,
        })
    }

    fn replace_move(&mut self, kind: OperationKind, from: &str, to: &str) -> Result<Effect> {
        let record = *self.get(from).ok_or_else(|| unknown_move(kind, from))?;
        if from == to {
            return Ok(Effect::Renamed {
                from: from.to_string(),
                to: to.to_string(),
                record,
                displaced: None,
            });
        }

        let displaced = self.remove(to);
        let index = self.position(from).ok_or_else(|| unknown_move(kind, from))?;
        self.entry_mut(index).name = to.to_string();

        Ok(Effect::Renamed {
            from: from.to_string(),
            to: to.to_string(),
            record,
            displaced,
        })
    }

    fn replace_by_level(&mut self, kind: OperationKind, level: u32, name: &str) -> Result<Effect> {
        check_level(kind, name, level)?;
        let slot = self
            .first_at_level(level)
            .cloned()
            .ok_or(ValidationError::UnknownLevelSlot { level })?;
        let index = self
            .position(&slot.name)
            .ok_or(ValidationError::UnknownLevelSlot { level })?;
        self.remove(&slot.name);

        // The incoming move inherits the slot's lineage, not its own.
        let record = MoveLearnRecord::new(
            level,
            LearnMethods::level_up_lineage(slot.record.learn_method),
        );
        let displaced = if self.contains(name) {
            self.insert(name, record)
        } else {
            self.insert_at(index, name.to_string(), record);
            None
        };

        Ok(Effect::SlotReplaced {
            vacated: slot.name,
            vacated_record: slot.record,
            name: name.to_string(),
            displaced,
            record,
        })
    }

    fn swap_moves(&mut self, kind: OperationKind, first: &str, second: &str) -> Result<Effect> {
        let first_before = *self.get(first).ok_or_else(|| unknown_move(kind, first))?;
        let second_before = *self.get(second).ok_or_else(|| unknown_move(kind, second))?;

        let methods = LearnMethods::level_up_lineage(first_before.learn_method);
        let first_after = MoveLearnRecord::new(second_before.level_learned, methods);
        let second_after = MoveLearnRecord::new(first_before.level_learned, methods);
        self.insert(first, first_after);
        self.insert(second, second_after);

        Ok(Effect::Swapped {
            first: first.to_string(),
            second: second.to_string(),
            first_before,
            second_before,
            first_after,
            second_after,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_up_machine(level: u32) -> MoveLearnRecord {
        MoveLearnRecord::new(level, LearnMethods::LEVEL_UP | LearnMethods::MACHINE)
    }

    fn starter() -> Moveset {
        [
            ("tackle".to_string(), MoveLearnRecord::level_up(1)),
            ("growl".to_string(), MoveLearnRecord::level_up(3)),
            ("ember".to_string(), level_up_machine(7)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_add_then_delete_restores_moveset() {
        let original = starter();
        let mut moveset = original.clone();

        moveset.apply(&ChangeRequest::add("scratch", 4)).unwrap();
        moveset.apply(&ChangeRequest::delete("scratch")).unwrap();

        assert_eq!(moveset, original);
    }

    #[test]
    fn test_add_keeps_machine_from_prior_record() {
        let mut moveset = starter();
        moveset
            .insert("flamethrower", MoveLearnRecord::new(0, LearnMethods::MACHINE | LearnMethods::TUTOR));

        moveset.apply(&ChangeRequest::add("flamethrower", 30)).unwrap();

        assert_eq!(moveset.get("flamethrower"), Some(&level_up_machine(30)));
    }

    #[test]
    fn test_add_of_new_move_is_plain_level_up() {
        let mut moveset = starter();
        let effect = moveset.apply(&ChangeRequest::add("scratch", 4)).unwrap();

        assert_eq!(moveset.get("scratch"), Some(&MoveLearnRecord::level_up(4)));
        assert_eq!(
            effect,
            Effect::Written {
                name: "scratch".into(),
                prior: None,
                record: MoveLearnRecord::level_up(4),
            }
        );
    }

    #[test]
    fn test_shift_relevels_and_keeps_machine() {
        let mut moveset = starter();
        moveset.apply(&ChangeRequest::shift("ember", 9)).unwrap();
        assert_eq!(moveset.get("ember"), Some(&level_up_machine(9)));
    }

    #[test]
    fn test_shift_of_missing_move_is_rejected() {
        let mut moveset = starter();
        let err = moveset.apply(&ChangeRequest::shift("surf", 9)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownMove {
                kind: OperationKind::Shift,
                name: "surf".into(),
            }
        );
        assert_eq!(moveset, starter());
    }

    #[test]
    fn test_level_zero_is_rejected() {
        let mut moveset = starter();
        assert!(matches!(
            moveset.apply(&ChangeRequest::add("scratch", 0)),
            Err(ValidationError::InvalidLevel { level: 0, .. })
        ));
    }

    #[test]
    fn test_delete_of_missing_move_is_rejected() {
        let mut moveset = starter();
        assert!(matches!(
            moveset.apply(&ChangeRequest::delete("surf")),
            Err(ValidationError::UnknownMove {
                kind: OperationKind::Delete,
                ..
            })
        ));
    }

    #[test]
    fn test_replace_move_rekeys_in_place() {
        let mut moveset = starter();
        moveset
            .apply(&ChangeRequest::replace_move("growl", "leer"))
            .unwrap();

        assert!(!moveset.contains("growl"));
        assert_eq!(moveset.position("leer"), Some(1));
        assert_eq!(moveset.get("leer"), Some(&MoveLearnRecord::level_up(3)));
    }

    #[test]
    fn test_replace_move_onto_existing_key_overwrites_it() {
        let mut moveset = starter();
        let effect = moveset
            .apply(&ChangeRequest::replace_move("growl", "tackle"))
            .unwrap();

        assert_eq!(moveset.len(), 2);
        assert_eq!(moveset.position("tackle"), Some(0));
        assert_eq!(moveset.get("tackle"), Some(&MoveLearnRecord::level_up(3)));
        assert!(matches!(
            effect,
            Effect::Renamed {
                displaced: Some(_),
                ..
            }
        ));
    }

    #[test]
    fn test_replace_by_level_inherits_slot_lineage() {
        let mut moveset = starter();
        // The incoming move's own history must not matter.
        moveset.insert("smokescreen", MoveLearnRecord::new(20, LearnMethods::EGG));

        moveset
            .apply(&ChangeRequest::replace_by_level(7, "smokescreen"))
            .unwrap();

        assert!(!moveset.contains("ember"));
        assert_eq!(moveset.get("smokescreen"), Some(&level_up_machine(7)));
    }

    #[test]
    fn test_replace_by_level_drops_machine_when_slot_had_none() {
        let mut moveset = starter();
        moveset.insert("flamethrower", level_up_machine(40));

        moveset
            .apply(&ChangeRequest::replace_by_level(3, "flamethrower"))
            .unwrap();

        assert_eq!(
            moveset.get("flamethrower"),
            Some(&MoveLearnRecord::level_up(3))
        );
        assert!(!moveset.contains("growl"));
    }

    #[test]
    fn test_replace_by_level_takes_slot_position() {
        let mut moveset = starter();
        moveset
            .apply(&ChangeRequest::replace_by_level(3, "leer"))
            .unwrap();
        assert_eq!(moveset.position("leer"), Some(1));
    }

    #[test]
    fn test_replace_by_level_without_slot_is_rejected() {
        let mut moveset = starter();
        assert_eq!(
            moveset.apply(&ChangeRequest::replace_by_level(50, "leer")),
            Err(ValidationError::UnknownLevelSlot { level: 50 })
        );
    }

    #[test]
    fn test_swap_exchanges_levels_and_normalizes_methods() {
        let mut moveset = starter();
        moveset
            .apply(&ChangeRequest::swap_moves("ember", "tackle"))
            .unwrap();

        assert_eq!(moveset.get("ember"), Some(&level_up_machine(1)));
        assert_eq!(moveset.get("tackle"), Some(&level_up_machine(7)));
    }

    #[test]
    fn test_double_swap_restores_levels_only() {
        let mut moveset = starter();
        moveset.insert("ember", MoveLearnRecord::new(7, LearnMethods::MACHINE | LearnMethods::EGG));

        moveset
            .apply(&ChangeRequest::swap_moves("ember", "tackle"))
            .unwrap();
        moveset
            .apply(&ChangeRequest::swap_moves("ember", "tackle"))
            .unwrap();

        assert_eq!(moveset.get("ember").map(|r| r.level_learned), Some(7));
        assert_eq!(moveset.get("tackle").map(|r| r.level_learned), Some(1));
        // Egg is gone: methods are normalized, not restored.
        assert_eq!(moveset.get("ember"), Some(&level_up_machine(7)));
        assert_eq!(moveset.get("tackle"), Some(&level_up_machine(1)));
    }

    #[test]
    fn test_swap_with_missing_move_is_rejected() {
        let mut moveset = starter();
        assert!(matches!(
            moveset.apply(&ChangeRequest::swap_moves("tackle", "surf")),
            Err(ValidationError::UnknownMove { name, .. }) if name == "surf"
        ));
        assert_eq!(moveset, starter());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut moveset = starter();
        let err = moveset
            .apply_batch(&[
                ChangeRequest::add("scratch", 4),
                ChangeRequest::delete("surf"),
            ])
            .unwrap_err();

        assert!(matches!(err, ValidationError::UnknownMove { .. }));
        assert_eq!(moveset, starter());
    }

    #[test]
    fn test_add_shift_delete_batch_empties_moveset() {
        let mut moveset = Moveset::new();
        moveset
            .apply_batch(&[
                ChangeRequest::add("tackle", 1),
                ChangeRequest::shift("tackle", 5),
                ChangeRequest::delete("tackle"),
            ])
            .unwrap();
        assert!(moveset.is_empty());
    }

    #[test]
    fn test_batch_runs_deletes_after_additions() {
        // Listed first, but the delete only sees "scratch" because adds run before deletes.
        let mut moveset = starter();
        moveset
            .apply_batch(&[
                ChangeRequest::delete("scratch"),
                ChangeRequest::add("scratch", 4),
            ])
            .unwrap();
        assert!(!moveset.contains("scratch"));
    }

    #[test]
    fn test_add_after_shift_wins() {
        let mut moveset = starter();
        moveset
            .apply_batch(&[
                ChangeRequest::shift("tackle", 5),
                ChangeRequest::add("tackle", 9),
            ])
            .unwrap();
        assert_eq!(moveset.get("tackle"), Some(&MoveLearnRecord::level_up(9)));
    }

    #[test]
    fn test_interleaved_add_and_shift_apply_in_listed_order() {
        let mut moveset = Moveset::new();
        moveset
            .apply_batch(&[
                ChangeRequest::add("scratch", 1),
                ChangeRequest::shift("scratch", 5),
                ChangeRequest::add("scratch", 3),
            ])
            .unwrap();
        assert_eq!(moveset.get("scratch"), Some(&MoveLearnRecord::level_up(3)));
    }

    #[test]
    fn test_shift_before_add_of_new_move_is_rejected() {
        let mut moveset = Moveset::new();
        let err = moveset
            .apply_batch(&[
                ChangeRequest::shift("scratch", 5),
                ChangeRequest::add("scratch", 1),
            ])
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownMove {
                kind: OperationKind::Shift,
                name: "scratch".into(),
            }
        );
        assert!(moveset.is_empty());
    }
}
