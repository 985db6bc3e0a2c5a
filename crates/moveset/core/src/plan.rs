//! Persistence planning: the row-level statements each operation implies.
//!
//! Storage keeps one `pokemon_movesets` row per `(creature, move, method)`
//! while a [`Moveset`] keeps one record per move with a method *set*. The
//! planner runs the move algebra on a staged copy of the moveset and turns
//! each [`Effect`] into [`Statement`]s, so storage and memory are driven by
//! the same rules. Statement shapes per group:
//!
//! | group            | statements                                               |
//! |------------------|----------------------------------------------------------|
//! | add-shift        | in listed order: each run of adds is one multi-row       |
//! |                  | insert, each shift one level update (+ missing rows);    |
//! |                  | method pruning follows where needed                      |
//! | replace-move     | insert new identity, then delete old identity            |
//! | replace-by-level | delete evicted slot, then insert successor               |
//! | swap-moves       | exchange identities, then normalize both method sets     |
//! | delete           | one delete covering every listed move                    |

use crate::algebra::Effect;
use crate::classify::ClassifiedBatch;
use crate::error::{Result, ValidationError};
use crate::moveset::{LearnMethod, LearnMethods, MoveLearnRecord, Moveset};
use crate::request::{ChangeRequest, OperationGroup};

/// Storage identifier of a move (`moves.id`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MoveId(pub i64);

/// Storage identifier of a creature (`pokemon.id`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct CreatureId(pub i64);

impl core::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Resolves move names to storage identifiers and back.
pub trait MoveResolver {
    fn move_id(&self, name: &str) -> Option<MoveId>;

    fn move_name(&self, id: MoveId) -> Option<&str>;
}

/// One persisted learn row of a creature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LearnRow {
    pub move_id: MoveId,
    pub learn_method: LearnMethod,
    pub level_learned: u32,
}

/// A row-level storage statement scoped to one creature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Statement {
    /// Multi-row insert. A row that collides on `(creature, move, method)`
    /// takes the new level instead.
    InsertRows(Vec<LearnRow>),
    /// Set the level of every row of `move_id`.
    UpdateLevel { move_id: MoveId, level: u32 },
    /// Delete every row of the listed moves.
    DeleteMoves(Vec<MoveId>),
    /// Delete the rows of `move_id` whose method is outside `methods`.
    RetainMethods { move_id: MoveId, methods: LearnMethods },
    /// Exchange move identity between the rows of `first` and `second`.
    ExchangeMoves { first: MoveId, second: MoveId },
}

/// Statements that must commit all-or-nothing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub creature: CreatureId,
    pub statements: Vec<Statement>,
}

impl Transaction {
    pub fn new(creature: CreatureId, statements: Vec<Statement>) -> Self {
        Self {
            creature,
            statements,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// The planned effect of one operation group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupPlan {
    pub group: OperationGroup,
    pub requests: Vec<ChangeRequest>,
    pub effects: Vec<Effect>,
    pub statements: Vec<Statement>,
}

/// A validated batch: per-group statements plus the moveset they produce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchPlan {
    pub groups: Vec<GroupPlan>,
    pub result: Moveset,
}

impl BatchPlan {
    pub fn statement_count(&self) -> usize {
        self.groups.iter().map(|group| group.statements.len()).sum()
    }
}

/// Validate `batch` against `moveset` and derive its storage statements.
///
/// Any validation failure rejects the whole batch. With no resolver the plan
/// carries no statements, which is how detached (memory-only) editing runs.
pub fn plan_batch(
    moveset: &Moveset,
    batch: &ClassifiedBatch,
    resolver: Option<&dyn MoveResolver>,
) -> Result<BatchPlan> {
    let mut staged = moveset.clone();
    let mut groups = Vec::new();

    for (group, requests) in batch.groups() {
        let effects = requests
            .iter()
            .map(|request| staged.apply(request))
            .collect::<Result<Vec<_>>>()?;

        let statements = match resolver {
            Some(resolver) => Planner { resolver }.statements(group, requests, &effects)?,
            None => Vec::new(),
        };

        tracing::debug!(
            %group,
            requests = requests.len(),
            statements = statements.len(),
            "planned group"
        );

        groups.push(GroupPlan {
            group,
            requests: requests.to_vec(),
            effects,
            statements,
        });
    }

    Ok(BatchPlan {
        groups,
        result: staged,
    })
}

struct Planner<'a> {
    resolver: &'a dyn MoveResolver,
}

impl Planner<'_> {
    fn id(&self, name: &str) -> Result<MoveId> {
        self.resolver
            .move_id(name)
            .ok_or_else(|| ValidationError::UnknownCatalogMove(name.to_string()))
    }

    fn statements(
        &self,
        group: OperationGroup,
        requests: &[ChangeRequest],
        effects: &[Effect],
    ) -> Result<Vec<Statement>> {
        let mut statements = Vec::new();
        match group {
            OperationGroup::AddShift => {
                // Consecutive adds share one insert; a shift flushes them first.
                let mut rows = Vec::new();
                let mut pruning = Vec::new();
                for (request, effect) in requests.iter().zip(effects) {
                    let Effect::Written {
                        name,
                        prior,
                        record,
                    } = effect
                    else {
                        continue;
                    };
                    let move_id = self.id(name)?;
                    if matches!(request, ChangeRequest::Shift { .. }) {
                        flush_inserts(&mut statements, &mut rows, &mut pruning);
                        statements.push(Statement::UpdateLevel {
                            move_id,
                            level: record.level_learned,
                        });
                        let existing = prior.map(|p| p.learn_method).unwrap_or_default();
                        let missing = record.learn_method.difference(existing);
                        if !missing.is_empty() {
                            statements.push(Statement::InsertRows(rows_for(
                                move_id,
                                &MoveLearnRecord::new(record.level_learned, missing),
                            )));
                        }
                        statements.extend(prune(move_id, *prior, record.learn_method));
                    } else {
                        rows.extend(rows_for(move_id, record));
                        pruning.extend(prune(move_id, *prior, record.learn_method));
                    }
                }
                flush_inserts(&mut statements, &mut rows, &mut pruning);
            }
            OperationGroup::ReplaceMove => {
                for effect in effects {
                    if let Effect::Renamed {
                        from,
                        to,
                        record,
                        displaced,
                    } = effect
                    {
                        if from == to {
                            continue;
                        }
                        let old_id = self.id(from)?;
                        let new_id = self.id(to)?;
                        // Insert first so the move is never absent from storage.
                        statements.push(Statement::InsertRows(rows_for(new_id, record)));
                        statements.extend(prune(new_id, *displaced, record.learn_method));
                        statements.push(Statement::DeleteMoves(vec![old_id]));
                    }
                }
            }
            OperationGroup::ReplaceByLevel => {
                for effect in effects {
                    if let Effect::SlotReplaced {
                        vacated,
                        name,
                        displaced,
                        record,
                        ..
                    } = effect
                    {
                        let vacated_id = self.id(vacated)?;
                        let move_id = self.id(name)?;
                        statements.push(Statement::DeleteMoves(vec![vacated_id]));
                        statements.push(Statement::InsertRows(rows_for(move_id, record)));
                        statements.extend(prune(move_id, *displaced, record.learn_method));
                    }
                }
            }
            OperationGroup::SwapMoves => {
                for effect in effects {
                    if let Effect::Swapped {
                        first,
                        second,
                        first_before,
                        second_before,
                        first_after,
                        second_after,
                    } = effect
                    {
                        let first_id = self.id(first)?;
                        let second_id = self.id(second)?;
                        if first_id == second_id {
                            statements.push(Statement::InsertRows(rows_for(first_id, first_after)));
                            statements.extend(prune(
                                first_id,
                                Some(*first_before),
                                first_after.learn_method,
                            ));
                            continue;
                        }
                        statements.push(Statement::ExchangeMoves {
                            first: first_id,
                            second: second_id,
                        });
                        let mut rows = rows_for(first_id, first_after);
                        rows.extend(rows_for(second_id, second_after));
                        statements.push(Statement::InsertRows(rows));
                        // After the exchange each move holds the other's old rows.
                        statements.extend(prune(
                            first_id,
                            Some(*second_before),
                            first_after.learn_method,
                        ));
                        statements.extend(prune(
                            second_id,
                            Some(*first_before),
                            second_after.learn_method,
                        ));
                    }
                }
            }
            OperationGroup::Delete => {
                let ids = effects
                    .iter()
                    .filter_map(|effect| match effect {
                        Effect::Removed { name, .. } => Some(self.id(name)),
                        _ => None,
                    })
                    .collect::<Result<Vec<_>>>()?;
                statements.push(Statement::DeleteMoves(ids));
            }
        }
        Ok(statements)
    }
}

/// Emit the pending run of added rows as one insert, then its pruning.
fn flush_inserts(
    statements: &mut Vec<Statement>,
    rows: &mut Vec<LearnRow>,
    pruning: &mut Vec<Statement>,
) {
    if rows.is_empty() {
        return;
    }
    statements.push(Statement::InsertRows(std::mem::take(rows)));
    statements.append(pruning);
}

fn rows_for(move_id: MoveId, record: &MoveLearnRecord) -> Vec<LearnRow> {
    record
        .learn_method
        .methods()
        .map(|learn_method| LearnRow {
            move_id,
            learn_method,
            level_learned: record.level_learned,
        })
        .collect()
}

/// Prune statement needed when `superseded` carried methods outside `kept`.
fn prune(
    move_id: MoveId,
    superseded: Option<MoveLearnRecord>,
    kept: LearnMethods,
) -> Option<Statement> {
    let superseded = superseded?.learn_method;
    if superseded.difference(kept).is_empty() {
        return None;
    }
    Some(Statement::RetainMethods {
        move_id,
        methods: kept,
    })
}

/// Fold persisted rows back into a [`Moveset`].
///
/// Rows of one move merge into one record: methods are unioned, the level is
/// the level-up row's level when present and the lowest row level otherwise.
/// Entry order follows the first row of each move.
pub fn fold_rows(rows: &[LearnRow], resolver: &dyn MoveResolver) -> Result<Moveset> {
    let mut order: Vec<MoveId> = Vec::new();
    let mut merged: Vec<(MoveLearnRecord, bool)> = Vec::new();

    for row in rows {
        let index = match order.iter().position(|id| *id == row.move_id) {
            Some(index) => index,
            None => {
                order.push(row.move_id);
                merged.push((
                    MoveLearnRecord::new(row.level_learned, LearnMethods::empty()),
                    false,
                ));
                order.len() - 1
            }
        };

        let (record, has_level_up) = &mut merged[index];
        record.learn_method |= LearnMethods::from(row.learn_method);
        if row.learn_method == LearnMethod::LevelUp {
            record.level_learned = row.level_learned;
            *has_level_up = true;
        } else if !*has_level_up {
            record.level_learned = record.level_learned.min(row.level_learned);
        }
    }

    order
        .into_iter()
        .zip(merged)
        .map(|(move_id, (record, _))| {
            resolver
                .move_name(move_id)
                .map(|name| (name.to_string(), record))
                .ok_or(ValidationError::UnknownCatalogMoveId(move_id.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Catalog(Vec<(&'static str, i64)>);

    impl MoveResolver for Catalog {
        fn move_id(&self, name: &str) -> Option<MoveId> {
            self.0
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, id)| MoveId(*id))
        }

        fn move_name(&self, id: MoveId) -> Option<&str> {
            self.0.iter().find(|(_, i)| *i == id.0).map(|(n, _)| *n)
        }
    }

    fn catalog() -> Catalog {
        Catalog(vec![
            ("tackle", 33),
            ("growl", 45),
            ("ember", 52),
            ("scratch", 10),
            ("leer", 43),
        ])
    }

    fn row(move_id: i64, learn_method: LearnMethod, level_learned: u32) -> LearnRow {
        LearnRow {
            move_id: MoveId(move_id),
            learn_method,
            level_learned,
        }
    }

    fn starter() -> Moveset {
        [
            ("tackle".to_string(), MoveLearnRecord::level_up(1)),
            ("growl".to_string(), MoveLearnRecord::level_up(3)),
            (
                "ember".to_string(),
                MoveLearnRecord::new(7, LearnMethods::LEVEL_UP | LearnMethods::MACHINE),
            ),
        ]
        .into_iter()
        .collect()
    }

    fn plan(requests: Vec<ChangeRequest>) -> BatchPlan {
        let catalog = catalog();
        plan_batch(
            &starter(),
            &ClassifiedBatch::from_requests(requests),
            Some(&catalog),
        )
        .unwrap()
    }

    #[test]
    fn test_add_group_is_one_multi_row_insert() {
        let plan = plan(vec![
            ChangeRequest::add("scratch", 4),
            ChangeRequest::add("leer", 9),
        ]);

        assert_eq!(plan.groups.len(), 1);
        assert_eq!(
            plan.groups[0].statements,
            vec![Statement::InsertRows(vec![
                row(10, LearnMethod::LevelUp, 4),
                row(43, LearnMethod::LevelUp, 9),
            ])]
        );
    }

    #[test]
    fn test_shift_updates_level_in_place() {
        let plan = plan(vec![ChangeRequest::shift("ember", 11)]);
        assert_eq!(
            plan.groups[0].statements,
            vec![Statement::UpdateLevel {
                move_id: MoveId(52),
                level: 11,
            }]
        );
    }

    #[test]
    fn test_mixed_add_shift_group_keeps_listed_order() {
        let plan = plan(vec![
            ChangeRequest::add("scratch", 1),
            ChangeRequest::add("leer", 2),
            ChangeRequest::shift("scratch", 5),
            ChangeRequest::add("scratch", 3),
        ]);

        assert_eq!(plan.groups.len(), 1);
        assert_eq!(plan.groups[0].group, OperationGroup::AddShift);
        assert_eq!(
            plan.groups[0].statements,
            vec![
                Statement::InsertRows(vec![
                    row(10, LearnMethod::LevelUp, 1),
                    row(43, LearnMethod::LevelUp, 2),
                ]),
                Statement::UpdateLevel {
                    move_id: MoveId(10),
                    level: 5,
                },
                Statement::InsertRows(vec![row(10, LearnMethod::LevelUp, 3)]),
            ]
        );
        assert_eq!(
            plan.result.get("scratch"),
            Some(&MoveLearnRecord::level_up(3))
        );
    }

    #[test]
    fn test_shift_of_move_added_later_is_rejected() {
        let catalog = catalog();
        let err = plan_batch(
            &Moveset::new(),
            &ClassifiedBatch::from_requests([
                ChangeRequest::shift("scratch", 5),
                ChangeRequest::add("scratch", 1),
            ]),
            Some(&catalog),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::UnknownMove { .. }));
    }

    #[test]
    fn test_delete_group_is_one_statement() {
        let plan = plan(vec![
            ChangeRequest::delete("tackle"),
            ChangeRequest::delete("growl"),
        ]);
        assert_eq!(
            plan.groups[0].statements,
            vec![Statement::DeleteMoves(vec![MoveId(33), MoveId(45)])]
        );
    }

    #[test]
    fn test_replace_move_inserts_before_deleting() {
        let plan = plan(vec![ChangeRequest::replace_move("growl", "leer")]);
        assert_eq!(
            plan.groups[0].statements,
            vec![
                Statement::InsertRows(vec![row(43, LearnMethod::LevelUp, 3)]),
                Statement::DeleteMoves(vec![MoveId(45)]),
            ]
        );
    }

    #[test]
    fn test_replace_by_level_persists_slot_lineage() {
        let plan = plan(vec![ChangeRequest::replace_by_level(7, "scratch")]);
        assert_eq!(
            plan.groups[0].statements,
            vec![
                Statement::DeleteMoves(vec![MoveId(52)]),
                Statement::InsertRows(vec![
                    row(10, LearnMethod::LevelUp, 7),
                    row(10, LearnMethod::Machine, 7),
                ]),
            ]
        );
    }

    #[test]
    fn test_swap_exchanges_then_normalizes() {
        let plan = plan(vec![ChangeRequest::swap_moves("tackle", "ember")]);
        // Tackle has no machine lineage, so ember's machine row is pruned.
        assert_eq!(
            plan.groups[0].statements,
            vec![
                Statement::ExchangeMoves {
                    first: MoveId(33),
                    second: MoveId(52),
                },
                Statement::InsertRows(vec![
                    row(33, LearnMethod::LevelUp, 7),
                    row(52, LearnMethod::LevelUp, 1),
                ]),
                Statement::RetainMethods {
                    move_id: MoveId(33),
                    methods: LearnMethods::LEVEL_UP,
                },
            ]
        );
    }

    #[test]
    fn test_add_over_tutor_record_prunes_tutor_row() {
        let catalog = catalog();
        let mut moveset = starter();
        moveset.insert("scratch", MoveLearnRecord::new(0, LearnMethods::TUTOR));

        let plan = plan_batch(
            &moveset,
            &ClassifiedBatch::from_requests([ChangeRequest::add("scratch", 4)]),
            Some(&catalog),
        )
        .unwrap();

        assert_eq!(
            plan.groups[0].statements,
            vec![
                Statement::InsertRows(vec![row(10, LearnMethod::LevelUp, 4)]),
                Statement::RetainMethods {
                    move_id: MoveId(10),
                    methods: LearnMethods::LEVEL_UP,
                },
            ]
        );
    }

    #[test]
    fn test_uncatalogued_move_is_rejected() {
        let catalog = catalog();
        let err = plan_batch(
            &starter(),
            &ClassifiedBatch::from_requests([ChangeRequest::add("surf", 20)]),
            Some(&catalog),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::UnknownCatalogMove("surf".into()));
    }

    #[test]
    fn test_detached_plan_has_no_statements() {
        let plan = plan_batch(
            &starter(),
            &ClassifiedBatch::from_requests([ChangeRequest::add("surf", 20)]),
            None,
        )
        .unwrap();
        assert_eq!(plan.statement_count(), 0);
        assert!(plan.result.contains("surf"));
    }

    #[test]
    fn test_fold_rows_merges_methods_per_move() {
        let rows = vec![
            row(52, LearnMethod::Machine, 0),
            row(33, LearnMethod::LevelUp, 1),
            row(52, LearnMethod::LevelUp, 7),
            row(45, LearnMethod::Egg, 2),
            row(45, LearnMethod::Tutor, 1),
        ];

        let moveset = fold_rows(&rows, &catalog()).unwrap();

        let names: Vec<_> = moveset.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["ember", "tackle", "growl"]);
        assert_eq!(
            moveset.get("ember"),
            Some(&MoveLearnRecord::new(
                7,
                LearnMethods::LEVEL_UP | LearnMethods::MACHINE
            ))
        );
        assert_eq!(
            moveset.get("growl"),
            Some(&MoveLearnRecord::new(
                1,
                LearnMethods::EGG | LearnMethods::TUTOR
            ))
        );
    }

    #[test]
    fn test_fold_rows_rejects_unknown_id() {
        let err = fold_rows(&[row(999, LearnMethod::LevelUp, 1)], &catalog()).unwrap_err();
        assert_eq!(err, ValidationError::UnknownCatalogMoveId(999));
    }
}
