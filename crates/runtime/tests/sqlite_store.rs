//! Batches persisted to SQLite and read back.
#![cfg(feature = "sqlite")]

use moveset_core::{
    ChangeRequest, CreatureId, LearnMethods, MoveId, MoveLearnRecord, OperationGroup,
};
use moveset_runtime::{EditError, EditSession, MoveCatalog, SqliteStore};
use tempfile::TempDir;

const EEVEE: CreatureId = CreatureId(133);

fn moves() -> MoveCatalog {
    [
        ("tackle", 33),
        ("tail-whip", 39),
        ("sand-attack", 28),
        ("quick-attack", 98),
        ("bite", 44),
        ("swift", 129),
    ]
    .into_iter()
    .map(|(name, id)| (name.to_string(), MoveId(id)))
    .collect()
}

async fn session(store: SqliteStore) -> EditSession<SqliteStore> {
    store.register_moves(&moves()).await.unwrap();
    let catalog = store.load_move_catalog().await.unwrap();
    EditSession::builder(store).moves(catalog).build()
}

#[tokio::test]
async fn test_every_operation_round_trips() {
    let session = session(SqliteStore::in_memory().await.unwrap()).await;
    let mut moveset = session.load_moveset(EEVEE).await.unwrap();

    session
        .apply_batch(
            EEVEE,
            &mut moveset,
            vec![
                ChangeRequest::add("tackle", 1),
                ChangeRequest::add("tail-whip", 1),
                ChangeRequest::add("sand-attack", 5),
                ChangeRequest::add("quick-attack", 10),
            ],
        )
        .await
        .unwrap();

    let report = session
        .apply_batch(
            EEVEE,
            &mut moveset,
            vec![
                ChangeRequest::delete("tail-whip"),
                ChangeRequest::swap_moves("swift", "sand-attack"),
                ChangeRequest::replace_by_level(10, "bite"),
                ChangeRequest::replace_move("tackle", "swift"),
                ChangeRequest::shift("sand-attack", 6),
            ],
        )
        .await
        .unwrap();

    assert_eq!(
        report.committed,
        vec![
            OperationGroup::AddShift,
            OperationGroup::ReplaceMove,
            OperationGroup::ReplaceByLevel,
            OperationGroup::SwapMoves,
            OperationGroup::Delete,
        ]
    );

    let reloaded = session.load_moveset(EEVEE).await.unwrap();
    assert_eq!(reloaded.len(), moveset.len());
    for entry in &moveset {
        assert_eq!(reloaded.get(&entry.name), Some(&entry.record), "{}", entry.name);
    }
    assert_eq!(reloaded.get("swift"), Some(&MoveLearnRecord::level_up(6)));
    assert_eq!(reloaded.get("sand-attack"), Some(&MoveLearnRecord::level_up(1)));
    assert_eq!(reloaded.get("bite"), Some(&MoveLearnRecord::level_up(10)));
    assert!(!reloaded.contains("tail-whip"));
    assert!(!reloaded.contains("tackle"));
    assert!(!reloaded.contains("quick-attack"));
}

#[tokio::test]
async fn test_mixed_add_and_shift_round_trip() {
    let session = session(SqliteStore::in_memory().await.unwrap()).await;
    let mut moveset = session.load_moveset(EEVEE).await.unwrap();

    session
        .apply_batch(
            EEVEE,
            &mut moveset,
            vec![
                ChangeRequest::add("bite", 1),
                ChangeRequest::shift("bite", 5),
                ChangeRequest::add("bite", 3),
                ChangeRequest::shift("bite", 12),
            ],
        )
        .await
        .unwrap();

    assert_eq!(moveset.get("bite"), Some(&MoveLearnRecord::level_up(12)));
    assert_eq!(session.load_moveset(EEVEE).await.unwrap(), moveset);
}

#[tokio::test]
async fn test_persists_across_connections() {
    let temp_dir = TempDir::new().unwrap();
    let url = format!("sqlite://{}", temp_dir.path().join("movesets.db").display());

    {
        let session = session(SqliteStore::connect(&url).await.unwrap()).await;
        let mut moveset = session.load_moveset(EEVEE).await.unwrap();
        session
            .apply_batch(EEVEE, &mut moveset, vec![ChangeRequest::add("bite", 15)])
            .await
            .unwrap();
    }

    let store = SqliteStore::connect(&url).await.unwrap();
    let catalog = store.load_move_catalog().await.unwrap();
    let session = EditSession::builder(store).moves(catalog).build();

    let moveset = session.load_moveset(EEVEE).await.unwrap();
    assert_eq!(moveset.get("bite"), Some(&MoveLearnRecord::level_up(15)));
}

#[tokio::test]
async fn test_machine_rows_survive_lineage() {
    let session = session(SqliteStore::in_memory().await.unwrap()).await;
    let mut moveset = session.load_moveset(EEVEE).await.unwrap();

    // A machine-only move, then re-added through level-up.
    moveset.insert("swift", MoveLearnRecord::new(1, LearnMethods::MACHINE));
    session
        .apply_batch(EEVEE, &mut moveset, vec![ChangeRequest::add("swift", 20)])
        .await
        .unwrap();

    let expected = MoveLearnRecord::new(20, LearnMethods::LEVEL_UP | LearnMethods::MACHINE);
    assert_eq!(moveset.get("swift"), Some(&expected));
    assert_eq!(
        session.load_moveset(EEVEE).await.unwrap().get("swift"),
        Some(&expected)
    );
}

#[tokio::test]
async fn test_unknown_move_rejected_before_sql() {
    let session = session(SqliteStore::in_memory().await.unwrap()).await;
    let mut moveset = session.load_moveset(EEVEE).await.unwrap();

    let err = session
        .apply_batch(EEVEE, &mut moveset, vec![ChangeRequest::shift("tackle", 3)])
        .await
        .unwrap_err();

    assert!(matches!(err, EditError::Validation(_)));
    assert!(session.load_moveset(EEVEE).await.unwrap().is_empty());
}
