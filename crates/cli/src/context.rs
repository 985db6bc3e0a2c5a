//! Session construction shared by the subcommands.
use std::path::Path;

use anyhow::{Context, Result};
use moveset_runtime::{
    DetachedStore, EditSession, MemoryStore, MoveCatalog, MovesetStore, RuntimeConfig,
    SqliteStore,
};

pub type CliSession = EditSession<Box<dyn MovesetStore>>;

/// Read a `{ "move-name": id }` catalog file.
pub fn read_move_catalog(path: &Path) -> Result<MoveCatalog> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read move catalog {}", path.display()))?;
    MoveCatalog::from_json(&json)
        .with_context(|| format!("failed to parse move catalog {}", path.display()))
}

/// Open the configured store and build a session over it.
///
/// With a database the `moves` table is the catalog; a catalog file given
/// on the command line is registered into it first. Without a database the
/// session edits an in-memory store that lives for this process only.
pub async fn open_session(config: &RuntimeConfig, moves: Option<&Path>) -> Result<CliSession> {
    let seed = moves.map(read_move_catalog).transpose()?;

    let (store, catalog): (Box<dyn MovesetStore>, MoveCatalog) = match &config.database_url {
        Some(url) => {
            let store = SqliteStore::connect(url)
                .await
                .with_context(|| format!("failed to open database {}", url))?;
            if let Some(seed) = &seed {
                store
                    .register_moves(seed)
                    .await
                    .context("failed to register move catalog")?;
            }
            let catalog = store
                .load_move_catalog()
                .await
                .context("failed to load move catalog")?;
            (Box::new(store) as Box<dyn MovesetStore>, catalog)
        }
        None => {
            tracing::warn!("MOVESET_DATABASE_URL not set; edits are not persisted");
            (
                Box::new(MemoryStore::new()) as Box<dyn MovesetStore>,
                seed.unwrap_or_default(),
            )
        }
    };

    tracing::debug!(moves = catalog.len(), atomicity = %config.atomicity, "session ready");

    Ok(EditSession::builder(store)
        .moves(catalog)
        .config(config.clone())
        .build())
}

/// Build a session that edits in memory only and never touches storage.
pub fn detached_session(config: &RuntimeConfig) -> CliSession {
    EditSession::builder(Box::new(DetachedStore) as Box<dyn MovesetStore>)
        .config(config.clone())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use moveset_core::{ChangeRequest, CreatureId, MoveLearnRecord, Moveset};

    #[tokio::test]
    async fn test_detached_session_edits_without_catalog() {
        let session = detached_session(&RuntimeConfig::default());
        let mut moveset: Moveset = [("tackle".to_string(), MoveLearnRecord::level_up(1))]
            .into_iter()
            .collect();

        let report = session
            .apply_batch(
                CreatureId(1),
                &mut moveset,
                vec![ChangeRequest::shift("tackle", 5), ChangeRequest::add("growl", 3)],
            )
            .await
            .unwrap();

        assert!(!session.store().is_persistent());
        assert_eq!(report.statements, 0);
        assert_eq!(moveset.get("tackle"), Some(&MoveLearnRecord::level_up(5)));
        assert!(moveset.contains("growl"));
    }
}
