//! Apply a change batch file to one creature.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use moveset_core::{CreatureId, Moveset, RawChangeRequest};
use moveset_runtime::{EditError, RuntimeConfig};

use crate::context::{detached_session, open_session};

/// Apply a JSON change batch to a creature's moveset
#[derive(Debug, Parser)]
pub struct Apply {
    /// Creature id (`pokemon_movesets.pokemon`)
    #[arg(short, long, value_name = "ID")]
    creature: i64,

    /// JSON array of `{operation, move, level, secondaryMove}` requests
    #[arg(short, long, value_name = "FILE")]
    batch: PathBuf,

    /// JSON object mapping move names to ids
    #[arg(short, long, value_name = "FILE")]
    moves: Option<PathBuf>,

    /// Edit this JSON moveset in memory instead of the stored one
    #[arg(long, value_name = "FILE")]
    moveset: Option<PathBuf>,
}

impl Apply {
    pub async fn execute(self, config: RuntimeConfig) -> Result<()> {
        let json = std::fs::read_to_string(&self.batch)
            .with_context(|| format!("failed to read batch {}", self.batch.display()))?;
        let requests: Vec<RawChangeRequest> = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse batch {}", self.batch.display()))?;

        let creature = CreatureId(self.creature);

        // A moveset file is edited detached; storage is never opened.
        let (session, mut moveset) = match &self.moveset {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read moveset {}", path.display()))?;
                let moveset = serde_json::from_str::<Moveset>(&json)
                    .with_context(|| format!("failed to parse moveset {}", path.display()))?;
                (detached_session(&config), moveset)
            }
            None => {
                let session = open_session(&config, self.moves.as_deref()).await?;
                let moveset = session.load_moveset(creature).await?;
                (session, moveset)
            }
        };

        match session.apply_raw_batch(creature, &mut moveset, requests).await {
            Ok(report) => {
                tracing::info!(
                    %creature,
                    groups = report.committed.len(),
                    statements = report.statements,
                    "batch applied"
                );
            }
            Err(err @ EditError::Storage { .. }) => {
                // Show what did commit before reporting the failure.
                println!("{}", serde_json::to_string_pretty(&moveset)?);
                return Err(err).context("batch was partially applied; re-read the stored moveset");
            }
            Err(err) => return Err(err.into()),
        }

        println!("{}", serde_json::to_string_pretty(&moveset)?);
        Ok(())
    }
}
