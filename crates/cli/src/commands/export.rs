//! Export a stored moveset into the sharded creature files.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use moveset_core::CreatureId;
use moveset_runtime::{CreatureRecord, FileShardRepository, RuntimeConfig};

use crate::context::open_session;

/// Write a creature's moveset into its shard file
#[derive(Debug, Parser)]
pub struct Export {
    #[arg(short, long, value_name = "ID")]
    creature: u32,

    /// Creature name stored alongside the moveset
    #[arg(short, long)]
    name: String,

    /// Creature types, e.g. `--types grass --types poison`
    #[arg(short, long)]
    types: Vec<String>,

    /// JSON object mapping move names to ids
    #[arg(short, long, value_name = "FILE")]
    moves: Option<PathBuf>,

    /// Shard directory (defaults to MOVESET_SHARD_DIR)
    #[arg(short, long, value_name = "DIR")]
    shard_dir: Option<PathBuf>,
}

impl Export {
    pub async fn execute(self, config: RuntimeConfig) -> Result<()> {
        let shard_dir = self
            .shard_dir
            .clone()
            .or_else(|| config.shard_dir.clone())
            .context("no shard directory: pass --shard-dir or set MOVESET_SHARD_DIR")?;

        let session = open_session(&config, self.moves.as_deref()).await?;
        let moves = session
            .load_moveset(CreatureId(i64::from(self.creature)))
            .await?;

        let repo = FileShardRepository::new(&shard_dir)
            .with_context(|| format!("failed to open shard dir {}", shard_dir.display()))?;
        let record = CreatureRecord {
            id: self.creature,
            name: self.name,
            types: self.types,
            moves,
        };
        let shard = repo.save(&record)?;

        println!("{}", repo.shard_path(shard).display());
        Ok(())
    }
}
