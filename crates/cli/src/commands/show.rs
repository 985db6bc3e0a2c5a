use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use moveset_core::CreatureId;
use moveset_runtime::RuntimeConfig;

use crate::context::open_session;

/// Print a creature's stored moveset
#[derive(Debug, Parser)]
pub struct Show {
    #[arg(short, long, value_name = "ID")]
    creature: i64,

    /// JSON object mapping move names to ids
    #[arg(short, long, value_name = "FILE")]
    moves: Option<PathBuf>,
}

impl Show {
    pub async fn execute(self, config: RuntimeConfig) -> Result<()> {
        let session = open_session(&config, self.moves.as_deref()).await?;
        let moveset = session.load_moveset(CreatureId(self.creature)).await?;
        println!("{}", serde_json::to_string_pretty(&moveset)?);
        Ok(())
    }
}
