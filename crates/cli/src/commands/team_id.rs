use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use moveset_core::TrainerRoster;
use moveset_runtime::{DetachedStore, EditSession, RuntimeConfig, SpeciesCatalog};

/// Generate an id for a new trainer team member
#[derive(Debug, Parser)]
pub struct TeamId {
    /// Trainer key in the roster
    #[arg(short, long)]
    trainer: String,

    /// Species of the new member
    #[arg(short, long)]
    species: String,

    /// JSON object mapping species names to ids
    #[arg(long, value_name = "FILE")]
    species_catalog: PathBuf,

    /// JSON roster: trainer key -> list of `{id, species}`
    #[arg(short, long, value_name = "FILE")]
    roster: Option<PathBuf>,
}

impl TeamId {
    pub fn execute(self, config: RuntimeConfig) -> Result<()> {
        let json = std::fs::read_to_string(&self.species_catalog).with_context(|| {
            format!("failed to read species catalog {}", self.species_catalog.display())
        })?;
        let species = SpeciesCatalog::from_json(&json).context("failed to parse species catalog")?;

        let roster = match &self.roster {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read roster {}", path.display()))?;
                Some(serde_json::from_str::<TrainerRoster>(&json).context("failed to parse roster")?)
            }
            None => None,
        };

        let session = EditSession::builder(DetachedStore)
            .species(species)
            .config(config)
            .build();
        let id = session.new_team_member_id(
            roster.as_ref(),
            &self.trainer,
            &self.species,
            &mut rand::thread_rng(),
        )?;

        println!("{}", id);
        Ok(())
    }
}
