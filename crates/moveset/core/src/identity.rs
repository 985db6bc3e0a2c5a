//! Identity and sharding helpers.
//!
//! Creature records are spread over ten shard files keyed by numeric id in
//! blocks of one hundred, with shard 10 absorbing everything above 900.
//! Trainer team members get a human-legible identifier built from the species
//! id, the current team size and a random four-digit suffix.

use std::collections::{BTreeMap, HashMap};

use rand::Rng;

use crate::error::{Result, ValidationError};

/// Number of creature shards.
pub const SHARD_COUNT: u8 = 10;

/// Round `id` up to the next multiple of 100 (exact multiples are kept).
///
/// Saturates at `u32::MAX` for ids in the last partial hundred.
pub const fn round_up_to_hundred(id: u32) -> u32 {
    id.div_ceil(100).saturating_mul(100)
}

/// Shard (1..=10) holding the creature with numeric `id`.
///
/// The rounded id's leading decimal digit picks the shard; anything rounding
/// past 900 lands in shard 10. Id 0 is clamped into shard 1.
pub fn shard_for(id: u32) -> u8 {
    let rounded = round_up_to_hundred(id);
    if rounded > 900 {
        return SHARD_COUNT;
    }
    // rounded is 0 or in 100..=900, so the leading digit is rounded / 100.
    ((rounded / 100) as u8).max(1)
}

/// Group ids by shard, keeping input order inside each shard.
pub fn partition_by_shard(ids: impl IntoIterator<Item = u32>) -> BTreeMap<u8, Vec<u32>> {
    let mut shards: BTreeMap<u8, Vec<u32>> = BTreeMap::new();
    for id in ids {
        shards.entry(shard_for(id)).or_default().push(id);
    }
    shards
}

/// Resolves species names to their numeric ids.
pub trait SpeciesResolver {
    fn species_id(&self, name: &str) -> Option<u32>;
}

/// One creature on a trainer's team.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamMember {
    pub id: String,
    pub species: String,
}

/// Team composition per trainer key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TrainerRoster {
    teams: HashMap<String, Vec<TeamMember>>,
}

impl TrainerRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Members of `trainer`'s team; empty if the trainer is unknown.
    pub fn team(&self, trainer: &str) -> &[TeamMember] {
        self.teams.get(trainer).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn add_member(&mut self, trainer: impl Into<String>, member: TeamMember) {
        self.teams.entry(trainer.into()).or_default().push(member);
    }
}

/// Lowest and highest random suffix.
const SUFFIX_RANGE: std::ops::RangeInclusive<u32> = 1000..=9999;

/// Build `{species_id}_{team_size}_{suffix}` for a new member of `trainer`'s team.
///
/// `team_size` counts the trainer's current members (zero when the roster or
/// the trainer is absent). A generated id that already exists on the team is
/// redrawn with a fresh suffix, up to `max_attempts` draws in total.
pub fn unique_team_member_id<R: Rng + ?Sized>(
    roster: Option<&TrainerRoster>,
    trainer: &str,
    species: &str,
    catalog: &dyn SpeciesResolver,
    rng: &mut R,
    max_attempts: usize,
) -> Result<String> {
    let species_id = catalog
        .species_id(species)
        .ok_or_else(|| ValidationError::UnknownSpecies(species.to_string()))?;
    let team = roster.map(|r| r.team(trainer)).unwrap_or(&[]);
    let attempts = max_attempts.max(1);

    for attempt in 1..=attempts {
        let suffix = rng.gen_range(SUFFIX_RANGE);
        let id = format!("{}_{}_{}", species_id, team.len(), suffix);
        if !team.iter().any(|member| member.id == id) {
            return Ok(id);
        }
        tracing::warn!(trainer, %id, attempt, "team member id collision, drawing a new suffix");
    }

    Err(ValidationError::IdentityCollision {
        trainer: trainer.to_string(),
        attempts,
    })
}
