//! File-based creature record repository partitioned by shard.
//!
//! Records live in one JSON file per shard:
//! ```text
//! {base_dir}/shard_1.json
//! {base_dir}/shard_2.json
//! ...
//! {base_dir}/shard_10.json
//! ```
//!
//! Each file maps creature id to record. The shard of a record is
//! [`shard_for`] of its id.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use moveset_core::{Moveset, SHARD_COUNT, partition_by_shard, shard_for};
use serde::{Deserialize, Serialize};

use crate::repository::Result;

/// A creature entry as persisted in a shard file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatureRecord {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub moves: Moveset,
}

impl CreatureRecord {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            types: Vec::new(),
            moves: Moveset::new(),
        }
    }
}

type Shard = BTreeMap<u32, CreatureRecord>;

/// Creature records split across `shard_{n}.json` files.
pub struct FileShardRepository {
    base_dir: PathBuf,
}

impl FileShardRepository {
    /// Create a repository rooted at `base_dir`, creating the directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Path of shard `shard`'s file.
    pub fn shard_path(&self, shard: u8) -> PathBuf {
        self.base_dir.join(format!("shard_{}.json", shard))
    }

    /// Every record in `shard`; empty when the file does not exist yet.
    pub fn load_shard(&self, shard: u8) -> Result<Shard> {
        let path = self.shard_path(shard);
        if !path.exists() {
            return Ok(Shard::new());
        }

        let json = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&json)?)
    }

    fn save_shard(&self, shard: u8, records: &Shard) -> Result<()> {
        let path = self.shard_path(shard);
        let temp_path = path.with_extension("json.tmp");

        fs::write(&temp_path, serde_json::to_string_pretty(records)?)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(shard, records = records.len(), "saved {}", path.display());
        Ok(())
    }

    /// Insert or replace `record` in its shard. Returns the shard written.
    pub fn save(&self, record: &CreatureRecord) -> Result<u8> {
        let shard = shard_for(record.id);
        let mut records = self.load_shard(shard)?;
        records.insert(record.id, record.clone());
        self.save_shard(shard, &records)?;
        Ok(shard)
    }

    /// Write many records, touching each affected shard file once.
    pub fn save_all<'a>(&self, records: impl IntoIterator<Item = &'a CreatureRecord>) -> Result<()> {
        let by_id: BTreeMap<u32, &CreatureRecord> =
            records.into_iter().map(|record| (record.id, record)).collect();

        for (shard, ids) in partition_by_shard(by_id.keys().copied()) {
            let mut existing = self.load_shard(shard)?;
            for id in ids {
                if let Some(record) = by_id.get(&id) {
                    existing.insert(id, (*record).clone());
                }
            }
            self.save_shard(shard, &existing)?;
        }
        Ok(())
    }

    pub fn load(&self, id: u32) -> Result<Option<CreatureRecord>> {
        let mut records = self.load_shard(shard_for(id))?;
        Ok(records.remove(&id))
    }

    /// All records across every shard, ordered by id.
    pub fn load_all(&self) -> Result<Vec<CreatureRecord>> {
        let mut merged = Shard::new();
        for shard in 1..=SHARD_COUNT {
            merged.extend(self.load_shard(shard)?);
        }
        Ok(merged.into_values().collect())
    }
}
