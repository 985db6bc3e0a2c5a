//! Species name -> numeric id map.
use std::collections::{BTreeMap, HashMap};

use moveset_core::SpeciesResolver;

#[derive(Clone, Debug, Default)]
pub struct SpeciesCatalog {
    ids: HashMap<String, u32>,
}

impl SpeciesCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping species names to ids.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: BTreeMap<String, u32> = serde_json::from_str(json)?;
        Ok(entries.into_iter().collect())
    }

    pub fn insert(&mut self, name: impl Into<String>, id: u32) {
        self.ids.insert(name.into(), id);
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl FromIterator<(String, u32)> for SpeciesCatalog {
    fn from_iter<T: IntoIterator<Item = (String, u32)>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl SpeciesResolver for SpeciesCatalog {
    fn species_id(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }
}
