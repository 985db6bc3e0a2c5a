//! Bidirectional move name <-> storage id map.
use std::collections::{BTreeMap, HashMap};

use moveset_core::{MoveId, MoveResolver};

/// Move names and their `moves.id` values.
#[derive(Clone, Debug, Default)]
pub struct MoveCatalog {
    ids: HashMap<String, MoveId>,
    names: HashMap<MoveId, String>,
}

impl MoveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object mapping move names to ids.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let entries: BTreeMap<String, i64> = serde_json::from_str(json)?;
        Ok(entries
            .into_iter()
            .map(|(name, id)| (name, MoveId(id)))
            .collect())
    }

    /// Register `name` as `id`, replacing any earlier mapping of either side.
    pub fn insert(&mut self, name: impl Into<String>, id: MoveId) {
        let name = name.into();
        if let Some(old_id) = self.ids.insert(name.clone(), id) {
            self.names.remove(&old_id);
        }
        if let Some(old_name) = self.names.insert(id, name) {
            if self.ids.get(&old_name) == Some(&id) {
                self.ids.remove(&old_name);
            }
        }
    }

    pub fn id_of(&self, name: &str) -> Option<MoveId> {
        self.ids.get(name).copied()
    }

    pub fn name_of(&self, id: MoveId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Entries ordered by id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MoveId)> {
        let mut entries: Vec<_> = self
            .names
            .iter()
            .map(|(id, name)| (name.as_str(), *id))
            .collect();
        entries.sort_by_key(|(_, id)| *id);
        entries.into_iter()
    }
}

impl FromIterator<(String, MoveId)> for MoveCatalog {
    fn from_iter<T: IntoIterator<Item = (String, MoveId)>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for (name, id) in iter {
            catalog.insert(name, id);
        }
        catalog
    }
}

impl MoveResolver for MoveCatalog {
    fn move_id(&self, name: &str) -> Option<MoveId> {
        self.id_of(name)
    }

    fn move_name(&self, id: MoveId) -> Option<&str> {
        self.name_of(id)
    }
}
