//! Moveset types: learn methods, learn records and the ordered moveset itself.

use bitflags::bitflags;
use strum::IntoEnumIterator;

/// One way a creature can acquire a move.
///
/// The string form (`level-up`, `machine`, `tutor`, `egg`) is what the
/// `pokemon_movesets.learn_method` column stores.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[strum(serialize_all = "kebab-case")]
pub enum LearnMethod {
    LevelUp,
    Machine,
    Tutor,
    Egg,
}

impl LearnMethod {
    const fn flag(self) -> LearnMethods {
        match self {
            Self::LevelUp => LearnMethods::LEVEL_UP,
            Self::Machine => LearnMethods::MACHINE,
            Self::Tutor => LearnMethods::TUTOR,
            Self::Egg => LearnMethods::EGG,
        }
    }
}

bitflags! {
    /// Ordered set of [`LearnMethod`]s attached to one learned move.
    ///
    /// Iteration via [`LearnMethods::methods`] always yields the canonical
    /// order level-up, machine, tutor, egg.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct LearnMethods: u8 {
        const LEVEL_UP = 1 << 0;
        const MACHINE  = 1 << 1;
        const TUTOR    = 1 << 2;
        const EGG      = 1 << 3;
    }
}

impl LearnMethods {
    /// Method set written by every level-up-family operation.
    ///
    /// Level-up is always present; machine survives only if the record being
    /// superseded already carried it. Tutor and egg are dropped.
    pub fn level_up_lineage(superseded: LearnMethods) -> LearnMethods {
        if superseded.contains(Self::MACHINE) {
            Self::LEVEL_UP | Self::MACHINE
        } else {
            Self::LEVEL_UP
        }
    }

    pub fn methods(self) -> impl Iterator<Item = LearnMethod> {
        LearnMethod::iter().filter(move |method| self.contains(method.flag()))
    }

    pub fn has(self, method: LearnMethod) -> bool {
        self.contains(method.flag())
    }
}

impl From<LearnMethod> for LearnMethods {
    fn from(method: LearnMethod) -> Self {
        method.flag()
    }
}

impl FromIterator<LearnMethod> for LearnMethods {
    fn from_iter<T: IntoIterator<Item = LearnMethod>>(iter: T) -> Self {
        iter.into_iter()
            .fold(LearnMethods::empty(), |set, method| set | method.flag())
    }
}

// Serialized as a list of method names so shard files and CLI output stay readable.
#[cfg(feature = "serde")]
impl serde::Serialize for LearnMethods {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.methods())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for LearnMethods {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let methods = <Vec<LearnMethod> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(methods.into_iter().collect())
    }
}

/// How and when one move is learned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveLearnRecord {
    pub level_learned: u32,
    pub learn_method: LearnMethods,
}

impl MoveLearnRecord {
    pub const fn new(level_learned: u32, learn_method: LearnMethods) -> Self {
        Self {
            level_learned,
            learn_method,
        }
    }

    /// A plain level-up record.
    pub const fn level_up(level_learned: u32) -> Self {
        Self::new(level_learned, LearnMethods::LEVEL_UP)
    }
}

/// One keyed entry of a [`Moveset`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveEntry {
    #[cfg_attr(feature = "serde", serde(rename = "move"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub record: MoveLearnRecord,
}

/// Mapping from move name to its learn record, in display order.
///
/// Keys are unique. Overwriting an existing key keeps its position; new keys
/// are appended. Movesets are small (tens of entries) so lookups are linear.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Moveset {
    entries: Vec<MoveEntry>,
}

impl Moveset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveEntry> {
        self.entries.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&MoveLearnRecord> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.record)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name == name)
    }

    /// First entry, in display order, learned at `level`.
    pub fn first_at_level(&self, level: u32) -> Option<&MoveEntry> {
        self.entries
            .iter()
            .find(|entry| entry.record.level_learned == level)
    }

    /// Insert or overwrite; returns the previous record for `name`.
    pub fn insert(&mut self, name: impl Into<String>, record: MoveLearnRecord) -> Option<MoveLearnRecord> {
        let name = name.into();
        match self.position(&name) {
            Some(index) => Some(std::mem::replace(&mut self.entries[index].record, record)),
            None => {
                self.entries.push(MoveEntry { name, record });
                None
            }
        }
    }

    /// Insert a new key at `index`, clamped to the current length.
    pub(crate) fn insert_at(&mut self, index: usize, name: String, record: MoveLearnRecord) {
        let index = index.min(self.entries.len());
        self.entries.insert(index, MoveEntry { name, record });
    }

    /// Remove `name`, preserving the order of the remaining entries.
    pub fn remove(&mut self, name: &str) -> Option<MoveLearnRecord> {
        let index = self.position(name)?;
        Some(self.entries.remove(index).record)
    }

    pub(crate) fn entry_mut(&mut self, index: usize) -> &mut MoveEntry {
        &mut self.entries[index]
    }
}

impl FromIterator<(String, MoveLearnRecord)> for Moveset {
    fn from_iter<T: IntoIterator<Item = (String, MoveLearnRecord)>>(iter: T) -> Self {
        let mut moveset = Moveset::new();
        for (name, record) in iter {
            moveset.insert(name, record);
        }
        moveset
    }
}

impl<'a> IntoIterator for &'a Moveset {
    type Item = &'a MoveEntry;
    type IntoIter = std::slice::Iter<'a, MoveEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lineage_keeps_machine_only() {
        let superseded = LearnMethods::MACHINE | LearnMethods::TUTOR | LearnMethods::EGG;
        assert_eq!(
            LearnMethods::level_up_lineage(superseded),
            LearnMethods::LEVEL_UP | LearnMethods::MACHINE
        );
        assert_eq!(
            LearnMethods::level_up_lineage(LearnMethods::EGG),
            LearnMethods::LEVEL_UP
        );
        assert_eq!(
            LearnMethods::level_up_lineage(LearnMethods::empty()),
            LearnMethods::LEVEL_UP
        );
    }

    #[test]
    fn test_methods_iterate_in_canonical_order() {
        let set: LearnMethods = [LearnMethod::Egg, LearnMethod::LevelUp, LearnMethod::Machine]
            .into_iter()
            .collect();
        let methods: Vec<_> = set.methods().collect();
        assert_eq!(
            methods,
            vec![LearnMethod::LevelUp, LearnMethod::Machine, LearnMethod::Egg]
        );
    }

    #[test]
    fn test_learn_method_strings_match_storage() {
        assert_eq!(<&'static str>::from(LearnMethod::LevelUp), "level-up");
        assert_eq!(LearnMethod::LevelUp.to_string(), "level-up");
        assert_eq!("machine".parse::<LearnMethod>(), Ok(LearnMethod::Machine));
        assert!("hm".parse::<LearnMethod>().is_err());
    }

    #[test]
    fn test_overwrite_keeps_position() {
        let mut moveset: Moveset = [
            ("tackle".to_string(), MoveLearnRecord::level_up(1)),
            ("growl".to_string(), MoveLearnRecord::level_up(3)),
        ]
        .into_iter()
        .collect();

        let previous = moveset.insert("tackle", MoveLearnRecord::level_up(9));
        assert_eq!(previous, Some(MoveLearnRecord::level_up(1)));
        assert_eq!(moveset.position("tackle"), Some(0));
        assert_eq!(moveset.get("tackle").map(|r| r.level_learned), Some(9));
    }

    #[test]
    fn test_first_at_level_uses_display_order() {
        let moveset: Moveset = [
            ("ember".to_string(), MoveLearnRecord::level_up(7)),
            ("smokescreen".to_string(), MoveLearnRecord::level_up(7)),
        ]
        .into_iter()
        .collect();
        assert_eq!(moveset.first_at_level(7).map(|e| e.name.as_str()), Some("ember"));
        assert!(moveset.first_at_level(8).is_none());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_learn_methods_serialize_as_names() {
        let record = MoveLearnRecord::new(5, LearnMethods::LEVEL_UP | LearnMethods::MACHINE);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"level_learned":5,"learn_method":["level-up","machine"]}"#
        );
        let back: MoveLearnRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
