use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    board::PlacedRune,
    data::{CharacterClass, RuneId},
    error::StoreError,
};

pub const PRESET_COUNT: u8 = 3;

/// Three saved boards for one class plus the one used last (1-based).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArcaneBoardPresets {
    pub presets: [Vec<PlacedRune>; PRESET_COUNT as usize],
    pub last_used_preset_index: u8,
}

impl ArcaneBoardPresets {
    pub fn preset(&self, index: u8) -> Option<&Vec<PlacedRune>> {
        preset_slot(index).map(|slot| &self.presets[slot])
    }

    pub fn preset_mut(&mut self, index: u8) -> Option<&mut Vec<PlacedRune>> {
        preset_slot(index).map(move |slot| &mut self.presets[slot])
    }
}

fn preset_slot(index: u8) -> Option<usize> {
    (1..=PRESET_COUNT)
        .contains(&index)
        .then(|| usize::from(index - 1))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    #[serde(default)]
    pub saved_runes_by_class: BTreeMap<CharacterClass, ArcaneBoardPresets>,
    #[serde(default)]
    pub owned_rune_ids: BTreeSet<RuneId>,
    pub saved_at: DateTime<Utc>,
}

impl SaveGame {
    pub fn new() -> Self {
        Self {
            saved_runes_by_class: BTreeMap::new(),
            owned_rune_ids: BTreeSet::new(),
            saved_at: Utc::now(),
        }
    }

    pub fn decode(slot: &str, raw: &str) -> Result<Self, StoreError> {
        serde_json::from_str(raw).map_err(|source| StoreError::Json {
            slot: slot.to_string(),
            source,
        })
    }

    pub fn encode(&self, slot: &str) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|source| StoreError::Json {
            slot: slot.to_string(),
            source,
        })
    }
}

impl Default for SaveGame {
    fn default() -> Self {
        Self::new()
    }
}

/// Key-value persistence boundary. Values are opaque serialized save games.
pub trait SaveStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StoreError>;

    fn write(&mut self, slot: &str, contents: &str) -> Result<(), StoreError>;

    fn exists(&self, slot: &str) -> bool {
        matches!(self.read(slot), Ok(Some(_)))
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slots: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StoreError> {
        Ok(self.slots.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, contents: &str) -> Result<(), StoreError> {
        self.slots.insert(slot.to_string(), contents.to_string());
        Ok(())
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }
}

/// One `<slot>.json` file per slot inside `root`.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{slot}.json"))
    }
}

impl SaveStore for FileStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StoreError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| StoreError::Io {
                slot: slot.to_string(),
                source,
            })
    }

    fn write(&mut self, slot: &str, contents: &str) -> Result<(), StoreError> {
        let io_err = |source: std::io::Error| StoreError::Io {
            slot: slot.to_string(),
            source,
        };
        fs::create_dir_all(&self.root).map_err(io_err)?;
        let path = self.slot_path(slot);
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, contents).map_err(io_err)?;
        fs::rename(&staging, &path).map_err(io_err)?;
        debug!("Wrote save slot '{}' to {}", slot, path.display());
        Ok(())
    }

    fn exists(&self, slot: &str) -> bool {
        self.slot_path(slot).exists()
    }
}
