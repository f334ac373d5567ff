pub mod store;

use std::collections::BTreeSet;

use chrono::Utc;
use log::{info, warn};

use crate::{
    board::{ArcaneBoard, BoardStats},
    data::{CharacterClass, RuneId},
    error::SessionError,
};

pub use self::store::{
    ArcaneBoardPresets, FileStore, MemoryStore, PRESET_COUNT, SaveGame, SaveStore,
};

pub const DEFAULT_SAVE_SLOT: &str = "ArcaneBoardSave";
pub const STARTER_RUNES: std::ops::RangeInclusive<u8> = 1..=8;

/// A player's board plus the presets and rune inventory persisted around it.
pub struct BoardSession {
    board: ArcaneBoard,
    store: Box<dyn SaveStore>,
    save_slot: String,
    owned_rune_ids: BTreeSet<RuneId>,
    current_preset_index: u8,
}

impl BoardSession {
    pub fn new<S>(board: ArcaneBoard, store: S, save_slot: &str) -> Self
    where
        S: SaveStore + 'static,
    {
        Self {
            board,
            store: Box::new(store),
            save_slot: save_slot.to_string(),
            owned_rune_ids: BTreeSet::new(),
            current_preset_index: 1,
        }
    }

    pub fn board(&self) -> &ArcaneBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut ArcaneBoard {
        &mut self.board
    }

    /// Activates `class` and restores its last used preset.
    pub fn initialize(&mut self, class: CharacterClass) -> Result<(), SessionError> {
        self.board.set_class(class)?;
        self.load_board_config(None)
    }

    /// Switches to `class` if it is not already active, loading its saved board.
    pub fn change_class(&mut self, class: CharacterClass) -> Result<(), SessionError> {
        if self.board.current_class() == Some(class) {
            return Ok(());
        }
        self.board.set_class(class)?;
        self.load_board_config(None)
    }

    /// Commits the board's stats and writes it into the current preset.
    pub fn apply_board_changes(&mut self) -> Result<BoardStats, SessionError> {
        let stats = self.board.apply_changes();
        self.save_board_config(None)?;
        Ok(stats)
    }

    fn active_class(&self) -> Result<CharacterClass, SessionError> {
        self.board
            .current_class()
            .ok_or(SessionError::NoActiveClass)
    }

    fn read_save(&self) -> Result<Option<SaveGame>, SessionError> {
        match self.store.read(&self.save_slot)? {
            Some(raw) => Ok(Some(SaveGame::decode(&self.save_slot, &raw)?)),
            None => Ok(None),
        }
    }

    /// Saves the placed runes into `preset` (or the current preset) and
    /// returns the preset index written.
    pub fn save_board_config(&mut self, preset: Option<u8>) -> Result<u8, SessionError> {
        let target = preset.unwrap_or(self.current_preset_index);
        if !(1..=PRESET_COUNT).contains(&target) {
            return Err(SessionError::InvalidPreset(target));
        }
        let class = self.active_class()?;

        let mut save = self.read_save()?.unwrap_or_default();
        let presets = save.saved_runes_by_class.entry(class).or_default();
        if let Some(slot) = presets.preset_mut(target) {
            *slot = self.board.placed_runes().to_vec();
        }
        presets.last_used_preset_index = target;
        save.owned_rune_ids = self.owned_rune_ids.clone();
        save.saved_at = Utc::now();

        let raw = save.encode(&self.save_slot)?;
        self.store.write(&self.save_slot, &raw)?;
        self.current_preset_index = target;
        self.board.mark_saved();
        info!(
            "Saved {} board to preset {} ({} runes)",
            class,
            target,
            self.board.placed_runes().len()
        );
        Ok(target)
    }

    /// Loads `preset` (or the class's last used preset) onto the board.
    pub fn load_board_config(&mut self, preset: Option<u8>) -> Result<(), SessionError> {
        let class = self.active_class()?;

        let Some(save) = self.read_save()? else {
            info!("No save in slot '{}'", self.save_slot);
            self.current_preset_index = 1;
            return Ok(());
        };
        self.load_rune_inventory(&save);

        let Some(presets) = save.saved_runes_by_class.get(&class) else {
            info!("No presets saved for {class}");
            self.current_preset_index = 1;
            self.board.load_saved_data(class, &[])?;
            return Ok(());
        };

        let target = target_preset_index(preset, presets);
        let runes = presets
            .preset(target)
            .ok_or(SessionError::InvalidPreset(target))?;
        self.current_preset_index = target;
        self.board.load_saved_data(class, runes)?;
        self.board.mark_saved();
        info!(
            "Loaded {} preset {} ({} runes)",
            class,
            target,
            runes.len()
        );
        Ok(())
    }

    /// True when the preset index is out of range or nothing is saved there
    /// for the active class.
    pub fn is_preset_empty(&self, index: u8) -> bool {
        let Ok(class) = self.active_class() else {
            return true;
        };
        let save = match self.read_save() {
            Ok(Some(save)) => save,
            Ok(None) => return true,
            Err(err) => {
                warn!("Could not inspect save slot '{}': {err}", self.save_slot);
                return true;
            }
        };
        save.saved_runes_by_class
            .get(&class)
            .and_then(|presets| presets.preset(index))
            .is_none_or(|runes| runes.is_empty())
    }

    pub fn current_preset_index(&self) -> u8 {
        self.current_preset_index
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.board.has_unsaved_changes()
    }

    pub fn owned_runes(&self) -> Vec<RuneId> {
        self.owned_rune_ids.iter().copied().collect()
    }

    pub fn owns_rune(&self, rune_id: RuneId) -> bool {
        self.owned_rune_ids.contains(&rune_id)
    }

    /// Grants a rune and persists the inventory. Id 0 is ignored.
    pub fn add_rune_to_inventory(&mut self, rune_id: RuneId) -> Result<bool, SessionError> {
        if rune_id.is_none() {
            return Ok(false);
        }
        self.owned_rune_ids.insert(rune_id);
        info!(
            "Acquired rune {} ({} owned)",
            rune_id,
            self.owned_rune_ids.len()
        );
        self.save_board_config(None)?;
        Ok(true)
    }

    pub fn initialize_starter_runes(&mut self) {
        self.owned_rune_ids = STARTER_RUNES.map(RuneId).collect();
    }

    fn load_rune_inventory(&mut self, save: &SaveGame) {
        if save.owned_rune_ids.is_empty() {
            self.initialize_starter_runes();
        } else {
            self.owned_rune_ids = save.owned_rune_ids.clone();
        }
    }
}

fn target_preset_index(requested: Option<u8>, presets: &ArcaneBoardPresets) -> u8 {
    match requested {
        Some(index) => index,
        None if (1..=PRESET_COUNT).contains(&presets.last_used_preset_index) => {
            presets.last_used_preset_index
        }
        None => 1,
    }
}
