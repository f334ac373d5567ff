use std::{
    env, fs,
    path::{Path, PathBuf},
};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{data::CharacterClass, error::ConfigError, session::DEFAULT_SAVE_SLOT};

pub const ENV_DATA_DIR: &str = "ARCANE_BOARD_DATA_DIR";
pub const ENV_SAVE_DIR: &str = "ARCANE_BOARD_SAVE_DIR";
pub const ENV_SLOT: &str = "ARCANE_BOARD_SLOT";
pub const ENV_CLASS: &str = "ARCANE_BOARD_CLASS";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Directory holding `runes.json` and `layouts.json`. Built-in catalogs when unset.
    pub data_dir: Option<PathBuf>,
    pub save_dir: PathBuf,
    pub save_slot: String,
    pub default_class: CharacterClass,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            save_dir: PathBuf::from("saves"),
            save_slot: DEFAULT_SAVE_SLOT.to_string(),
            default_class: CharacterClass::Ares,
        }
    }
}

impl BoardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Overrides fields from `ARCANE_BOARD_*` environment variables.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(dir) = lookup(ENV_SAVE_DIR) {
            self.save_dir = PathBuf::from(dir);
        }
        if let Some(slot) = lookup(ENV_SLOT) {
            self.save_slot = slot;
        }
        if let Some(class) = lookup(ENV_CLASS) {
            match class.parse() {
                Ok(class) => self.default_class = class,
                Err(err) => warn!("Ignoring {ENV_CLASS}: {err}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: BoardConfig = serde_json::from_str(r#"{"save_slot": "Alt"}"#).unwrap();
        assert_eq!(config.save_slot, "Alt");
        assert_eq!(config.save_dir, PathBuf::from("saves"));
        assert_eq!(config.default_class, CharacterClass::Ares);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn overrides_replace_fields_and_ignore_bad_classes() {
        let vars: HashMap<&str, &str> = [
            (ENV_DATA_DIR, "data"),
            (ENV_SLOT, "Slot2"),
            (ENV_CLASS, "warlock"),
        ]
        .into_iter()
        .collect();
        let mut config = BoardConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|value| value.to_string()));
        assert_eq!(config.data_dir, Some(PathBuf::from("data")));
        assert_eq!(config.save_slot, "Slot2");
        assert_eq!(config.default_class, CharacterClass::Ares);

        config.apply_overrides(|key| (key == ENV_CLASS).then(|| "chan".to_string()));
        assert_eq!(config.default_class, CharacterClass::Chan);
    }

    #[test]
    fn unreadable_config_is_an_io_error() {
        let missing = env::temp_dir().join("arcane-board-missing-config.json");
        assert!(matches!(
            BoardConfig::from_file(&missing),
            Err(ConfigError::Io { .. })
        ));
    }
}
