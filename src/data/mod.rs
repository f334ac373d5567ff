pub mod json;
pub mod layouts;
pub mod runes;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use layouts::{CellState, GridLayout, LayoutCell};
pub use runes::{RuneDefinition, ShapeCell};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CharacterClass {
    Ares,
    Merci,
    Chan,
}

impl Default for CharacterClass {
    fn default() -> Self {
        CharacterClass::Ares
    }
}

pub const CLASSES: [CharacterClass; 3] = [
    CharacterClass::Ares,
    CharacterClass::Merci,
    CharacterClass::Chan,
];

impl CharacterClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterClass::Ares => "Ares",
            CharacterClass::Merci => "Merci",
            CharacterClass::Chan => "Chan",
        }
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CLASSES
            .iter()
            .copied()
            .find(|class| class.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown class '{s}'"))
    }
}

/// Catalog id of a rune. Zero never names a rune.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuneId(pub u8);

impl RuneId {
    pub const NONE: RuneId = RuneId(0);

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for RuneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatKind {
    #[serde(rename = "HP")]
    Hp,
    #[serde(rename = "ATK")]
    Atk,
    #[serde(rename = "DEF")]
    Def,
    #[serde(rename = "AGL")]
    Agl,
    #[serde(rename = "ATS")]
    Ats,
}

pub const STAT_KINDS: [StatKind; 5] = [
    StatKind::Hp,
    StatKind::Atk,
    StatKind::Def,
    StatKind::Agl,
    StatKind::Ats,
];

impl StatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Hp => "HP",
            StatKind::Atk => "ATK",
            StatKind::Def => "DEF",
            StatKind::Agl => "AGL",
            StatKind::Ats => "ATS",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatEffect {
    pub stat: StatKind,
    pub value: f32,
}

impl StatEffect {
    pub const fn new(stat: StatKind, value: f32) -> Self {
        Self { stat, value }
    }
}

/// Read-only source of rune definitions.
pub trait RuneCatalog {
    fn rune(&self, id: RuneId) -> Option<RuneDefinition>;

    /// Every id the catalog can resolve, used for cache warm-up.
    fn rune_ids(&self) -> Vec<RuneId>;
}

/// Read-only source of per-class grid layouts.
pub trait LayoutCatalog {
    fn layout(&self, class: CharacterClass) -> Option<GridLayout>;

    fn classes(&self) -> Vec<CharacterClass>;
}

/// Demo catalogs compiled into the crate.
#[derive(Clone, Debug, Default)]
pub struct BuiltinCatalog;

impl RuneCatalog for BuiltinCatalog {
    fn rune(&self, id: RuneId) -> Option<RuneDefinition> {
        runes::builtin_runes().into_iter().find(|rune| rune.id == id)
    }

    fn rune_ids(&self) -> Vec<RuneId> {
        runes::builtin_runes().iter().map(|rune| rune.id).collect()
    }
}

impl LayoutCatalog for BuiltinCatalog {
    fn layout(&self, class: CharacterClass) -> Option<GridLayout> {
        Some(layouts::builtin_layout(class))
    }

    fn classes(&self) -> Vec<CharacterClass> {
        CLASSES.to_vec()
    }
}

/// Serde representation of a grid point as `[x, y]`.
pub mod point_repr {
    use bracket_geometry::prelude::Point;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(point: &Point, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        [point.x, point.y].serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Point, D::Error>
    where
        D: Deserializer<'de>,
    {
        let [x, y] = <[i32; 2]>::deserialize(deserializer)?;
        Ok(Point::new(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn class_names_parse_case_insensitively() {
        assert_eq!("merci".parse::<CharacterClass>(), Ok(CharacterClass::Merci));
        assert_eq!(" CHAN ".parse::<CharacterClass>(), Ok(CharacterClass::Chan));
        assert!("paladin".parse::<CharacterClass>().is_err());
    }

    #[test]
    fn stat_kinds_use_short_names_on_the_wire() {
        let json = serde_json::to_string(&StatEffect::new(StatKind::Atk, 5.0)).unwrap();
        assert_eq!(json, r#"{"stat":"ATK","value":5.0}"#);
        let parsed: StatEffect = serde_json::from_str(r#"{"stat":"AGL","value":2}"#).unwrap();
        assert_eq!(parsed.stat, StatKind::Agl);
        assert!(serde_json::from_str::<StatEffect>(r#"{"stat":"MANA","value":2}"#).is_err());
    }

    #[test]
    fn builtin_catalog_resolves_every_listed_rune() {
        let catalog = BuiltinCatalog;
        let ids = catalog.rune_ids();
        assert_eq!(ids.len(), 8);
        for id in ids {
            assert_eq!(catalog.rune(id).map(|rune| rune.id), Some(id));
        }
        assert!(catalog.rune(RuneId::NONE).is_none());
    }
}
