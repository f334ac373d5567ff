use std::{collections::HashMap, fs, path::Path};

use bracket_geometry::prelude::Point;
use log::{debug, info};
use serde::Deserialize;

use super::{
    CharacterClass, GridLayout, LayoutCatalog, RuneCatalog, RuneDefinition, RuneId, ShapeCell,
    StatEffect, point_repr,
};
use crate::error::CatalogError;

pub const RUNES_FILE: &str = "runes.json";
pub const LAYOUTS_FILE: &str = "layouts.json";

#[derive(Deserialize)]
struct ShapeRecord {
    #[serde(with = "point_repr")]
    offset: Point,
    #[serde(default)]
    fragment: Option<String>,
    #[serde(default)]
    connected_fragment: Option<String>,
}

#[derive(Deserialize)]
struct RuneRecord {
    id: RuneId,
    name: String,
    #[serde(default)]
    description: String,
    shape: Vec<ShapeRecord>,
    #[serde(default)]
    texture: Option<String>,
    stat_effect: StatEffect,
}

impl RuneRecord {
    fn into_definition(self) -> Result<RuneDefinition, CatalogError> {
        if self.id.is_none() {
            return Err(CatalogError::Invalid(format!(
                "rune '{}' uses the reserved id 0",
                self.name
            )));
        }
        if self.shape.is_empty() {
            return Err(CatalogError::Invalid(format!(
                "rune {} has an empty shape",
                self.id
            )));
        }
        let mut shape: Vec<ShapeCell> = Vec::with_capacity(self.shape.len());
        for record in self.shape {
            if shape.iter().any(|cell| cell.offset == record.offset) {
                return Err(CatalogError::Invalid(format!(
                    "rune {} repeats offset {},{}",
                    self.id, record.offset.x, record.offset.y
                )));
            }
            shape.push(ShapeCell {
                offset: record.offset,
                fragment: record.fragment,
                connected_fragment: record.connected_fragment,
            });
        }
        Ok(RuneDefinition {
            id: self.id,
            name: self.name,
            description: self.description,
            shape,
            texture: self.texture,
            stat_effect: self.stat_effect,
        })
    }
}

/// Rune and layout catalogs read from `runes.json` and `layouts.json`.
#[derive(Clone, Debug, Default)]
pub struct JsonCatalog {
    runes: HashMap<RuneId, RuneDefinition>,
    layouts: HashMap<CharacterClass, GridLayout>,
}

impl JsonCatalog {
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, CatalogError> {
        let dir = dir.as_ref();
        let runes = read_file(&dir.join(RUNES_FILE))?;
        let layouts = read_file(&dir.join(LAYOUTS_FILE))?;
        let catalog = Self::from_strs(&runes, &layouts).map_err(|err| match err {
            CatalogError::Json { path, source } => CatalogError::Json {
                path: dir.join(path),
                source,
            },
            other => other,
        })?;
        info!(
            "Loaded {} runes and {} layouts from {}",
            catalog.runes.len(),
            catalog.layouts.len(),
            dir.display()
        );
        Ok(catalog)
    }

    pub fn from_strs(runes_json: &str, layouts_json: &str) -> Result<Self, CatalogError> {
        let records: Vec<RuneRecord> =
            serde_json::from_str(runes_json).map_err(|source| CatalogError::Json {
                path: RUNES_FILE.into(),
                source,
            })?;
        let layouts: Vec<GridLayout> =
            serde_json::from_str(layouts_json).map_err(|source| CatalogError::Json {
                path: LAYOUTS_FILE.into(),
                source,
            })?;

        let mut catalog = Self::default();
        for record in records {
            let rune = record.into_definition()?;
            if catalog.runes.contains_key(&rune.id) {
                return Err(CatalogError::Invalid(format!("duplicate rune {}", rune.id)));
            }
            debug!("Catalog rune {} '{}'", rune.id, rune.name);
            catalog.runes.insert(rune.id, rune);
        }
        for layout in layouts {
            layout.validate().map_err(CatalogError::Invalid)?;
            if catalog.layouts.contains_key(&layout.class) {
                return Err(CatalogError::Invalid(format!(
                    "duplicate layout for {}",
                    layout.class
                )));
            }
            catalog.layouts.insert(layout.class, layout);
        }
        Ok(catalog)
    }
}

fn read_file(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

impl RuneCatalog for JsonCatalog {
    fn rune(&self, id: RuneId) -> Option<RuneDefinition> {
        self.runes.get(&id).cloned()
    }

    fn rune_ids(&self) -> Vec<RuneId> {
        let mut ids: Vec<RuneId> = self.runes.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl LayoutCatalog for JsonCatalog {
    fn layout(&self, class: CharacterClass) -> Option<GridLayout> {
        self.layouts.get(&class).cloned()
    }

    fn classes(&self) -> Vec<CharacterClass> {
        let mut classes: Vec<CharacterClass> = self.layouts.keys().copied().collect();
        classes.sort();
        classes
    }
}
