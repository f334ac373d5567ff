use std::{collections::HashMap, rc::Rc};

use log::debug;

use crate::data::{CharacterClass, GridLayout, LayoutCatalog, RuneCatalog, RuneDefinition, RuneId};

/// Lazily filled, explicitly invalidated cache in front of the two catalogs.
pub struct CatalogCache {
    runes: Box<dyn RuneCatalog>,
    layouts: Box<dyn LayoutCatalog>,
    rune_cache: HashMap<RuneId, Rc<RuneDefinition>>,
    layout_cache: HashMap<CharacterClass, Rc<GridLayout>>,
}

impl CatalogCache {
    pub fn new(runes: Box<dyn RuneCatalog>, layouts: Box<dyn LayoutCatalog>) -> Self {
        Self {
            runes,
            layouts,
            rune_cache: HashMap::new(),
            layout_cache: HashMap::new(),
        }
    }

    pub fn rune(&mut self, id: RuneId) -> Option<Rc<RuneDefinition>> {
        if id.is_none() {
            return None;
        }
        if let Some(rune) = self.rune_cache.get(&id) {
            return Some(Rc::clone(rune));
        }
        let rune = Rc::new(self.runes.rune(id)?);
        debug!("Cached rune {} '{}'", id, rune.name);
        self.rune_cache.insert(id, Rc::clone(&rune));
        Some(rune)
    }

    pub fn layout(&mut self, class: CharacterClass) -> Option<Rc<GridLayout>> {
        if let Some(layout) = self.layout_cache.get(&class) {
            return Some(Rc::clone(layout));
        }
        let layout = Rc::new(self.layouts.layout(class)?);
        debug!("Cached layout for {} ({} cells)", class, layout.cells.len());
        self.layout_cache.insert(class, Rc::clone(&layout));
        Some(layout)
    }

    /// Resolves every entry the catalogs enumerate. Returns how many runes and
    /// layouts ended up cached.
    pub fn warm(&mut self) -> (usize, usize) {
        for id in self.runes.rune_ids() {
            let _ = self.rune(id);
        }
        for class in self.layouts.classes() {
            let _ = self.layout(class);
        }
        (self.rune_cache.len(), self.layout_cache.len())
    }

    /// Drops every cached entry so the next lookup reads the catalogs again.
    pub fn invalidate(&mut self) {
        self.rune_cache.clear();
        self.layout_cache.clear();
    }

    pub fn cached_rune_count(&self) -> usize {
        self.rune_cache.len()
    }

    pub fn cached_layout_count(&self) -> usize {
        self.layout_cache.len()
    }
}
