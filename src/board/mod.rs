pub mod cache;
pub mod connectivity;
pub mod grid;
pub mod stats;

use std::{collections::HashMap, rc::Rc};

use bracket_geometry::prelude::Point;
use log::{debug, error, info, warn};
use smallvec::SmallVec;

use crate::{
    data::{
        BuiltinCatalog, CellState, CharacterClass, GridLayout, LayoutCatalog, RuneCatalog,
        RuneDefinition, RuneId,
    },
    error::BoardError,
};

pub use self::{
    cache::CatalogCache,
    grid::{BoardGrid, GridCell, PlacedRune},
    stats::{BoardStats, StatRow},
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlacementResult {
    Valid,
    ReplaceExisting,
    OutOfBounds,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlacementCheck {
    pub result: PlacementResult,
    /// Distinct runes the footprint overlaps, in scan order.
    pub affected: Vec<RuneId>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

type StatsListener = Box<dyn FnMut(&BoardStats)>;

fn cell_pos(anchor: Point, offset: Point) -> Point {
    Point::new(anchor.x + offset.x, anchor.y + offset.y)
}

/// Rune placement board for one character class at a time.
///
/// Placements update the grid and `current_stats` immediately; `applied_stats`
/// only moves on [`ArcaneBoard::apply_changes`] or a load.
pub struct ArcaneBoard {
    catalogs: CatalogCache,
    current_class: Option<CharacterClass>,
    layout: Option<Rc<GridLayout>>,
    grid: BoardGrid,
    placed_runes: Vec<PlacedRune>,
    connected_rune_count: usize,
    has_unsaved_changes: bool,
    current_stats: BoardStats,
    applied_stats: BoardStats,
    listeners: Vec<(SubscriberId, StatsListener)>,
    next_listener: u64,
}

impl ArcaneBoard {
    pub fn new<R, L>(runes: R, layouts: L) -> Self
    where
        R: RuneCatalog + 'static,
        L: LayoutCatalog + 'static,
    {
        Self::with_cache(CatalogCache::new(Box::new(runes), Box::new(layouts)))
    }

    pub fn with_builtin_catalogs() -> Self {
        Self::new(BuiltinCatalog, BuiltinCatalog)
    }

    pub fn with_cache(catalogs: CatalogCache) -> Self {
        Self {
            catalogs,
            current_class: None,
            layout: None,
            grid: BoardGrid::default(),
            placed_runes: Vec::new(),
            connected_rune_count: 0,
            has_unsaved_changes: false,
            current_stats: BoardStats::default(),
            applied_stats: BoardStats::default(),
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // ---- class / grid management ----

    /// Activates `class`. Switching to a different class rebuilds the grid from
    /// its layout and makes the fresh stats the applied ones.
    pub fn set_class(&mut self, class: CharacterClass) -> Result<(), BoardError> {
        if self.current_class == Some(class) && self.layout.is_some() {
            self.has_unsaved_changes = false;
            return Ok(());
        }

        let layout = self
            .catalogs
            .layout(class)
            .ok_or(BoardError::UnknownClass(class))?;
        if let Err(reason) = layout.validate() {
            warn!("Rejecting layout for {class}: {reason}");
            return Err(BoardError::UnknownClass(class));
        }

        let needs_reset = self.current_class != Some(class);
        self.current_class = Some(class);
        self.layout = Some(layout);

        if needs_reset {
            self.init_grid();
            self.calculate_stats();
            self.applied_stats = self.current_stats;
            info!(
                "Activated {} board with {} cells",
                class,
                self.grid.len()
            );
        }

        self.has_unsaved_changes = false;
        Ok(())
    }

    pub fn current_class(&self) -> Option<CharacterClass> {
        self.current_class
    }

    pub fn current_layout(&self) -> Option<&GridLayout> {
        self.layout.as_deref()
    }

    fn init_grid(&mut self) {
        self.placed_runes.clear();
        self.connected_rune_count = 0;
        match &self.layout {
            Some(layout) => {
                let (grid, seeded) = BoardGrid::from_layout(layout);
                if !seeded.is_empty() {
                    debug!("Layout seats {} runes up front", seeded.len());
                }
                self.grid = grid;
                self.placed_runes = seeded;
            }
            None => self.grid = BoardGrid::default(),
        }
    }

    // ---- placement ----

    /// Reports whether `rune_id` anchored at `anchor` fits, and which placed
    /// runes it would displace. Unknown runes report `OutOfBounds`.
    pub fn check_placement(&mut self, rune_id: RuneId, anchor: Point) -> PlacementCheck {
        let Some(rune) = self.catalogs.rune(rune_id) else {
            return PlacementCheck {
                result: PlacementResult::OutOfBounds,
                affected: Vec::new(),
            };
        };

        let mut out_of_bounds = false;
        let mut affected: SmallVec<[RuneId; 4]> = SmallVec::new();
        for offset in rune.offsets() {
            match self.grid.cell_at(cell_pos(anchor, offset)) {
                None => out_of_bounds = true,
                Some(cell) if cell.state == CellState::Occupied && !cell.rune_id.is_none() => {
                    if !affected.contains(&cell.rune_id) {
                        affected.push(cell.rune_id);
                    }
                }
                Some(_) => {}
            }
        }

        let result = if out_of_bounds {
            PlacementResult::OutOfBounds
        } else if !affected.is_empty() {
            PlacementResult::ReplaceExisting
        } else {
            PlacementResult::Valid
        };
        PlacementCheck {
            result,
            affected: affected.into_vec(),
        }
    }

    /// Places a rune, first removing every rune its footprint overlaps. Returns
    /// the ids that were removed to make room.
    ///
    /// A rune that is already on the board elsewhere is moved: its old copy is
    /// lifted off without being listed, unless the new footprint overlaps it.
    pub fn place_rune(&mut self, rune_id: RuneId, anchor: Point) -> Result<Vec<RuneId>, BoardError> {
        let check = self.check_placement(rune_id, anchor);
        let rune = self.catalogs.rune(rune_id);
        if check.result == PlacementResult::OutOfBounds {
            if rune.is_none() {
                return Err(BoardError::UnknownRune(rune_id));
            }
            return Err(BoardError::OutOfBounds {
                rune: rune_id,
                anchor,
            });
        }
        let Some(rune) = rune else {
            error!("Rune {rune_id} passed the placement check but can no longer be resolved");
            return Err(BoardError::CatalogCorrupted(rune_id));
        };

        let mut removed = Vec::new();
        if check.result == PlacementResult::ReplaceExisting {
            for overlapping in check.affected {
                match self.remove_rune(overlapping) {
                    Ok(()) => removed.push(overlapping),
                    Err(err) => warn!("Could not lift overlapping rune {overlapping}: {err}"),
                }
            }
        }
        if self.is_placed(rune_id) && self.remove_rune(rune_id).is_ok() {
            debug!("Moving rune {rune_id}");
        }

        self.placed_runes.push(PlacedRune::new(rune_id, anchor));
        self.apply_rune_to_grid(&rune, anchor);
        debug!(
            "Placed rune {} at {},{} (displaced {:?})",
            rune_id, anchor.x, anchor.y, removed
        );

        self.has_unsaved_changes = true;
        self.calculate_stats();
        self.notify(self.current_stats);
        Ok(removed)
    }

    /// Lifts a placed rune off the board.
    pub fn remove_rune(&mut self, rune_id: RuneId) -> Result<(), BoardError> {
        let idx = self
            .placed_runes
            .iter()
            .position(|placed| placed.rune_id == rune_id)
            .ok_or(BoardError::RuneNotPlaced(rune_id))?;

        self.placed_runes.remove(idx);
        self.clear_rune_from_grid(rune_id);
        debug!("Removed rune {rune_id}");

        self.has_unsaved_changes = true;
        self.calculate_stats();
        self.notify(self.current_stats);
        Ok(())
    }

    fn is_placed(&self, rune_id: RuneId) -> bool {
        self.placed_runes
            .iter()
            .any(|placed| placed.rune_id == rune_id)
    }

    fn apply_rune_to_grid(&mut self, rune: &RuneDefinition, anchor: Point) {
        for cell in &rune.shape {
            self.grid.occupy(
                cell_pos(anchor, cell.offset),
                rune.id,
                cell.fragment.clone(),
                cell.connected_fragment.clone(),
            );
        }
    }

    fn clear_rune_from_grid(&mut self, rune_id: RuneId) {
        let covered: Vec<Point> = self
            .grid
            .iter()
            .filter(|cell| cell.rune_id == rune_id)
            .map(|cell| cell.pos)
            .collect();
        for pos in covered {
            self.grid.vacate(pos);
        }
    }

    // ---- stats ----

    /// Recomputes connectivity and both stat rows from the placed runes.
    pub fn calculate_stats(&mut self) -> BoardStats {
        self.connected_rune_count = connectivity::update_connections(&mut self.grid);

        let mut contributions = Vec::with_capacity(self.placed_runes.len());
        for placed in &self.placed_runes {
            let Some(rune) = self.catalogs.rune(placed.rune_id) else {
                continue;
            };
            let connected = self.grid.is_rune_connected(placed.rune_id);
            contributions.push((rune.stat_effect, connected));
        }

        self.current_stats = stats::aggregate(contributions, self.connected_rune_count);
        self.current_stats
    }

    // ---- state management ----

    /// Commits the current stats as the applied ones.
    pub fn apply_changes(&mut self) -> BoardStats {
        self.applied_stats = self.current_stats;
        self.has_unsaved_changes = false;
        self.notify(self.applied_stats);
        self.applied_stats
    }

    /// Clears every placed rune. Returns `None` when nothing was placed.
    pub fn reset_all_runes(&mut self) -> Option<BoardStats> {
        if self.placed_runes.is_empty() {
            return None;
        }

        self.init_grid();
        self.current_stats = BoardStats::default();
        self.has_unsaved_changes = true;
        info!("Reset board");
        self.notify(self.current_stats);
        Some(self.current_stats)
    }

    /// Replaces the board with a trusted set of placements, e.g. from a save.
    ///
    /// Entries skip the overlap check. Unknown runes and repeated ids are
    /// dropped with a warning.
    pub fn load_saved_data(
        &mut self,
        class: CharacterClass,
        runes: &[PlacedRune],
    ) -> Result<BoardStats, BoardError> {
        if self.current_class != Some(class) {
            self.set_class(class)?;
        }

        self.init_grid();
        self.current_stats = BoardStats::default();

        for placed in runes {
            if placed.rune_id.is_none() || self.is_placed(placed.rune_id) {
                warn!("Skipping repeated or reserved rune {} in saved data", placed.rune_id);
                continue;
            }
            let Some(rune) = self.catalogs.rune(placed.rune_id) else {
                warn!("Skipping unknown rune {} in saved data", placed.rune_id);
                continue;
            };
            self.placed_runes.push(*placed);
            self.apply_rune_to_grid(&rune, placed.pos);
        }

        self.calculate_stats();
        self.applied_stats = self.current_stats;
        self.notify(self.current_stats);
        self.has_unsaved_changes = false;
        debug!(
            "Loaded {} runes for {}",
            self.placed_runes.len(),
            class
        );
        Ok(self.current_stats)
    }

    // ---- notification ----

    /// Registers a callback run synchronously after every mutating operation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriberId
    where
        F: FnMut(&BoardStats) + 'static,
    {
        let id = SubscriberId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, stats: BoardStats) {
        for (_, listener) in &mut self.listeners {
            listener(&stats);
        }
    }

    // ---- data access ----

    pub fn placed_runes(&self) -> &[PlacedRune] {
        &self.placed_runes
    }

    pub fn current_stats(&self) -> BoardStats {
        self.current_stats
    }

    pub fn applied_stats(&self) -> BoardStats {
        self.applied_stats
    }

    pub fn connected_rune_count(&self) -> usize {
        self.connected_rune_count
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub(crate) fn mark_saved(&mut self) {
        self.has_unsaved_changes = false;
    }

    pub fn grid(&self) -> &BoardGrid {
        &self.grid
    }

    pub fn cell(&self, pos: Point) -> Option<&GridCell> {
        self.grid.cell_at(pos)
    }

    /// Every cell of the active grid in row-major order.
    pub fn cells(&self) -> Vec<&GridCell> {
        self.grid.sorted_cells()
    }

    pub fn is_rune_connected(&self, rune_id: RuneId) -> bool {
        self.grid.is_rune_connected(rune_id)
    }

    pub fn rune_data(&mut self, rune_id: RuneId) -> Option<Rc<RuneDefinition>> {
        self.catalogs.rune(rune_id)
    }

    pub fn rune_shape(&mut self, rune_id: RuneId) -> Option<Vec<Point>> {
        self.catalogs
            .rune(rune_id)
            .map(|rune| rune.offsets().collect())
    }

    pub fn rune_texture(&mut self, rune_id: RuneId) -> Option<String> {
        self.catalogs.rune(rune_id).and_then(|rune| rune.texture.clone())
    }

    pub fn fragmented_rune_texture(&mut self, rune_id: RuneId) -> Option<HashMap<Point, Option<String>>> {
        self.catalogs.rune(rune_id).map(|rune| rune.fragments())
    }

    pub fn connected_fragmented_rune_texture(
        &mut self,
        rune_id: RuneId,
    ) -> Option<HashMap<Point, Option<String>>> {
        self.catalogs
            .rune(rune_id)
            .map(|rune| rune.connected_fragments())
    }

    /// Prefetches every catalog entry. Returns (runes, layouts) cached.
    pub fn warm_caches(&mut self) -> (usize, usize) {
        self.catalogs.warm()
    }

    /// Forgets cached catalog entries. The active grid keeps its layout until
    /// the next class switch.
    pub fn invalidate_catalogs(&mut self) {
        self.catalogs.invalidate();
        info!("Catalog caches invalidated");
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::data::{LayoutCell, ShapeCell, StatEffect, StatKind};

    struct FixtureRunes;

    impl RuneCatalog for FixtureRunes {
        fn rune(&self, id: RuneId) -> Option<RuneDefinition> {
            let (offsets, effect): (&[(i32, i32)], StatEffect) = match id.0 {
                1 => (&[(0, 0)], StatEffect::new(StatKind::Hp, 10.0)),
                2 => (&[(0, 0), (0, 1)], StatEffect::new(StatKind::Atk, 5.0)),
                3 => (&[(0, 0), (1, 0)], StatEffect::new(StatKind::Atk, 2.0)),
                4 => (&[(0, 0), (1, 0), (2, 0)], StatEffect::new(StatKind::Def, 1.0)),
                _ => return None,
            };
            Some(RuneDefinition::new(
                id,
                "fixture",
                "",
                offsets.iter().map(|&(x, y)| ShapeCell::bare(x, y)).collect(),
                None,
                effect,
            ))
        }

        fn rune_ids(&self) -> Vec<RuneId> {
            (1..=4).map(RuneId).collect()
        }
    }

    struct FixtureLayouts;

    impl LayoutCatalog for FixtureLayouts {
        fn layout(&self, class: CharacterClass) -> Option<GridLayout> {
            match class {
                CharacterClass::Ares => {
                    let mut layout = GridLayout::rectangle(class, 3, 3);
                    layout.cell_mut(Point::new(1, 1))?.is_special = true;
                    Some(layout)
                }
                CharacterClass::Merci => {
                    let mut layout = GridLayout::rectangle(class, 4, 1);
                    *layout.cell_mut(Point::new(0, 0))? =
                        LayoutCell::open(0, 0).special().filled(RuneId::NONE);
                    Some(layout)
                }
                CharacterClass::Chan => None,
            }
        }

        fn classes(&self) -> Vec<CharacterClass> {
            vec![CharacterClass::Ares, CharacterClass::Merci]
        }
    }

    fn board() -> ArcaneBoard {
        let mut board = ArcaneBoard::new(FixtureRunes, FixtureLayouts);
        board.set_class(CharacterClass::Ares).unwrap();
        board
    }

    #[test]
    fn set_class_fails_without_layout_and_keeps_state() {
        let mut board = board();
        board.place_rune(RuneId(1), Point::new(0, 0)).unwrap();
        assert!(matches!(
            board.set_class(CharacterClass::Chan),
            Err(BoardError::UnknownClass(CharacterClass::Chan))
        ));
        assert_eq!(board.current_class(), Some(CharacterClass::Ares));
        assert_eq!(board.placed_runes().len(), 1);
        assert!(board.has_unsaved_changes());
    }

    #[test]
    fn set_same_class_is_a_noop_that_clears_unsaved_flag() {
        let mut board = board();
        board.place_rune(RuneId(1), Point::new(0, 0)).unwrap();
        assert!(board.has_unsaved_changes());
        board.set_class(CharacterClass::Ares).unwrap();
        assert!(!board.has_unsaved_changes());
        assert_eq!(board.placed_runes().len(), 1);
    }

    #[test]
    fn switching_class_rebuilds_grid_and_applies_stats() {
        let mut board = board();
        board.place_rune(RuneId(1), Point::new(1, 1)).unwrap();
        board.set_class(CharacterClass::Merci).unwrap();
        assert_eq!(board.grid().len(), 4);
        assert!(board.placed_runes().is_empty());
        assert_eq!(board.applied_stats(), board.current_stats());
        assert!(board.current_stats().rune_stats.is_zero());
    }

    #[test]
    fn check_collects_overlaps_even_when_out_of_bounds() {
        let mut board = board();
        board.place_rune(RuneId(1), Point::new(2, 1)).unwrap();
        let check = board.check_placement(RuneId(4), Point::new(1, 1));
        assert_eq!(check.result, PlacementResult::OutOfBounds);
        assert_eq!(check.affected, vec![RuneId(1)]);

        let check = board.check_placement(RuneId(3), Point::new(1, 1));
        assert_eq!(check.result, PlacementResult::ReplaceExisting);

        let check = board.check_placement(RuneId(3), Point::new(0, 0));
        assert_eq!(check.result, PlacementResult::Valid);
        assert!(check.affected.is_empty());

        let check = board.check_placement(RuneId(9), Point::new(0, 0));
        assert_eq!(check.result, PlacementResult::OutOfBounds);
    }

    #[test]
    fn unknown_rune_placement_is_not_found() {
        let mut board = board();
        assert!(matches!(
            board.place_rune(RuneId(9), Point::new(0, 0)),
            Err(BoardError::UnknownRune(RuneId(9)))
        ));
        assert!(board.placed_runes().is_empty());
    }

    #[test]
    fn placing_a_placed_rune_moves_it() {
        let mut board = board();
        board.place_rune(RuneId(2), Point::new(0, 0)).unwrap();
        let removed = board.place_rune(RuneId(2), Point::new(2, 0)).unwrap();
        assert!(removed.is_empty());
        assert_eq!(board.placed_runes(), &[PlacedRune::new(RuneId(2), Point::new(2, 0))]);
        assert!(board.cell(Point::new(0, 0)).unwrap().is_empty());
        assert!(board.cell(Point::new(0, 1)).unwrap().is_empty());
        assert_eq!(board.cell(Point::new(2, 1)).unwrap().rune_id, RuneId(2));

        // Shifting onto its own footprint counts as an overlap.
        let removed = board.place_rune(RuneId(2), Point::new(2, 1)).unwrap();
        assert_eq!(removed, vec![RuneId(2)]);
        assert_eq!(board.placed_runes(), &[PlacedRune::new(RuneId(2), Point::new(2, 1))]);
        assert!(board.cell(Point::new(2, 0)).unwrap().is_empty());
    }

    #[test]
    fn failed_placement_keeps_overlapped_runes() {
        let seen = Rc::new(RefCell::new(0));
        let mut board = board();
        board.place_rune(RuneId(1), Point::new(2, 1)).unwrap();
        let sink = Rc::clone(&seen);
        board.subscribe(move |_| *sink.borrow_mut() += 1);

        assert!(matches!(
            board.place_rune(RuneId(4), Point::new(1, 1)),
            Err(BoardError::OutOfBounds { .. })
        ));
        assert_eq!(board.placed_runes(), &[PlacedRune::new(RuneId(1), Point::new(2, 1))]);
        assert_eq!(board.cell(Point::new(2, 1)).unwrap().rune_id, RuneId(1));
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn removing_a_rune_from_the_core_leaves_it_empty() {
        let mut board = board();
        board.set_class(CharacterClass::Merci).unwrap();
        board.place_rune(RuneId(1), Point::new(1, 0)).unwrap();
        assert_eq!(board.connected_rune_count(), 1);

        board.place_rune(RuneId(3), Point::new(0, 0)).unwrap();
        board.remove_rune(RuneId(3)).unwrap();
        let core = board.cell(Point::new(0, 0)).unwrap();
        assert_eq!(core.state, CellState::Empty);
        assert!(core.rune_id.is_none());
        assert!(board.cell(Point::new(1, 0)).unwrap().is_empty());
        assert_eq!(board.connected_rune_count(), 0);

        board.place_rune(RuneId(1), Point::new(2, 0)).unwrap();
        board.reset_all_runes().unwrap();
        assert_eq!(
            board.cell(Point::new(0, 0)).unwrap().state,
            CellState::Occupied
        );
    }

    #[test]
    fn subscribers_see_every_mutation_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut board = board();
        let sink = Rc::clone(&seen);
        let id = board.subscribe(move |stats| sink.borrow_mut().push(*stats));

        board.place_rune(RuneId(1), Point::new(1, 1)).unwrap();
        board.apply_changes();
        board.remove_rune(RuneId(1)).unwrap();
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(seen.borrow()[0].rune_stats.hp, 10.0);

        assert!(board.unsubscribe(id));
        assert!(!board.unsubscribe(id));
        board.place_rune(RuneId(1), Point::new(0, 0)).unwrap();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn reset_and_load_notify_but_class_switches_do_not() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut board = board();
        let sink = Rc::clone(&seen);
        board.subscribe(move |stats| sink.borrow_mut().push(*stats));

        board.set_class(CharacterClass::Merci).unwrap();
        board.set_class(CharacterClass::Ares).unwrap();
        assert!(seen.borrow().is_empty());

        assert!(board.reset_all_runes().is_none());
        assert!(seen.borrow().is_empty());

        board.place_rune(RuneId(1), Point::new(1, 1)).unwrap();
        board.reset_all_runes().unwrap();
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[0].rune_stats.hp, 10.0);
        assert_eq!(seen.borrow()[1], BoardStats::default());

        let loaded = board
            .load_saved_data(
                CharacterClass::Ares,
                &[
                    PlacedRune::new(RuneId(1), Point::new(1, 1)),
                    PlacedRune::new(RuneId(2), Point::new(0, 1)),
                ],
            )
            .unwrap();
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(seen.borrow()[2], loaded);
        assert_eq!(loaded.rune_stats.hp, 10.0);
        assert_eq!(loaded.rune_stats.atk, 5.0);
        assert_eq!(loaded.bonus_stats.hp, 2.0);
        assert_eq!(loaded.bonus_stats.atk, 2.0);
    }

    #[test]
    fn reset_on_empty_board_is_a_noop() {
        let mut board = board();
        assert!(board.reset_all_runes().is_none());
        assert!(!board.has_unsaved_changes());
    }

    #[test]
    fn load_skips_unknown_and_repeated_runes() {
        let mut board = board();
        let stats = board
            .load_saved_data(
                CharacterClass::Ares,
                &[
                    PlacedRune::new(RuneId(1), Point::new(1, 1)),
                    PlacedRune::new(RuneId(1), Point::new(0, 0)),
                    PlacedRune::new(RuneId(42), Point::new(2, 2)),
                ],
            )
            .unwrap();
        assert_eq!(board.placed_runes().len(), 1);
        assert_eq!(stats.rune_stats.hp, 10.0);
        assert_eq!(stats.bonus_stats.hp, 1.0);
        assert_eq!(board.applied_stats(), stats);
        assert!(!board.has_unsaved_changes());
    }

    #[test]
    fn load_switches_class_when_needed() {
        let mut board = board();
        board
            .load_saved_data(
                CharacterClass::Merci,
                &[PlacedRune::new(RuneId(4), Point::new(1, 0))],
            )
            .unwrap();
        assert_eq!(board.current_class(), Some(CharacterClass::Merci));
        assert_eq!(board.connected_rune_count(), 1);
        assert_eq!(board.current_stats().bonus_stats.def, 1.0);
    }

    #[test]
    fn data_access_helpers_read_through_the_cache() {
        let mut board = ArcaneBoard::with_builtin_catalogs();
        assert_eq!(board.warm_caches(), (8, 3));
        assert_eq!(board.rune_shape(RuneId(2)).map(|s| s.len()), Some(2));
        assert_eq!(board.rune_texture(RuneId(2)).as_deref(), Some("T_Rune_02"));
        assert_eq!(
            board.fragmented_rune_texture(RuneId(5)).map(|frags| frags.len()),
            Some(4)
        );
        assert!(board.connected_fragmented_rune_texture(RuneId(99)).is_none());
        board.invalidate_catalogs();
        assert!(board.rune_data(RuneId(8)).is_some());
    }
}
