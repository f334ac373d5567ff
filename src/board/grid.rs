use std::collections::HashMap;

use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

use crate::data::{CellState, GridLayout, LayoutCell, RuneId, point_repr};

/// A rune seated on the board at `pos`; it covers `pos + offset` for each shape offset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedRune {
    pub rune_id: RuneId,
    #[serde(with = "point_repr")]
    pub pos: Point,
}

impl PlacedRune {
    pub const fn new(rune_id: RuneId, pos: Point) -> Self {
        Self { rune_id, pos }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    pub pos: Point,
    pub state: CellState,
    pub is_special: bool,
    pub is_connected: bool,
    pub rune_id: RuneId,
    pub fragment: Option<String>,
    pub connected_fragment: Option<String>,
}

impl GridCell {
    fn from_layout(cell: &LayoutCell) -> Self {
        let rune_id = match cell.state {
            CellState::Empty => RuneId::NONE,
            CellState::Occupied => cell.rune_id,
        };
        Self {
            pos: cell.pos,
            state: cell.state,
            is_special: cell.is_special,
            is_connected: false,
            rune_id,
            fragment: None,
            connected_fragment: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.state == CellState::Empty
    }

    /// The fragment a renderer should show for the cell's current connection state.
    pub fn visual(&self) -> Option<&str> {
        if self.is_connected && self.connected_fragment.is_some() {
            self.connected_fragment.as_deref()
        } else {
            self.fragment.as_deref()
        }
    }
}

/// Runtime cell state for the active layout, keyed by position.
#[derive(Clone, Debug, Default)]
pub struct BoardGrid {
    cells: HashMap<Point, GridCell>,
    special: Option<Point>,
}

impl BoardGrid {
    /// Builds pristine cell state and returns the runes the layout seats up front.
    pub fn from_layout(layout: &GridLayout) -> (Self, Vec<PlacedRune>) {
        let mut grid = Self::default();
        let mut seeded = Vec::new();
        for cell in &layout.cells {
            let runtime = GridCell::from_layout(cell);
            if runtime.state == CellState::Occupied
                && !runtime.rune_id.is_none()
                && !seeded.iter().any(|placed: &PlacedRune| placed.rune_id == runtime.rune_id)
            {
                seeded.push(PlacedRune::new(runtime.rune_id, cell.pos));
            }
            if cell.is_special {
                grid.special = Some(cell.pos);
            }
            grid.cells.insert(cell.pos, runtime);
        }
        (grid, seeded)
    }

    pub fn contains(&self, pos: Point) -> bool {
        self.cells.contains_key(&pos)
    }

    pub fn cell_at(&self, pos: Point) -> Option<&GridCell> {
        self.cells.get(&pos)
    }

    pub fn cell_at_mut(&mut self, pos: Point) -> Option<&mut GridCell> {
        self.cells.get_mut(&pos)
    }

    pub fn special_cell(&self) -> Option<Point> {
        self.special
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.values()
    }

    /// Cells in row-major order.
    pub fn sorted_cells(&self) -> Vec<&GridCell> {
        let mut cells: Vec<&GridCell> = self.cells.values().collect();
        cells.sort_by_key(|cell| (cell.pos.y, cell.pos.x));
        cells
    }

    /// Seats `rune_id` on the cell. Positions outside the grid are ignored.
    pub fn occupy(
        &mut self,
        pos: Point,
        rune_id: RuneId,
        fragment: Option<String>,
        connected_fragment: Option<String>,
    ) -> bool {
        match self.cells.get_mut(&pos) {
            Some(cell) => {
                cell.state = CellState::Occupied;
                cell.rune_id = rune_id;
                cell.fragment = fragment;
                cell.connected_fragment = connected_fragment;
                true
            }
            None => false,
        }
    }

    /// Clears a covered cell back to Empty with no rune.
    pub fn vacate(&mut self, pos: Point) -> bool {
        match self.cells.get_mut(&pos) {
            Some(cell) => {
                cell.state = CellState::Empty;
                cell.rune_id = RuneId::NONE;
                cell.fragment = None;
                cell.connected_fragment = None;
                true
            }
            None => false,
        }
    }

    pub fn clear_connections(&mut self) {
        self.cells
            .values_mut()
            .for_each(|cell| cell.is_connected = false);
    }

    pub fn mark_connected(&mut self, pos: Point) {
        if let Some(cell) = self.cells.get_mut(&pos) {
            cell.is_connected = true;
        }
    }

    pub fn is_rune_connected(&self, rune_id: RuneId) -> bool {
        self.cells
            .values()
            .any(|cell| cell.rune_id == rune_id && cell.is_connected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CharacterClass;

    fn layout() -> GridLayout {
        let mut layout = GridLayout::rectangle(CharacterClass::Ares, 3, 2);
        if let Some(cell) = layout.cell_mut(Point::new(1, 1)) {
            *cell = LayoutCell::open(1, 1).special().filled(RuneId::NONE);
        }
        if let Some(cell) = layout.cell_mut(Point::new(2, 0)) {
            *cell = LayoutCell::open(2, 0).filled(RuneId(4));
        }
        layout
    }

    #[test]
    fn from_layout_seeds_preplaced_runes_and_special_cell() {
        let (grid, seeded) = BoardGrid::from_layout(&layout());
        assert_eq!(grid.len(), 6);
        assert_eq!(grid.special_cell(), Some(Point::new(1, 1)));
        assert_eq!(seeded, vec![PlacedRune::new(RuneId(4), Point::new(2, 0))]);
        let fixed = grid.cell_at(Point::new(1, 1)).unwrap();
        assert_eq!(fixed.state, CellState::Occupied);
        assert!(fixed.rune_id.is_none());
    }

    #[test]
    fn vacate_empties_cells_even_over_fixed_ones() {
        let (mut grid, _) = BoardGrid::from_layout(&layout());
        let core = Point::new(1, 1);
        assert!(grid.occupy(core, RuneId(2), Some("frag".into()), None));
        assert_eq!(grid.cell_at(core).unwrap().rune_id, RuneId(2));

        assert!(grid.vacate(core));
        let cell = grid.cell_at(core).unwrap();
        assert!(cell.is_empty());
        assert!(cell.rune_id.is_none());
        assert!(cell.fragment.is_none());

        let open = Point::new(0, 0);
        grid.occupy(open, RuneId(2), None, None);
        grid.vacate(open);
        assert!(grid.cell_at(open).unwrap().is_empty());

        assert!(!grid.vacate(Point::new(9, 9)));
        assert!(!grid.occupy(Point::new(9, 9), RuneId(2), None, None));
    }

    #[test]
    fn visual_prefers_connected_fragment_only_when_connected() {
        let (mut grid, _) = BoardGrid::from_layout(&layout());
        let pos = Point::new(0, 1);
        grid.occupy(pos, RuneId(3), Some("dim".into()), Some("lit".into()));
        assert_eq!(grid.cell_at(pos).unwrap().visual(), Some("dim"));
        grid.mark_connected(pos);
        assert_eq!(grid.cell_at(pos).unwrap().visual(), Some("lit"));
        assert!(grid.is_rune_connected(RuneId(3)));
        grid.clear_connections();
        assert!(!grid.is_rune_connected(RuneId(3)));
    }

    #[test]
    fn sorted_cells_are_row_major() {
        let (grid, _) = BoardGrid::from_layout(&layout());
        let order: Vec<(i32, i32)> = grid
            .sorted_cells()
            .iter()
            .map(|cell| (cell.pos.x, cell.pos.y))
            .collect();
        assert_eq!(order, vec![(0, 0), (1, 0), (2, 0), (0, 1), (1, 1), (2, 1)]);
    }
}
