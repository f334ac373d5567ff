use bracket_geometry::prelude::Point;
use serde::{Deserialize, Serialize};

use super::{CharacterClass, RuneId, point_repr};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Empty,
    Occupied,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayoutCell {
    #[serde(with = "point_repr")]
    pub pos: Point,
    #[serde(default)]
    pub state: CellState,
    #[serde(default)]
    pub is_special: bool,
    #[serde(default = "no_rune")]
    pub rune_id: RuneId,
}

fn no_rune() -> RuneId {
    RuneId::NONE
}

impl LayoutCell {
    pub fn open(x: i32, y: i32) -> Self {
        Self {
            pos: Point::new(x, y),
            state: CellState::Empty,
            is_special: false,
            rune_id: RuneId::NONE,
        }
    }

    pub fn special(mut self) -> Self {
        self.is_special = true;
        self
    }

    /// Marks the cell occupied from the start, optionally by a pre-placed rune.
    pub fn filled(mut self, rune_id: RuneId) -> Self {
        self.state = CellState::Occupied;
        self.rune_id = rune_id;
        self
    }

}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub class: CharacterClass,
    pub cells: Vec<LayoutCell>,
}

impl GridLayout {
    pub fn new(class: CharacterClass, cells: Vec<LayoutCell>) -> Self {
        Self { class, cells }
    }

    /// Every cell of a `width` x `height` rectangle, row-major, all empty.
    pub fn rectangle(class: CharacterClass, width: i32, height: i32) -> Self {
        let mut cells = Vec::with_capacity((width.max(0) * height.max(0)) as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(LayoutCell::open(x, y));
            }
        }
        Self { class, cells }
    }

    pub fn cell_mut(&mut self, pos: Point) -> Option<&mut LayoutCell> {
        self.cells.iter_mut().find(|cell| cell.pos == pos)
    }

    pub fn cell(&self, pos: Point) -> Option<&LayoutCell> {
        self.cells.iter().find(|cell| cell.pos == pos)
    }

    pub fn special_cell(&self) -> Option<Point> {
        self.cells.iter().find(|cell| cell.is_special).map(|cell| cell.pos)
    }

    /// Checks the structural rules a layout must satisfy before use.
    pub fn validate(&self) -> Result<(), String> {
        if self.cells.is_empty() {
            return Err(format!("layout for {} has no cells", self.class));
        }
        let specials = self.cells.iter().filter(|cell| cell.is_special).count();
        if specials > 1 {
            return Err(format!(
                "layout for {} has {specials} special cells",
                self.class
            ));
        }
        for (idx, cell) in self.cells.iter().enumerate() {
            if self.cells[..idx].iter().any(|other| other.pos == cell.pos) {
                return Err(format!(
                    "layout for {} repeats cell {},{}",
                    self.class, cell.pos.x, cell.pos.y
                ));
            }
        }
        Ok(())
    }
}

/// Demo layouts shipped with the crate.
///
/// Ares gets a 5x5 board around a fixed powered core, Merci a 6x4 board whose
/// source corner starts empty, and Chan a diamond with a rune already seated on
/// the source.
pub fn builtin_layout(class: CharacterClass) -> GridLayout {
    match class {
        CharacterClass::Ares => {
            let mut layout = GridLayout::rectangle(class, 5, 5);
            if let Some(core) = layout.cell_mut(Point::new(2, 2)) {
                *core = LayoutCell::open(2, 2).special().filled(RuneId::NONE);
            }
            layout
        }
        CharacterClass::Merci => {
            let mut layout = GridLayout::rectangle(class, 6, 4);
            if let Some(source) = layout.cell_mut(Point::new(0, 0)) {
                source.is_special = true;
            }
            layout
        }
        CharacterClass::Chan => {
            let mut cells = Vec::new();
            for y in 0..5 {
                for x in 0..5 {
                    if (x - 2i32).abs() + (y - 2i32).abs() <= 2 {
                        cells.push(LayoutCell::open(x, y));
                    }
                }
            }
            let mut layout = GridLayout::new(class, cells);
            if let Some(center) = layout.cell_mut(Point::new(2, 2)) {
                *center = LayoutCell::open(2, 2).special().filled(RuneId(1));
            }
            layout
        }
    }
}
