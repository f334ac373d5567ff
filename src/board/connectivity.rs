use std::collections::HashSet;

use bracket_geometry::prelude::Point;
use smallvec::SmallVec;

use super::grid::BoardGrid;
use crate::data::RuneId;

const DIRECTIONS: [(i32, i32); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

/// Marks every non-empty cell reachable from the special cell through
/// 4-directional neighbours and returns the number of distinct runes touched.
///
/// An empty or missing special cell connects nothing.
pub fn update_connections(grid: &mut BoardGrid) -> usize {
    grid.clear_connections();

    let Some(root) = grid.special_cell() else {
        return 0;
    };

    let mut visited: HashSet<Point> = HashSet::with_capacity(grid.len());
    let mut stack: SmallVec<[Point; 16]> = SmallVec::new();
    stack.push(root);

    while let Some(pos) = stack.pop() {
        if visited.contains(&pos) {
            continue;
        }
        match grid.cell_at(pos) {
            Some(cell) if !cell.is_empty() => {}
            _ => continue,
        }
        visited.insert(pos);
        grid.mark_connected(pos);
        for (dx, dy) in DIRECTIONS {
            let next = Point::new(pos.x + dx, pos.y + dy);
            if !visited.contains(&next) {
                stack.push(next);
            }
        }
    }

    let connected: HashSet<RuneId> = grid
        .iter()
        .filter(|cell| cell.is_connected && !cell.rune_id.is_none())
        .map(|cell| cell.rune_id)
        .collect();
    connected.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CharacterClass, GridLayout, LayoutCell};

    fn grid_with_special(width: i32, height: i32, special: Point) -> BoardGrid {
        let mut layout = GridLayout::rectangle(CharacterClass::Merci, width, height);
        if let Some(cell) = layout.cell_mut(special) {
            cell.is_special = true;
        }
        BoardGrid::from_layout(&layout).0
    }

    #[test]
    fn empty_special_cell_connects_nothing() {
        let mut grid = grid_with_special(3, 3, Point::new(1, 1));
        grid.occupy(Point::new(0, 0), RuneId(1), None, None);
        grid.occupy(Point::new(1, 0), RuneId(1), None, None);
        assert_eq!(update_connections(&mut grid), 0);
        assert!(grid.iter().all(|cell| !cell.is_connected));
    }

    #[test]
    fn chain_reaches_orthogonal_neighbours_only() {
        let mut grid = grid_with_special(3, 3, Point::new(1, 1));
        grid.occupy(Point::new(1, 1), RuneId(1), None, None);
        grid.occupy(Point::new(1, 0), RuneId(2), None, None);
        grid.occupy(Point::new(0, 0), RuneId(2), None, None);
        // diagonal only, never reached
        grid.occupy(Point::new(2, 2), RuneId(3), None, None);

        assert_eq!(update_connections(&mut grid), 2);
        assert!(grid.cell_at(Point::new(0, 0)).unwrap().is_connected);
        assert!(!grid.cell_at(Point::new(2, 2)).unwrap().is_connected);
        assert!(!grid.is_rune_connected(RuneId(3)));
    }

    #[test]
    fn fixed_occupied_core_powers_its_neighbours() {
        let mut layout = GridLayout::rectangle(CharacterClass::Ares, 3, 1);
        if let Some(cell) = layout.cell_mut(Point::new(0, 0)) {
            *cell = LayoutCell::open(0, 0).special().filled(RuneId::NONE);
        }
        let (mut grid, _) = BoardGrid::from_layout(&layout);
        assert_eq!(update_connections(&mut grid), 0);
        assert!(grid.cell_at(Point::new(0, 0)).unwrap().is_connected);

        grid.occupy(Point::new(1, 0), RuneId(5), None, None);
        assert_eq!(update_connections(&mut grid), 1);
    }

    #[test]
    fn recomputing_clears_stale_connections() {
        let mut grid = grid_with_special(2, 1, Point::new(0, 0));
        grid.occupy(Point::new(0, 0), RuneId(1), None, None);
        grid.occupy(Point::new(1, 0), RuneId(2), None, None);
        assert_eq!(update_connections(&mut grid), 2);

        grid.vacate(Point::new(0, 0));
        assert_eq!(update_connections(&mut grid), 0);
        assert!(!grid.cell_at(Point::new(1, 0)).unwrap().is_connected);
    }

    #[test]
    fn large_board_does_not_recurse() {
        let mut grid = grid_with_special(200, 200, Point::new(0, 0));
        for y in 0..200 {
            for x in 0..200 {
                grid.occupy(Point::new(x, y), RuneId(7), None, None);
            }
        }
        assert_eq!(update_connections(&mut grid), 1);
        assert!(grid.iter().all(|cell| cell.is_connected));
    }

    #[test]
    fn layout_without_special_cell_is_unpowered() {
        let layout = GridLayout::rectangle(CharacterClass::Chan, 2, 2);
        let (mut grid, _) = BoardGrid::from_layout(&layout);
        grid.occupy(Point::new(0, 0), RuneId(1), None, None);
        assert_eq!(update_connections(&mut grid), 0);
    }
}
