//! Post-carve cleanup of dangling corridor stubs

use tracing::debug;

use super::cell::CellKind;
use super::grid::Grid;
use super::rect::Pos;

/// Turn isolated corridor cells back into wall until nothing changes
///
/// A corridor cell is isolated when none of its orthogonal neighbours is a
/// corridor or room floor. Removing one can isolate the next, so the whole
/// grid is rescanned after every pass that changed something. Returns the
/// number of cells removed.
pub fn remove_dangling_corridors(grid: &mut Grid) -> usize {
    let mut removed = 0;
    let mut passes = 0;
    loop {
        passes += 1;
        let stubs: Vec<Pos> = grid
            .positions()
            .filter(|&p| grid.kind(p).is_some_and(|k| k.is_corridor()) && is_isolated(grid, p))
            .collect();
        if stubs.is_empty() {
            break;
        }
        for p in &stubs {
            grid.set_kind(*p, CellKind::Wall);
        }
        removed += stubs.len();
    }
    if removed > 0 {
        debug!(removed, passes, "removed dangling corridor cells");
    }
    removed
}

fn is_isolated(grid: &Grid, p: Pos) -> bool {
    !grid
        .neighbors4(p)
        .any(|(_, k)| k.is_corridor() || k.is_room_floor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::cell::{CorridorKind, FloorKind};
    use crate::dungeon::rect::Rect;

    const CORRIDOR: CellKind = CellKind::Corridor(CorridorKind::Dirt);

    #[test]
    fn test_isolated_cell_becomes_wall() {
        let mut grid = Grid::new(7, 7);
        grid.set_kind(Pos::new(3, 3), CORRIDOR);

        assert_eq!(remove_dangling_corridors(&mut grid), 1);
        assert_eq!(grid.kind(Pos::new(3, 3)), Some(CellKind::Wall));

        // Fixed point: a second run changes nothing
        let before = grid.clone();
        assert_eq!(remove_dangling_corridors(&mut grid), 0);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_connected_corridors_survive() {
        let mut grid = Grid::new(10, 6);
        grid.carve_room(&Rect::new(1, 1, 3, 3), CellKind::Floor(FloorKind::Stone));
        for x in 4..8 {
            grid.set_kind(Pos::new(x, 2), CORRIDOR);
        }
        assert_eq!(remove_dangling_corridors(&mut grid), 0);
        assert_eq!(grid.count(|k| k.is_corridor()), 4);
    }

    #[test]
    fn test_corridor_next_to_room_survives_alone() {
        let mut grid = Grid::new(8, 8);
        grid.carve_room(&Rect::new(2, 2, 4, 4), CellKind::FloorPrefab);
        grid.set_kind(Pos::new(5, 3), CORRIDOR);
        assert_eq!(remove_dangling_corridors(&mut grid), 0);
    }

    #[test]
    fn test_pairs_are_not_isolated() {
        // Two touching corridor cells each have a corridor neighbour
        let mut grid = Grid::new(6, 6);
        grid.set_kind(Pos::new(2, 2), CORRIDOR);
        grid.set_kind(Pos::new(3, 2), CORRIDOR);
        assert_eq!(remove_dangling_corridors(&mut grid), 0);
    }

    #[test]
    fn test_edge_cells_are_handled() {
        let mut grid = Grid::new(4, 4);
        grid.set_kind(Pos::new(0, 0), CORRIDOR);
        grid.set_kind(Pos::new(3, 3), CORRIDOR);
        assert_eq!(remove_dangling_corridors(&mut grid), 2);
        assert_eq!(grid.count(|k| k.is_corridor()), 0);
    }
}
