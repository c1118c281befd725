//! Candidate ordering for placers

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::dungeon::{Pos, RoomInfo};
use crate::rng::DungeonRng;

/// Where in a room a placer prefers to put things
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PlacementStrategy {
    /// Corner anchors only
    Corner,
    /// Edge band, corners last
    Wall,
    /// Cells away from the walls; falls back to the edge band in narrow rooms
    #[default]
    Interior,
}

/// Free cells of a room in the order a placer should try them
///
/// Each group is shuffled on its own, so a strategy's preference survives
/// the randomisation. Occupied cells are never returned.
pub fn order_candidates(strategy: PlacementStrategy, info: &RoomInfo, rng: &mut DungeonRng) -> Vec<Pos> {
    let free = |p: &&Pos| !info.occupied.contains(*p);

    let groups: Vec<Vec<Pos>> = match strategy {
        PlacementStrategy::Corner => vec![info.corner_anchors.iter().filter(free).copied().collect()],
        PlacementStrategy::Wall => vec![
            info.edge_band
                .iter()
                .filter(free)
                .filter(|p| !info.corner_anchors.contains(*p))
                .copied()
                .collect(),
            info.corner_anchors.iter().filter(free).copied().collect(),
        ],
        PlacementStrategy::Interior => vec![
            info.interior
                .iter()
                .filter(free)
                .filter(|p| !info.edge_band.contains(*p))
                .copied()
                .collect(),
            info.edge_band.iter().filter(free).copied().collect(),
        ],
    };

    let mut ordered = Vec::new();
    for mut group in groups {
        rng.shuffle(&mut group);
        ordered.extend(group);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{CellKind, FloorKind, Grid, Rect, RoomId};
    use std::collections::BTreeSet;
    use std::str::FromStr;

    fn info(bounds: Rect) -> RoomInfo {
        let mut grid = Grid::new(20, 20);
        grid.carve_room(&bounds, CellKind::Floor(FloorKind::Stone));
        RoomInfo::build_from_grid(&mut grid, RoomId(0), &bounds, 2)
    }

    #[test]
    fn test_corner_strategy() {
        let info = info(Rect::new(2, 2, 8, 8));
        let mut rng = DungeonRng::new(1);
        let cells = order_candidates(PlacementStrategy::Corner, &info, &mut rng);
        let set: BTreeSet<_> = cells.iter().copied().collect();
        assert_eq!(set, info.corner_anchors);
        assert_eq!(cells.len(), 4);
    }

    #[test]
    fn test_wall_strategy_puts_corners_last() {
        let info = info(Rect::new(2, 2, 8, 8));
        let mut rng = DungeonRng::new(2);
        let cells = order_candidates(PlacementStrategy::Wall, &info, &mut rng);
        assert_eq!(cells.len(), info.edge_band.len());
        let tail: BTreeSet<_> = cells[cells.len() - 4..].iter().copied().collect();
        assert_eq!(tail, info.corner_anchors);
    }

    #[test]
    fn test_interior_prefers_deep_cells() {
        let info = info(Rect::new(2, 2, 8, 8));
        let mut rng = DungeonRng::new(3);
        let cells = order_candidates(PlacementStrategy::Interior, &info, &mut rng);
        assert_eq!(cells.len(), info.interior.len());
        // 7x7 room with a 2-wide band leaves a 3x3 core
        assert!(cells[..9].iter().all(|p| !info.edge_band.contains(p)));
    }

    #[test]
    fn test_narrow_room_falls_back_to_band() {
        let info = info(Rect::new(2, 2, 5, 3));
        let mut rng = DungeonRng::new(4);
        let cells = order_candidates(PlacementStrategy::Interior, &info, &mut rng);
        assert_eq!(cells.len(), 8);
    }

    #[test]
    fn test_occupied_cells_are_skipped() {
        let mut info = info(Rect::new(2, 2, 8, 8));
        assert!(info.try_claim(Pos::new(2, 2)));
        let mut rng = DungeonRng::new(5);
        let cells = order_candidates(PlacementStrategy::Corner, &info, &mut rng);
        assert_eq!(cells.len(), 3);
        assert!(!cells.contains(&Pos::new(2, 2)));
    }

    #[test]
    fn test_same_seed_same_order() {
        let info = info(Rect::new(2, 2, 8, 8));
        let a = order_candidates(PlacementStrategy::Wall, &info, &mut DungeonRng::new(9));
        let b = order_candidates(PlacementStrategy::Wall, &info, &mut DungeonRng::new(9));
        assert_eq!(a, b);
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(PlacementStrategy::from_str("corner").unwrap(), PlacementStrategy::Corner);
        assert_eq!(PlacementStrategy::Wall.to_string(), "wall");
    }
}
