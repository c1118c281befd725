//! Rooms and their derived feature sets
//!
//! A [`Room`] is fixed once carved: id, bounds and growth metadata never
//! change. Its [`RoomInfo`] is derived from the grid and rebuilt with
//! [`RoomInfo::build_from_grid`] after the surrounding region is final.

use std::collections::BTreeSet;
use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::cell::FloorKind;
use super::grid::Grid;
use super::rect::{Dir, Pos, Rect};

/// Room identifier (index into the dungeon's room list)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub u32);

impl RoomId {
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// A carved room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    id: RoomId,
    bounds: Rect,
    center: Pos,
    /// Room whose growth front produced this one (`None` for the first room)
    parent: Option<RoomId>,
    /// Direction the corridor travelled to reach this room
    grown: Dir,
    /// Number of rooms between this one and the seed
    depth: u32,
    floor: FloorKind,
    /// Derived feature sets
    pub info: RoomInfo,
}

impl Room {
    pub fn new(
        id: RoomId,
        bounds: Rect,
        parent: Option<RoomId>,
        grown: Dir,
        depth: u32,
        floor: FloorKind,
    ) -> Self {
        Self {
            id,
            bounds,
            center: bounds.center(),
            parent,
            grown,
            depth,
            floor,
            info: RoomInfo::default(),
        }
    }

    pub const fn id(&self) -> RoomId {
        self.id
    }

    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    pub const fn center(&self) -> Pos {
        self.center
    }

    pub const fn parent(&self) -> Option<RoomId> {
        self.parent
    }

    pub const fn grown(&self) -> Dir {
        self.grown
    }

    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Floor kind the room was carved with
    pub const fn floor(&self) -> FloorKind {
        self.floor
    }

    pub fn contains(&self, p: Pos) -> bool {
        self.bounds.contains_pos(p)
    }

    /// Check if this room overlaps another once both are grown by `buffer`
    pub fn overlaps(&self, other: &Room, buffer: i32) -> bool {
        self.bounds.expand(buffer).intersects(&other.bounds)
    }

    /// Rebuild this room's feature sets from the grid
    pub fn rebuild_info(&mut self, grid: &mut Grid, edge_band: i32) {
        self.info = RoomInfo::build_from_grid(grid, self.id, &self.bounds, edge_band);
    }
}

/// Feature sets derived from the grid for one room
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    /// Floor cells inside the room's bounds
    pub interior: BTreeSet<Pos>,
    /// Interior cells within the band width of a room wall
    pub edge_band: BTreeSet<Pos>,
    /// Edge-band cells touching two perpendicular non-walkable neighbours
    pub corner_anchors: BTreeSet<Pos>,
    /// Interior cells next to a corridor cell
    pub entrances: BTreeSet<Pos>,
    /// Cells claimed by a placer. Check before claiming.
    pub occupied: HashSet<Pos>,
}

impl RoomInfo {
    /// Derive every feature set for the room at `bounds` and stamp `id` onto
    /// the grid's room-id layer for each interior cell.
    ///
    /// `occupied` starts empty.
    pub fn build_from_grid(grid: &mut Grid, id: RoomId, bounds: &Rect, edge_band: i32) -> Self {
        let mut info = RoomInfo::default();

        for p in bounds.cells() {
            if grid.kind(p).is_some_and(|k| k.is_room_floor()) {
                info.interior.insert(p);
                grid.set_room_id(p, Some(id));
            }
        }

        for &p in &info.interior {
            if distance_to_wall(grid, p, edge_band) < edge_band {
                info.edge_band.insert(p);
            }

            let blocked = |d: Dir| !grid.kind_or_wall(p.step(d)).is_walkable();
            let vertical = blocked(Dir::Up) || blocked(Dir::Down);
            let horizontal = blocked(Dir::Left) || blocked(Dir::Right);
            if vertical && horizontal {
                info.corner_anchors.insert(p);
            }

            if grid.neighbors4(p).any(|(_, k)| k.is_corridor()) {
                info.entrances.insert(p);
            }
        }

        // Corners are by construction in the edge band; keep the subset exact
        // for narrow bands.
        info.corner_anchors.retain(|p| info.edge_band.contains(p));
        info
    }

    pub fn is_occupied(&self, p: Pos) -> bool {
        self.occupied.contains(&p)
    }

    /// Claim an interior cell. Returns false if it is outside the room or
    /// already taken.
    pub fn try_claim(&mut self, p: Pos) -> bool {
        if !self.interior.contains(&p) {
            return false;
        }
        self.occupied.insert(p)
    }

    /// Interior cells nobody has claimed, in sorted order
    pub fn free_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.interior.iter().copied().filter(|p| !self.occupied.contains(p))
    }

    /// True if `p` is an entrance or next to one
    pub fn near_entrance(&self, p: Pos) -> bool {
        self.entrances.contains(&p) || p.neighbors4().iter().any(|n| self.entrances.contains(n))
    }
}

/// Orthogonal distance from `p` to the nearest non-floor cell, capped at `cap`
fn distance_to_wall(grid: &Grid, p: Pos, cap: i32) -> i32 {
    let mut best = cap;
    for d in [Dir::Up, Dir::Down, Dir::Left, Dir::Right] {
        for step in 1..=cap {
            if !grid.kind_or_wall(p.offset(d, step)).is_room_floor() {
                best = best.min(step - 1);
                break;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::cell::{CellKind, CorridorKind};

    fn carved(bounds: Rect) -> Grid {
        let mut grid = Grid::new(20, 20);
        grid.carve_room(&bounds, CellKind::Floor(FloorKind::Stone));
        grid
    }

    #[test]
    fn test_room_identity() {
        let room = Room::new(RoomId(2), Rect::new(4, 4, 8, 7), Some(RoomId(1)), Dir::Left, 3, FloorKind::Moss);
        assert_eq!(room.id(), RoomId(2));
        assert_eq!(room.center(), Pos::new(6, 5));
        assert_eq!(room.parent(), Some(RoomId(1)));
        assert_eq!(room.grown(), Dir::Left);
        assert_eq!(room.depth(), 3);
        assert!(room.contains(Pos::new(8, 7)));
        assert!(!room.contains(Pos::new(9, 7)));
    }

    #[test]
    fn test_overlaps_with_buffer() {
        let a = Room::new(RoomId(0), Rect::new(2, 2, 5, 5), None, Dir::Down, 1, FloorKind::Generic);
        let b = Room::new(RoomId(1), Rect::new(8, 2, 10, 5), None, Dir::Down, 1, FloorKind::Generic);
        assert!(!a.overlaps(&b, 2));
        assert!(a.overlaps(&b, 3));
    }

    #[test]
    fn test_interior_and_room_ids() {
        let bounds = Rect::new(5, 5, 10, 9);
        let mut grid = carved(bounds);
        let info = RoomInfo::build_from_grid(&mut grid, RoomId(7), &bounds, 2);

        assert_eq!(info.interior.len(), 30);
        assert_eq!(grid.room_id(Pos::new(5, 5)), Some(RoomId(7)));
        assert_eq!(grid.room_id(Pos::new(4, 5)), None);
    }

    #[test]
    fn test_edge_band_width() {
        // 6x5 room: with band 2 only the two centre cells of the middle row are deep
        let bounds = Rect::new(5, 5, 10, 9);
        let mut grid = carved(bounds);
        let info = RoomInfo::build_from_grid(&mut grid, RoomId(0), &bounds, 2);

        let deep: Vec<_> = info.interior.difference(&info.edge_band).copied().collect();
        assert_eq!(deep, vec![Pos::new(7, 7), Pos::new(8, 7)]);

        let band1 = RoomInfo::build_from_grid(&mut grid, RoomId(0), &bounds, 1);
        assert_eq!(band1.edge_band.len(), 2 * 6 + 2 * 3);
    }

    #[test]
    fn test_corner_anchors() {
        let bounds = Rect::new(5, 5, 10, 9);
        let mut grid = carved(bounds);
        let info = RoomInfo::build_from_grid(&mut grid, RoomId(0), &bounds, 2);

        let corners: Vec<_> = info.corner_anchors.iter().copied().collect();
        assert_eq!(
            corners,
            vec![Pos::new(5, 5), Pos::new(5, 9), Pos::new(10, 5), Pos::new(10, 9)]
        );
    }

    #[test]
    fn test_entrances_subset_of_interior() {
        let bounds = Rect::new(5, 5, 10, 9);
        let mut grid = carved(bounds);
        let corridor = CellKind::Corridor(CorridorKind::Dirt);
        grid.set_kind(Pos::new(7, 4), corridor);
        grid.set_kind(Pos::new(7, 3), corridor);
        grid.set_kind(Pos::new(11, 8), corridor);

        let info = RoomInfo::build_from_grid(&mut grid, RoomId(0), &bounds, 2);
        let entrances: Vec<_> = info.entrances.iter().copied().collect();
        assert_eq!(entrances, vec![Pos::new(7, 5), Pos::new(10, 8)]);
        assert!(info.entrances.is_subset(&info.interior));
        assert!(info.near_entrance(Pos::new(8, 5)));
        assert!(!info.near_entrance(Pos::new(8, 7)));
    }

    #[test]
    fn test_claims_are_unique_and_reset_on_rebuild() {
        let bounds = Rect::new(5, 5, 8, 8);
        let mut grid = carved(bounds);
        let mut info = RoomInfo::build_from_grid(&mut grid, RoomId(0), &bounds, 2);

        assert!(info.try_claim(Pos::new(6, 6)));
        assert!(!info.try_claim(Pos::new(6, 6)));
        assert!(!info.try_claim(Pos::new(1, 1)));
        assert!(info.is_occupied(Pos::new(6, 6)));
        assert_eq!(info.free_cells().count(), 15);

        let rebuilt = RoomInfo::build_from_grid(&mut grid, RoomId(0), &bounds, 2);
        assert!(rebuilt.occupied.is_empty());
    }
}
