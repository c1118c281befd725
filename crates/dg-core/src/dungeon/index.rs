//! Read-only spatial index over a finished dungeon
//!
//! Built once from the final grid and rooms, after every room's
//! [`RoomInfo`](super::room::RoomInfo) has been derived. Nothing here is
//! updated in place: a new build produces a new index.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::fmt;

use bitflags::bitflags;
use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::rect::{Pos, Rect};
use super::room::{Room, RoomId};

/// Connected corridor component identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorridorId(pub u32);

impl fmt::Display for CorridorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "corridor#{}", self.0)
    }
}

bitflags! {
    /// What a cell is, as far as placers are concerned
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CellFeatures: u8 {
        const ROOM = 0x01;
        const EDGE = 0x02;
        const CORNER = 0x04;
        const ENTRANCE = 0x08;
        const CORRIDOR = 0x10;
        const WALL = 0x20;
        const WALL_RING = 0x40;
    }
}

impl Serialize for CellFeatures {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CellFeatures {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(CellFeatures::from_bits_truncate(bits))
    }
}

/// One 4-connected group of corridor cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorridorComponent {
    pub id: CorridorId,
    /// Cells in discovery order
    pub cells: Vec<Pos>,
    /// Rooms with an interior cell next to this component
    pub touching_rooms: BTreeSet<RoomId>,
}

/// Snapshot of one room merged with its derived sets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomIndex {
    pub id: RoomId,
    pub bounds: Rect,
    pub center: Pos,
    pub interior: BTreeSet<Pos>,
    pub edge_band: BTreeSet<Pos>,
    pub corner_anchors: BTreeSet<Pos>,
    pub entrances: BTreeSet<Pos>,
    pub occupied: BTreeSet<Pos>,
    /// Wall cells immediately outside the bounds, clockwise from the top-left.
    /// Corridor cells touching the room are not part of the ring.
    pub wall_ring: Vec<Pos>,
}

/// Map-wide lookup tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DungeonMapIndex {
    width: i32,
    height: i32,
    room_ids: Vec<Option<RoomId>>,
    corridor_ids: Vec<Option<CorridorId>>,
    corridors: Vec<CorridorComponent>,
    walls: HashSet<Pos>,
    features: Vec<CellFeatures>,
    rooms: BTreeMap<RoomId, RoomIndex>,
}

impl DungeonMapIndex {
    /// Index `grid` and `rooms`. Neither input is modified.
    pub fn build(grid: &Grid, rooms: &[Room]) -> Self {
        let width = grid.width();
        let height = grid.height();
        let len = (width * height) as usize;

        let mut index = DungeonMapIndex {
            width,
            height,
            room_ids: Vec::with_capacity(len),
            corridor_ids: vec![None; len],
            corridors: Vec::new(),
            walls: HashSet::new(),
            features: vec![CellFeatures::empty(); len],
            rooms: BTreeMap::new(),
        };

        for p in grid.positions() {
            let id = grid.room_id(p);
            index.room_ids.push(id);
            if grid.kind_or_wall(p).is_wall() {
                index.walls.insert(p);
                index.flag(p, CellFeatures::WALL);
            }
        }

        index.label_corridors(grid);

        for room in rooms {
            let info = &room.info;
            let wall_ring: Vec<Pos> = room
                .bounds()
                .outer_ring()
                .into_iter()
                .filter(|&p| grid.kind(p).is_some_and(|k| k.is_wall()))
                .collect();

            for &p in &info.interior {
                index.flag(p, CellFeatures::ROOM);
            }
            for &p in &info.edge_band {
                index.flag(p, CellFeatures::EDGE);
            }
            for &p in &info.corner_anchors {
                index.flag(p, CellFeatures::CORNER);
            }
            for &p in &info.entrances {
                index.flag(p, CellFeatures::ENTRANCE);
            }
            for &p in &wall_ring {
                index.flag(p, CellFeatures::WALL_RING);
            }

            index.rooms.insert(
                room.id(),
                RoomIndex {
                    id: room.id(),
                    bounds: room.bounds(),
                    center: room.center(),
                    interior: info.interior.clone(),
                    edge_band: info.edge_band.clone(),
                    corner_anchors: info.corner_anchors.clone(),
                    entrances: info.entrances.clone(),
                    occupied: info.occupied.iter().copied().collect(),
                    wall_ring,
                },
            );
        }

        index
    }

    /// Flood-fill corridor components in row-major discovery order
    fn label_corridors(&mut self, grid: &Grid) {
        for start in grid.positions() {
            let Some(i) = self.idx(start) else {
                continue;
            };
            if self.corridor_ids[i].is_some() || !grid.kind_or_wall(start).is_corridor() {
                continue;
            }

            let id = CorridorId(self.corridors.len() as u32);
            let mut component = CorridorComponent {
                id,
                cells: Vec::new(),
                touching_rooms: BTreeSet::new(),
            };
            let mut queue = VecDeque::new();
            self.corridor_ids[i] = Some(id);
            queue.push_back(start);

            while let Some(cur) = queue.pop_front() {
                component.cells.push(cur);
                self.flag(cur, CellFeatures::CORRIDOR);
                for (next, kind) in grid.neighbors4(cur) {
                    if let Some(room) = grid.room_id(next) {
                        component.touching_rooms.insert(room);
                    }
                    if !kind.is_corridor() {
                        continue;
                    }
                    let Some(j) = self.idx(next) else {
                        continue;
                    };
                    if self.corridor_ids[j].is_none() {
                        self.corridor_ids[j] = Some(id);
                        queue.push_back(next);
                    }
                }
            }

            self.corridors.push(component);
        }
    }

    fn idx(&self, p: Pos) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height {
            Some((p.y * self.width + p.x) as usize)
        } else {
            None
        }
    }

    fn flag(&mut self, p: Pos, f: CellFeatures) {
        if let Some(i) = self.idx(p) {
            self.features[i] |= f;
        }
    }

    pub const fn width(&self) -> i32 {
        self.width
    }

    pub const fn height(&self) -> i32 {
        self.height
    }

    pub fn room_at(&self, p: Pos) -> Option<RoomId> {
        self.idx(p).and_then(|i| self.room_ids[i])
    }

    pub fn corridor_at(&self, p: Pos) -> Option<CorridorId> {
        self.idx(p).and_then(|i| self.corridor_ids[i])
    }

    /// Feature flags at `p` (empty outside the map)
    pub fn features(&self, p: Pos) -> CellFeatures {
        self.idx(p).map(|i| self.features[i]).unwrap_or_default()
    }

    pub fn is_wall(&self, p: Pos) -> bool {
        self.walls.contains(&p)
    }

    /// Every `Wall` cell of the grid. Only solid wall counts: corridor
    /// cells are walkable and never appear here, nor does prefab floor.
    pub fn walls(&self) -> &HashSet<Pos> {
        &self.walls
    }

    pub fn room(&self, id: RoomId) -> Option<&RoomIndex> {
        self.rooms.get(&id)
    }

    /// Rooms in id order
    pub fn rooms(&self) -> impl Iterator<Item = &RoomIndex> {
        self.rooms.values()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn corridor(&self, id: CorridorId) -> Option<&CorridorComponent> {
        self.corridors.get(id.0 as usize)
    }

    pub fn corridors(&self) -> &[CorridorComponent] {
        &self.corridors
    }

    /// Cells carrying every flag in `f`, in row-major order
    pub fn cells_with(&self, f: CellFeatures) -> impl Iterator<Item = Pos> + '_ {
        let width = self.width;
        self.features.iter().enumerate().filter_map(move |(i, feats)| {
            feats
                .contains(f)
                .then(|| Pos::new(i as i32 % width, i as i32 / width))
        })
    }
}
