//! Dungeon generation
//!
//! Grid substrate, rooms, the seed footprint, the growth carver and the
//! passes that run after it (cleanup, distance bands, indexing).

mod biome;
mod cell;
mod cleanup;
mod footprint;
mod grid;
mod growth;
mod index;
mod pathfind;
mod rect;
mod room;

pub use biome::{
    BandAssignment, BiomeBand, DistanceMetric, assign_distance_bands, growth_tree_distances,
    spanning_tree_distances,
};
pub use cell::{CellKind, CorridorKind, FloorKind};
pub use cleanup::remove_dangling_corridors;
pub use footprint::{
    DEFAULT_FOOTPRINT, FootprintProvider, NoDigMask, SeedFootprint, SeedStamp, stamp_footprint,
};
pub use grid::Grid;
pub use growth::{
    Front, GrowthOutcome, GrowthStats, Palette, candidate_rect, door_cells,
    extend_degenerate_path, grow_rooms, sample_corridor_len, sample_room_extent,
    sample_target_count,
};
pub use index::{CellFeatures, CorridorComponent, CorridorId, DungeonMapIndex, RoomIndex};
pub use pathfind::{PathConstraints, find_corridor_path};
pub use rect::{Dir, Pos, Rect};
pub use room::{Room, RoomId, RoomInfo};
