//! Default generation constants
//!
//! Configuration defaults are taken from here; see `config.rs`.

/// Default map dimensions
pub const DEFAULT_MAP_WIDTH: i32 = 64;
pub const DEFAULT_MAP_HEIGHT: i32 = 48;

/// Largest map accepted, in cells
pub const MAX_MAP_CELLS: i32 = 1 << 22;

/// Room count used when no valid range is configured
pub const FALLBACK_ROOM_COUNT: u32 = 10;

/// Placement attempts per growth front before it is dropped
pub const PLACEMENT_TRIES: u32 = 8;

/// Room extents (per axis, interior cells)
pub const MIN_ROOM_EXTENT: i32 = 4;
pub const MAX_ROOM_EXTENT: i32 = 8;

/// Corridor stub lengths
pub const MIN_CORRIDOR_LEN: i32 = 2;
pub const MAX_CORRIDOR_LEN: i32 = 6;

/// Cells kept clear between a room and the map edge
pub const BORDER_MARGIN: i32 = 2;

/// Cells around a candidate room that must still be solid wall
pub const COLLISION_MARGIN: i32 = 2;

/// Un-carvable margin around the seed footprint
pub const NO_DIG_MARGIN: i32 = 2;

/// Width of the edge band inside a room
pub const EDGE_BAND_WIDTH: i32 = 2;

/// Door placement: max offset from the anchor axis, and inset from corners
pub const DOOR_JITTER: i32 = 2;
pub const DOOR_CORNER_INSET: i32 = 1;

/// Sampling biases
pub const BIAS_SMALL_ROOMS: f32 = 0.35;
pub const LARGE_ROOM_CHANCE: f32 = 0.1;
pub const BIAS_SHORT_CORRIDORS: f32 = 0.5;
pub const OPENING_KEEP_CHANCE: f32 = 0.75;
pub const DEPTH_FIRST_PUSH_BACK_CHANCE: f32 = 0.8;
