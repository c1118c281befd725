//! Seeded growth: rooms and corridors grown outward from the seed entrance
//!
//! A queue of growth fronts is worked until it drains or the target room
//! count is reached. Each front tries a handful of randomly sized rooms at a
//! randomly sampled corridor distance; the first one that fits is connected
//! back to the front's anchor by a pathfound corridor and then carved.
//! A carved room opens new fronts on its down, left and right sides.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{GrowthConfig, IntRange};
use crate::rng::DungeonRng;

use super::cell::{CellKind, CorridorKind, FloorKind};
use super::footprint::{NoDigMask, SeedStamp};
use super::grid::Grid;
use super::pathfind::{PathConstraints, find_corridor_path};
use super::rect::{Dir, Pos, Rect};
use super::room::{Room, RoomId};

/// Directions a carved room opens new fronts in. Growth never goes up.
const OPENINGS: [Dir; 3] = [Dir::Down, Dir::Left, Dir::Right];

/// A pending growth site: a wall cell just outside a room (or below the
/// seed entrance) and the direction to grow in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Front {
    pub anchor: Pos,
    pub dir: Dir,
    /// Room the front opens from (`None` for the seed entrance)
    pub parent: Option<RoomId>,
    /// Depth the room grown from this front will have
    pub depth: u32,
}

/// Counters for one growth run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrowthStats {
    pub target: u32,
    pub placed: u32,
    pub fronts_popped: u32,
    pub fronts_skipped: u32,
    pub fronts_dropped: u32,
    pub rejected_candidates: u32,
    pub path_failures: u32,
}

/// Rooms carved by a growth run, in placement order
#[derive(Debug, Clone, Default)]
pub struct GrowthOutcome {
    pub rooms: Vec<Room>,
    pub stats: GrowthStats,
}

/// Kinds the carver paints with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub floor: FloorKind,
    pub corridor: CorridorKind,
}

/// Draw a room extent (width or height)
///
/// Uniform draw, then maybe the min of two draws to skew small, then maybe
/// an override from the upper half of the range. The draw order is fixed.
pub fn sample_room_extent(
    rng: &mut DungeonRng,
    extent: IntRange,
    bias_small: f32,
    large_chance: f32,
) -> i32 {
    let mut value = rng.range(extent.min, extent.max);
    if rng.chance(bias_small) {
        value = value.min(rng.range(extent.min, extent.max));
    }
    if rng.chance(large_chance) {
        value = rng.range(extent.mid(), extent.max);
    }
    value
}

/// Draw a corridor length, skewed short with probability `bias_short`
pub fn sample_corridor_len(rng: &mut DungeonRng, len: IntRange, bias_short: f32) -> i32 {
    let mut value = rng.range(len.min, len.max);
    if rng.chance(bias_short) {
        value = value.min(rng.range(len.min, len.max));
    }
    value
}

/// Number of rooms to grow: sampled once from the configured range, or the
/// fallback count when no usable range is configured
pub fn sample_target_count(rng: &mut DungeonRng, config: &GrowthConfig) -> u32 {
    match config.room_count_range() {
        Some(r) => rng.range(r.min.max(0), r.max).max(0) as u32,
        None => config.fallback_room_count,
    }
}

/// Candidate rect for a front: centred `corridor_len + half_extent + 1`
/// cells from the anchor along the growth direction
pub fn candidate_rect(front: &Front, width: i32, height: i32, corridor_len: i32) -> Rect {
    let half = if front.dir.is_vertical() { height / 2 } else { width / 2 };
    let center = front.anchor.offset(front.dir, corridor_len + half + 1);
    Rect::centered(center, width, height)
}

/// Door cell on the rect edge facing back toward the anchor
///
/// Aligned with the anchor's coordinate plus `jitter`, then pulled at least
/// `inset` cells away from the corners. Returns `(inside, outside)`.
pub fn door_cells(rect: &Rect, front: &Front, jitter: i32, inset: i32) -> (Pos, Pos) {
    let facing = front.dir.opposite();
    let inside = if front.dir.is_vertical() {
        let x = clamp_inward(front.anchor.x + jitter, rect.lx + inset, rect.hx - inset);
        let y = if facing == Dir::Up { rect.ly } else { rect.hy };
        Pos::new(x, y)
    } else {
        let y = clamp_inward(front.anchor.y + jitter, rect.ly + inset, rect.hy - inset);
        let x = if facing == Dir::Left { rect.lx } else { rect.hx };
        Pos::new(x, y)
    };
    (inside, inside.step(facing))
}

// Unlike `i32::clamp`, an inverted range collapses to its midpoint.
fn clamp_inward(v: i32, lo: i32, hi: i32) -> i32 {
    if lo > hi {
        return (lo + hi) / 2;
    }
    v.max(lo).min(hi)
}

/// Carve one extra corridor cell behind a zero-length corridor
///
/// The cell is `goal` stepped against `dir`. It is left alone if it is room
/// floor, no-dig or inside `forbidden`. Returns the carved cell.
pub fn extend_degenerate_path(
    grid: &mut Grid,
    goal: Pos,
    dir: Dir,
    forbidden: &Rect,
    no_dig: &NoDigMask,
    corridor: CorridorKind,
) -> Option<Pos> {
    let p = goal.step(dir.opposite());
    let kind = grid.kind(p)?;
    if kind.is_room_floor() || no_dig.contains(p) || forbidden.contains_pos(p) {
        return None;
    }
    grid.set_kind(p, CellKind::Corridor(corridor));
    Some(p)
}

/// Grow rooms from the seed entrance until the target count is reached or
/// no fronts remain
pub fn grow_rooms(
    grid: &mut Grid,
    stamp: &SeedStamp,
    config: &GrowthConfig,
    palette: Palette,
    rng: &mut DungeonRng,
) -> GrowthOutcome {
    let mut carver = Carver {
        grid,
        stamp,
        config,
        palette,
        rng,
        rooms: Vec::new(),
        stats: GrowthStats::default(),
    };
    carver.run();
    GrowthOutcome {
        rooms: carver.rooms,
        stats: carver.stats,
    }
}

struct Carver<'a> {
    grid: &'a mut Grid,
    stamp: &'a SeedStamp,
    config: &'a GrowthConfig,
    palette: Palette,
    rng: &'a mut DungeonRng,
    rooms: Vec<Room>,
    stats: GrowthStats,
}

impl Carver<'_> {
    fn run(&mut self) {
        let target = sample_target_count(self.rng, self.config);
        self.stats.target = target;

        let mut queue = VecDeque::new();
        queue.push_back(Front {
            anchor: self.stamp.first_anchor(),
            dir: Dir::Down,
            parent: None,
            depth: 1,
        });

        while (self.rooms.len() as u32) < target {
            let popped = if self.config.depth_first {
                queue.pop_back()
            } else {
                queue.pop_front()
            };
            let Some(front) = popped else {
                break;
            };
            self.stats.fronts_popped += 1;

            if front.dir == Dir::Up
                || !self.grid.in_bounds(front.anchor)
                || self.stamp.no_dig.contains(front.anchor)
            {
                self.stats.fronts_skipped += 1;
                continue;
            }

            match self.place_from(&front) {
                Some(room) => {
                    let openings = self.openings(&room, front.dir);
                    for opening in openings {
                        if !self.config.depth_first
                            || self.rng.chance(self.config.depth_first_push_back_chance)
                        {
                            queue.push_back(opening);
                        } else {
                            queue.push_front(opening);
                        }
                    }
                    self.rooms.push(room);
                    self.stats.placed += 1;
                }
                None => {
                    self.stats.fronts_dropped += 1;
                    debug!(
                        x = front.anchor.x,
                        y = front.anchor.y,
                        dir = %front.dir,
                        tries = self.config.placement_tries,
                        "dropped growth front"
                    );
                }
            }
        }

        info!(
            target,
            placed = self.stats.placed,
            dropped = self.stats.fronts_dropped,
            pending = queue.len(),
            depth_first = self.config.depth_first,
            "growth finished"
        );
    }

    /// Try to place and connect a room for `front`
    fn place_from(&mut self, front: &Front) -> Option<Room> {
        let cfg = self.config;
        for attempt in 0..cfg.placement_tries {
            let corridor_len = sample_corridor_len(self.rng, cfg.corridor_len, cfg.bias_short_corridors);
            let width = sample_room_extent(self.rng, cfg.room_extent, cfg.bias_small_rooms, cfg.large_room_chance);
            let height = sample_room_extent(self.rng, cfg.room_extent, cfg.bias_small_rooms, cfg.large_room_chance);
            let rect = candidate_rect(front, width, height, corridor_len);

            if !self.fits(&rect) {
                self.stats.rejected_candidates += 1;
                continue;
            }

            let jitter = self.rng.range(-cfg.door_jitter, cfg.door_jitter);
            let (door_inside, door_outside) = door_cells(&rect, front, jitter, cfg.door_corner_inset);

            let constraints = PathConstraints {
                forbidden: Some(rect),
                no_dig: &self.stamp.no_dig,
            };
            let Some(path) = find_corridor_path(self.grid, front.anchor, door_outside, &constraints) else {
                self.stats.path_failures += 1;
                debug!(attempt, x = door_outside.x, y = door_outside.y, "no corridor route to door");
                continue;
            };

            self.carve_connection(front, &rect, &path, door_inside, door_outside);
            self.grid.carve_room(&rect, CellKind::Floor(self.palette.floor));

            let id = RoomId(self.rooms.len() as u32);
            debug!(
                %id,
                lx = rect.lx,
                ly = rect.ly,
                width,
                height,
                corridor = path.len(),
                attempt,
                "carved room"
            );
            return Some(Room::new(id, rect, front.parent, front.dir, front.depth, self.palette.floor));
        }
        None
    }

    /// Inside the border, clear of the seed halo and surrounded by wall
    fn fits(&self, rect: &Rect) -> bool {
        let inner = self.grid.bounds().expand(-self.config.border_margin);
        if !inner.is_valid() || !inner.contains(rect) {
            return false;
        }
        if rect.intersects(&self.stamp.bounds) {
            return false;
        }
        if self.stamp.no_dig.area().is_some_and(|halo| halo.intersects(rect)) {
            return false;
        }
        self.grid.is_rect_clear_with_margin(rect, self.config.collision_margin)
    }

    fn carve_connection(&mut self, front: &Front, rect: &Rect, path: &[Pos], door_inside: Pos, door_outside: Pos) {
        let corridor = CellKind::Corridor(self.palette.corridor);
        for &p in path {
            self.grid.set_kind(p, corridor);
        }
        for p in [door_inside, door_outside, front.anchor] {
            if !self.stamp.no_dig.contains(p) {
                self.grid.set_kind(p, corridor);
            }
        }
        if path.is_empty() {
            extend_degenerate_path(
                self.grid,
                door_outside,
                front.dir,
                rect,
                &self.stamp.no_dig,
                self.palette.corridor,
            );
        }
    }

    /// New fronts on the sides of `room` other than the one it was entered from
    fn openings(&mut self, room: &Room, entered: Dir) -> Vec<Front> {
        let b = room.bounds();
        let c = room.center();
        let mut dirs: Vec<Dir> = OPENINGS.into_iter().filter(|&d| d != entered.opposite()).collect();
        if self.config.shuffle_openings {
            self.rng.shuffle(&mut dirs);
        }

        let mut fronts = Vec::with_capacity(dirs.len());
        for dir in dirs {
            if !self.rng.chance(self.config.opening_keep_chance) {
                continue;
            }
            let anchor = match dir {
                Dir::Down => Pos::new(c.x, b.hy + 1),
                Dir::Up => Pos::new(c.x, b.ly - 1),
                Dir::Left => Pos::new(b.lx - 1, c.y),
                Dir::Right => Pos::new(b.hx + 1, c.y),
            };
            fronts.push(Front {
                anchor,
                dir,
                parent: Some(room.id()),
                depth: room.depth() + 1,
            });
        }
        fronts
    }
}
