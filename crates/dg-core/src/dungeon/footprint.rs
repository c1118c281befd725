//! Seed footprint: the fixed special room every dungeon grows from
//!
//! The footprint is stamped near the middle of the map, its entrance is
//! located, and a no-dig halo is built around it so that growth never cuts
//! into the prefab. Only the entrance seam is left carvable.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::GenError;

use super::cell::{CellKind, CorridorKind};
use super::grid::Grid;
use super::rect::{Pos, Rect};

/// Built-in footprint used when no template is supplied
pub const DEFAULT_FOOTPRINT: &str = "\
###########
#.........#
#..#...#..#
#.........#
#..#...#..#
#.........#
#####+#####";

/// Ground/wall layers of the seed room, in local coordinates
/// (the footprint's top-left is `(0, 0)`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedFootprint {
    pub width: i32,
    pub height: i32,
    /// Ground-layer floor cells
    pub ground: Vec<Pos>,
    /// Ground-layer cells tagged as corridor (entrance candidates)
    pub corridor_tiles: Vec<Pos>,
    /// Wall-layer cells
    pub walls: Vec<Pos>,
}

/// Source of the seed footprint (tilemap importer, prefab loader, ...)
pub trait FootprintProvider {
    fn footprint(&self) -> Option<SeedFootprint>;
}

impl FootprintProvider for SeedFootprint {
    fn footprint(&self) -> Option<SeedFootprint> {
        Some(self.clone())
    }
}

impl SeedFootprint {
    /// Parse a footprint template: `#` wall, `.` floor, `+` corridor tile,
    /// anything else is void.
    pub fn from_ascii(template: &str) -> Self {
        let mut fp = SeedFootprint {
            width: 0,
            height: 0,
            ground: Vec::new(),
            corridor_tiles: Vec::new(),
            walls: Vec::new(),
        };
        for (y, line) in template.lines().enumerate() {
            let y = y as i32;
            fp.height = y + 1;
            for (x, ch) in line.chars().enumerate() {
                let x = x as i32;
                fp.width = fp.width.max(x + 1);
                let p = Pos::new(x, y);
                match ch {
                    '#' => fp.walls.push(p),
                    '.' => fp.ground.push(p),
                    '+' => fp.corridor_tiles.push(p),
                    _ => {}
                }
            }
        }
        fp
    }

    pub fn builtin() -> Self {
        Self::from_ascii(DEFAULT_FOOTPRINT)
    }

    /// Local bounding rectangle
    pub const fn bounds(&self) -> Rect {
        Rect::from_size(0, 0, self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// The canonical entrance tile in local coordinates: the left-most
    /// corridor tile on the bottom edge. Corridor tiles elsewhere have no
    /// outside cell below them and are never used as the entrance.
    pub fn entrance_tile(&self) -> Option<Pos> {
        let bottom = self.height - 1;
        self.corridor_tiles
            .iter()
            .copied()
            .filter(|p| p.y == bottom)
            .min_by_key(|p| p.x)
    }
}

/// Cells that may never be carved: the footprint expanded by a margin,
/// minus the punched entrance seam
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoDigMask {
    area: Option<Rect>,
    exceptions: HashSet<Pos>,
}

impl NoDigMask {
    /// A mask that forbids nothing
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(area: Rect) -> Self {
        Self {
            area: Some(area),
            exceptions: HashSet::new(),
        }
    }

    /// Make a cell carvable again
    pub fn punch(&mut self, p: Pos) {
        self.exceptions.insert(p);
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    pub fn contains(&self, p: Pos) -> bool {
        match self.area {
            Some(area) => area.contains_pos(p) && !self.exceptions.contains(&p),
            None => false,
        }
    }

    pub fn is_punched(&self, p: Pos) -> bool {
        self.exceptions.contains(&p)
    }
}

/// Result of stamping the footprint onto a grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedStamp {
    /// Footprint rectangle in map coordinates
    pub bounds: Rect,
    /// Entrance cell in map coordinates
    pub entrance: Pos,
    /// True if no bottom-edge corridor tile was found and bottom-center was used
    pub used_fallback: bool,
    pub no_dig: NoDigMask,
}

impl SeedStamp {
    /// First growth front anchor: the cell just below the footprint,
    /// under the entrance
    pub fn first_anchor(&self) -> Pos {
        Pos::new(self.entrance.x, self.bounds.hy + 1)
    }
}

/// Stamp `footprint` centred on `grid` and build its no-dig halo
pub fn stamp_footprint(
    grid: &mut Grid,
    footprint: &SeedFootprint,
    corridor: CorridorKind,
    no_dig_margin: i32,
) -> Result<SeedStamp, GenError> {
    if footprint.is_empty() {
        return Err(GenError::MissingFootprint);
    }

    // The halo plus the first front must fit inside the map.
    let needed_w = footprint.width + 2 * no_dig_margin + 2;
    let needed_h = footprint.height + 2 * no_dig_margin + 2;
    if needed_w > grid.width() || needed_h > grid.height() {
        return Err(GenError::FootprintTooLarge {
            footprint_width: footprint.width,
            footprint_height: footprint.height,
            map_width: grid.width(),
            map_height: grid.height(),
        });
    }

    let ox = (grid.width() - footprint.width) / 2;
    let oy = (grid.height() - footprint.height) / 2;
    let bounds = footprint.bounds().translate(ox, oy);
    let to_map = |p: Pos| Pos::new(p.x + ox, p.y + oy);

    for &p in &footprint.ground {
        grid.set_kind(to_map(p), CellKind::FloorPrefab);
    }
    for &p in &footprint.corridor_tiles {
        grid.set_kind(to_map(p), CellKind::Corridor(corridor));
    }

    let (entrance, used_fallback) = match footprint.entrance_tile() {
        Some(tile) => (to_map(tile), false),
        None => {
            let fallback = Pos::new(bounds.lx + bounds.width() / 2, bounds.hy);
            warn!(
                x = fallback.x,
                y = fallback.y,
                "seed footprint has no corridor tile on its bottom edge, using bottom-center as entrance"
            );
            (fallback, true)
        }
    };
    grid.set_kind(entrance, CellKind::Corridor(corridor));

    let halo = bounds.expand(no_dig_margin);
    let mut no_dig = NoDigMask::new(halo);
    for y in entrance.y..=halo.hy {
        no_dig.punch(Pos::new(entrance.x, y));
    }

    Ok(SeedStamp {
        bounds,
        entrance,
        used_fallback,
        no_dig,
    })
}
