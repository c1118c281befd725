//! Grid cell kinds
//!
//! A cell is exactly one of: solid wall, a room floor variant, a corridor
//! variant, or the prefab floor of the seed footprint. Floor and corridor
//! variants are named in configuration files by their snake_case tag.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Room floor variant, selected by the biome profile or a distance band
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FloorKind {
    #[default]
    Generic,
    Stone,
    Moss,
    Sand,
    Ice,
    Ember,
    Crystal,
    Bone,
}

impl FloorKind {
    pub const fn symbol(self) -> char {
        match self {
            FloorKind::Generic | FloorKind::Stone => '.',
            FloorKind::Moss => ',',
            FloorKind::Sand => ':',
            FloorKind::Ice => '_',
            FloorKind::Ember => '^',
            FloorKind::Crystal => '*',
            FloorKind::Bone => '%',
        }
    }
}

/// Corridor variant
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CorridorKind {
    #[default]
    Dirt,
    Stone,
    Brick,
    Root,
}

/// Cell kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    #[default]
    Wall,
    Floor(FloorKind),
    Corridor(CorridorKind),
    /// Floor stamped from the seed footprint
    FloorPrefab,
}

impl CellKind {
    pub const fn is_wall(&self) -> bool {
        matches!(self, CellKind::Wall)
    }

    /// Room floor, including the seed footprint's prefab floor
    pub const fn is_room_floor(&self) -> bool {
        matches!(self, CellKind::Floor(_) | CellKind::FloorPrefab)
    }

    pub const fn is_corridor(&self) -> bool {
        matches!(self, CellKind::Corridor(_))
    }

    /// Anything an actor can stand on
    pub const fn is_walkable(&self) -> bool {
        !self.is_wall()
    }

    /// Get the display character for this cell kind
    pub const fn symbol(&self) -> char {
        match self {
            CellKind::Wall => '#',
            CellKind::Floor(f) => f.symbol(),
            CellKind::Corridor(_) => '+',
            CellKind::FloorPrefab => 'o',
        }
    }

    /// Tag string such as `wall`, `floor_moss` or `corridor_dirt`
    pub fn tag(&self) -> String {
        match self {
            CellKind::Wall => "wall".to_string(),
            CellKind::Floor(f) => format!("floor_{f}"),
            CellKind::Corridor(c) => format!("corridor_{c}"),
            CellKind::FloorPrefab => "floor_prefab".to_string(),
        }
    }
}
