//! Generation configuration
//!
//! Every struct deserializes with defaults for missing fields, so a config
//! file only needs to name what it changes:
//!
//! ```json
//! { "growth": { "depth_first": true }, "profile": { "floor": "moss" } }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::dungeon::{BiomeBand, CorridorKind, DistanceMetric, FloorKind};
use crate::error::{ConfigError, GenError};
use crate::placement::{PropRule, PuzzleSpec, TrapConfig};

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntRange {
    pub min: i32,
    pub max: i32,
}

impl IntRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub const fn is_valid(&self) -> bool {
        self.min <= self.max
    }

    /// Lower bound of the upper half, used for "large" draws
    pub const fn mid(&self) -> i32 {
        (self.min + self.max + 1) / 2
    }
}

/// Parameters of the seeded growth carver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub width: i32,
    pub height: i32,

    /// Target room count range, sampled once per build
    pub room_count: Option<IntRange>,
    /// Used when `room_count` is absent or inverted
    pub fallback_room_count: u32,

    /// Interior width/height range, per axis
    pub room_extent: IntRange,
    pub corridor_len: IntRange,

    /// Probability of replacing a room extent with the min of two draws
    pub bias_small_rooms: f32,
    /// Probability of forcing a room extent into the upper half of the range
    pub large_room_chance: f32,
    /// Probability of replacing a corridor length with the min of two draws
    pub bias_short_corridors: f32,

    pub placement_tries: u32,

    /// Pop fronts LIFO ("corridor" look) instead of FIFO ("snake" look)
    pub depth_first: bool,
    /// Depth-first only: chance a new front goes to the back (popped next)
    pub depth_first_push_back_chance: f32,
    /// Chance each new opening of a room becomes a front
    pub opening_keep_chance: f32,
    pub shuffle_openings: bool,

    pub border_margin: i32,
    pub collision_margin: i32,
    pub no_dig_margin: i32,
    pub edge_band_width: i32,
    pub door_jitter: i32,
    pub door_corner_inset: i32,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            room_count: Some(IntRange::new(8, 12)),
            fallback_room_count: FALLBACK_ROOM_COUNT,
            room_extent: IntRange::new(MIN_ROOM_EXTENT, MAX_ROOM_EXTENT),
            corridor_len: IntRange::new(MIN_CORRIDOR_LEN, MAX_CORRIDOR_LEN),
            bias_small_rooms: BIAS_SMALL_ROOMS,
            large_room_chance: LARGE_ROOM_CHANCE,
            bias_short_corridors: BIAS_SHORT_CORRIDORS,
            placement_tries: PLACEMENT_TRIES,
            depth_first: false,
            depth_first_push_back_chance: DEPTH_FIRST_PUSH_BACK_CHANCE,
            opening_keep_chance: OPENING_KEEP_CHANCE,
            shuffle_openings: true,
            border_margin: BORDER_MARGIN,
            collision_margin: COLLISION_MARGIN,
            no_dig_margin: NO_DIG_MARGIN,
            edge_band_width: EDGE_BAND_WIDTH,
            door_jitter: DOOR_JITTER,
            door_corner_inset: DOOR_CORNER_INSET,
        }
    }
}

impl GrowthConfig {
    /// Reject settings the carver cannot work with
    pub fn validate(&self) -> Result<(), GenError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(GenError::invalid(format!(
                "map size {}x{} must be positive",
                self.width, self.height
            )));
        }
        match self.width.checked_mul(self.height) {
            Some(cells) if cells <= MAX_MAP_CELLS => {}
            _ => {
                return Err(GenError::invalid(format!(
                    "map size {}x{} exceeds {MAX_MAP_CELLS} cells",
                    self.width, self.height
                )));
            }
        }
        if !self.room_extent.is_valid() {
            return Err(GenError::invalid("room_extent.min > room_extent.max"));
        }
        if self.room_extent.min < 2 * self.door_corner_inset + 1 {
            return Err(GenError::invalid(
                "room_extent.min leaves no door cell after the corner inset",
            ));
        }
        if !self.corridor_len.is_valid() || self.corridor_len.min < 1 {
            return Err(GenError::invalid("corridor_len must be a range starting at 1 or more"));
        }
        if self.placement_tries == 0 {
            return Err(GenError::invalid("placement_tries must be at least 1"));
        }
        let chances = [
            ("bias_small_rooms", self.bias_small_rooms),
            ("large_room_chance", self.large_room_chance),
            ("bias_short_corridors", self.bias_short_corridors),
            ("depth_first_push_back_chance", self.depth_first_push_back_chance),
            ("opening_keep_chance", self.opening_keep_chance),
        ];
        for (name, p) in chances {
            if !(0.0..=1.0).contains(&p) {
                return Err(GenError::invalid(format!("{name} = {p} is not a probability")));
            }
        }
        let margins = [
            ("border_margin", self.border_margin),
            ("collision_margin", self.collision_margin),
            ("no_dig_margin", self.no_dig_margin),
            ("edge_band_width", self.edge_band_width),
            ("door_jitter", self.door_jitter),
            ("door_corner_inset", self.door_corner_inset),
        ];
        for (name, m) in margins {
            if m < 0 {
                return Err(GenError::invalid(format!("{name} must not be negative")));
            }
        }
        Ok(())
    }

    /// The configured room count range, if it is usable
    pub fn room_count_range(&self) -> Option<IntRange> {
        self.room_count.filter(|r| r.is_valid() && r.max > 0)
    }
}

/// Biome profile: what the dungeon looks like and how big it is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BiomeProfile {
    pub name: String,
    /// Overrides `GrowthConfig::width`
    pub width: Option<i32>,
    /// Overrides `GrowthConfig::height`
    pub height: Option<i32>,
    pub floor: FloorKind,
    pub corridor: CorridorKind,
    /// Rooms closer than this (by `distance_metric`) get unlocked doors
    pub min_path_distance: u32,
    pub distance_metric: DistanceMetric,
    pub bands: Vec<BiomeBand>,
}

impl Default for BiomeProfile {
    fn default() -> Self {
        Self {
            name: "catacombs".to_string(),
            width: None,
            height: None,
            floor: FloorKind::Stone,
            corridor: CorridorKind::Dirt,
            min_path_distance: 2,
            distance_metric: DistanceMetric::Bfs,
            bands: Vec::new(),
        }
    }
}

impl BiomeProfile {
    /// Map size after applying this profile's overrides
    pub fn map_size(&self, growth: &GrowthConfig) -> (i32, i32) {
        (
            self.width.unwrap_or(growth.width),
            self.height.unwrap_or(growth.height),
        )
    }
}

/// Everything a build and its placers need, as loaded from one file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DungeonConfig {
    pub growth: GrowthConfig,
    pub profile: BiomeProfile,
    pub traps: TrapConfig,
    pub props: Vec<PropRule>,
    pub puzzles: Vec<PuzzleSpec>,
}

impl DungeonConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: DungeonConfig = serde_json::from_str(json)?;
        config.growth.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert_eq!(GrowthConfig::default().validate(), Ok(()));
        assert_eq!(GrowthConfig::default().placement_tries, 8);
        assert_eq!(GrowthConfig::default().no_dig_margin, 2);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut cfg = GrowthConfig::default();
        cfg.room_extent = IntRange::new(9, 4);
        assert!(cfg.validate().is_err());

        let mut cfg = GrowthConfig::default();
        cfg.opening_keep_chance = 1.5;
        let err = cfg.validate().unwrap_err();
        assert!(err.to_string().contains("opening_keep_chance"));

        let mut cfg = GrowthConfig::default();
        cfg.placement_tries = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = GrowthConfig::default();
        cfg.room_extent = IntRange::new(2, 6);
        cfg.door_corner_inset = 1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_huge_maps() {
        let mut cfg = GrowthConfig::default();
        cfg.width = 50_000;
        cfg.height = 50_000;
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, GenError::InvalidConfig { .. }));
        assert!(err.to_string().contains("exceeds"));

        cfg.width = i32::MAX;
        cfg.height = 2;
        assert!(cfg.validate().is_err());

        cfg.width = 2048;
        cfg.height = 2048;
        assert_eq!(cfg.validate(), Ok(()));
    }

    #[test]
    fn test_room_count_range_fallback() {
        let mut cfg = GrowthConfig::default();
        assert_eq!(cfg.room_count_range(), Some(IntRange::new(8, 12)));
        cfg.room_count = Some(IntRange::new(5, 3));
        assert_eq!(cfg.room_count_range(), None);
        cfg.room_count = None;
        assert_eq!(cfg.room_count_range(), None);
    }

    #[test]
    fn test_profile_overrides_size() {
        let growth = GrowthConfig::default();
        let mut profile = BiomeProfile::default();
        assert_eq!(profile.map_size(&growth), (64, 48));
        profile.width = Some(80);
        assert_eq!(profile.map_size(&growth), (80, 48));
    }

    #[test]
    fn test_partial_json() {
        let json = r#"{
            "growth": { "depth_first": true, "room_count": { "min": 4, "max": 4 } },
            "profile": {
                "floor": "moss",
                "corridor": "root",
                "bands": [ { "min_distance": 3, "floor": "ember" } ]
            }
        }"#;
        let cfg = DungeonConfig::from_json_str(json).unwrap();
        assert!(cfg.growth.depth_first);
        assert_eq!(cfg.growth.room_count, Some(IntRange::new(4, 4)));
        assert_eq!(cfg.growth.placement_tries, 8);
        assert_eq!(cfg.profile.floor, FloorKind::Moss);
        assert_eq!(cfg.profile.corridor, CorridorKind::Root);
        assert_eq!(cfg.profile.bands[0].floor, FloorKind::Ember);
    }

    #[test]
    fn test_bad_json_and_invalid_values() {
        assert!(matches!(
            DungeonConfig::from_json_str("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DungeonConfig::from_json_str(r#"{ "growth": { "placement_tries": 0 } }"#),
            Err(ConfigError::Invalid(GenError::InvalidConfig { .. }))
        ));
        assert!(matches!(
            DungeonConfig::from_json_str(r#"{ "profile": { "floor": "lava_lake" } }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_round_trip_through_json() {
        let cfg = DungeonConfig::default();
        let json = cfg.to_json().unwrap();
        assert_eq!(DungeonConfig::from_json_str(&json).unwrap(), cfg);
    }

    #[test]
    fn test_missing_file() {
        let err = DungeonConfig::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
