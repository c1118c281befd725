//! dg-core: seeded-growth dungeon generation
//!
//! Grows rooms and corridors outward from a fixed seed footprint, cleans up
//! the result, paints distance bands and builds a read-only spatial index.
//! Placers for props, traps, puzzles and doors run on top of the index.
//!
//! ```no_run
//! use dg_core::config::DungeonConfig;
//! use dg_core::dungeon::SeedFootprint;
//! use dg_core::generator::build_from_config;
//!
//! let config = DungeonConfig::default();
//! let footprint = SeedFootprint::builtin();
//! let dungeon = build_from_config(42, &config, Some(&footprint)).unwrap();
//! println!("{}", dungeon.grid);
//! ```

pub mod config;
pub mod consts;
pub mod dungeon;
pub mod error;
pub mod events;
pub mod generator;
pub mod placement;
pub mod rng;

pub use config::{BiomeProfile, DungeonConfig, GrowthConfig, IntRange};
pub use error::{ConfigError, GenError};
pub use generator::{Dungeon, DungeonHost, build_dungeon, build_from_config};
pub use rng::DungeonRng;
