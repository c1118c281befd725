//! Placement consumers
//!
//! Placers run after a dungeon is built, strictly one after another. They
//! coordinate only through each room's `occupied` set: a cell is checked and
//! claimed with [`RoomInfo::try_claim`](crate::dungeon::RoomInfo::try_claim)
//! before anything is put on it.

mod doors;
mod props;
mod puzzles;
mod strategy;
mod traps;

pub use doors::{DoorPlan, plan_doors, required_tier};
pub use props::{PlacedProp, PropRule, place_props};
pub use puzzles::{
    LeverOutcome, PuzzleKind, PuzzlePlacement, PuzzleProgress, PuzzleSpec, PuzzleState, RunContext,
    place_puzzles,
};
pub use strategy::{PlacementStrategy, order_candidates};
pub use traps::{PlacedTrap, TrapConfig, TrapKind, place_traps, random_trap_kind};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::DungeonConfig;
use crate::generator::Dungeon;

/// Everything the placers put into one dungeon
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Population {
    pub puzzles: Vec<PuzzlePlacement>,
    pub props: Vec<PlacedProp>,
    pub traps: Vec<PlacedTrap>,
    pub doors: Vec<DoorPlan>,
}

/// Run every placer over `dungeon`: puzzles first (they need the most
/// room), then props, then traps, then doors
///
/// Draws from the dungeon's own RNG, so a seed fixes the population too.
pub fn populate(dungeon: &mut Dungeon, config: &DungeonConfig) -> Population {
    let Dungeon { rooms, bands, rng, .. } = dungeon;
    let puzzles = place_puzzles(rooms, bands, &config.puzzles, rng);
    let props = place_props(rooms, &config.props, rng);
    let traps = place_traps(rooms, bands, &config.traps, rng);
    let doors = plan_doors(rooms, bands, config.profile.min_path_distance);

    info!(
        puzzles = puzzles.len(),
        props = props.len(),
        traps = traps.len(),
        doors = doors.len(),
        "populated dungeon"
    );
    Population {
        puzzles,
        props,
        traps,
        doors,
    }
}
