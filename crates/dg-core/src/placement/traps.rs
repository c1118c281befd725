//! Trap placement
//!
//! Trap kinds are drawn from a weighted table where nastier traps only
//! appear in rooms further from the start (higher distance bands).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

use crate::config::IntRange;
use crate::dungeon::{BandAssignment, Pos, Room, RoomId};
use crate::rng::DungeonRng;

use super::strategy::{PlacementStrategy, order_candidates};

/// Trap kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TrapKind {
    Spikes,
    Dart,
    Pit,
    Snare,
    Gas,
    Fire,
    Collapse,
    Teleport,
}

impl TrapKind {
    /// Table weight for a room in the given tier (0 = no band / nearest)
    pub const fn weight(self, tier: u32) -> u32 {
        match self {
            TrapKind::Spikes => 10,
            TrapKind::Dart => 10,
            TrapKind::Pit => 8,
            TrapKind::Snare => 6,
            TrapKind::Gas => if tier >= 1 { 6 } else { 2 },
            TrapKind::Fire => if tier >= 2 { 6 } else { 0 },
            TrapKind::Collapse => if tier >= 2 { 4 } else { 0 },
            TrapKind::Teleport => if tier >= 3 { 3 } else { 0 },
        }
    }
}

const TRAP_TABLE: [TrapKind; 8] = [
    TrapKind::Spikes,
    TrapKind::Dart,
    TrapKind::Pit,
    TrapKind::Snare,
    TrapKind::Gas,
    TrapKind::Fire,
    TrapKind::Collapse,
    TrapKind::Teleport,
];

/// Pick a trap kind for a room in `tier`
pub fn random_trap_kind(rng: &mut DungeonRng, tier: u32) -> TrapKind {
    let weights: Vec<u32> = TRAP_TABLE.iter().map(|k| k.weight(tier)).collect();
    rng.weighted_index(&weights)
        .map(|i| TRAP_TABLE[i])
        .unwrap_or(TrapKind::Spikes)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrapConfig {
    /// Traps per room that passes the `chance` roll
    pub per_room: IntRange,
    pub chance: f32,
    /// The first room (next to the seed) stays safe
    pub skip_first_room: bool,
    pub strategy: PlacementStrategy,
}

impl Default for TrapConfig {
    fn default() -> Self {
        Self {
            per_room: IntRange::new(1, 2),
            chance: 0.4,
            skip_first_room: true,
            strategy: PlacementStrategy::Interior,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedTrap {
    pub kind: TrapKind,
    pub room: RoomId,
    pub pos: Pos,
}

/// Put traps into rooms, never on or next to an entrance
///
/// A room's tier is its band index plus one, or 0 if it has no band.
pub fn place_traps(
    rooms: &mut [Room],
    bands: &BandAssignment,
    config: &TrapConfig,
    rng: &mut DungeonRng,
) -> Vec<PlacedTrap> {
    let mut placed = Vec::new();
    for (i, room) in rooms.iter_mut().enumerate() {
        if i == 0 && config.skip_first_room {
            continue;
        }
        if !rng.chance(config.chance) {
            continue;
        }
        let tier = bands.band(i).map_or(0, |b| b as u32 + 1);
        let wanted = rng.range(config.per_room.min, config.per_room.max).max(0) as usize;

        let cells: Vec<Pos> = order_candidates(config.strategy, &room.info, rng)
            .into_iter()
            .filter(|&p| !room.info.near_entrance(p))
            .collect();
        let mut got = 0;
        for p in cells {
            if got == wanted {
                break;
            }
            if !room.info.try_claim(p) {
                continue;
            }
            let kind = random_trap_kind(rng, tier);
            debug!(room = %room.id(), %kind, x = p.x, y = p.y, tier, "placed trap");
            placed.push(PlacedTrap {
                kind,
                room: room.id(),
                pos: p,
            });
            got += 1;
        }
    }
    placed
}
