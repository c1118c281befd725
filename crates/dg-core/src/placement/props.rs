//! Prop placement

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IntRange;
use crate::dungeon::{Pos, Room, RoomId};
use crate::rng::DungeonRng;

use super::strategy::{PlacementStrategy, order_candidates};

/// How one kind of prop is scattered over rooms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropRule {
    pub name: String,
    pub strategy: PlacementStrategy,
    /// Props per room that passes the `chance` roll
    pub count: IntRange,
    /// Probability a room gets this prop at all
    pub chance: f32,
    /// Chests, urns and the like: hold loot and get a loot table downstream
    pub loot: bool,
    /// Keep this prop off entrances and the cells next to them
    pub avoid_entrances: bool,
}

impl Default for PropRule {
    fn default() -> Self {
        Self {
            name: "crate".to_string(),
            strategy: PlacementStrategy::Wall,
            count: IntRange::new(1, 2),
            chance: 0.5,
            loot: false,
            avoid_entrances: true,
        }
    }
}

impl PropRule {
    pub fn is_loot_container(&self) -> bool {
        self.loot
    }
}

/// A prop put into a room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedProp {
    pub name: String,
    pub room: RoomId,
    pub pos: Pos,
    pub loot: bool,
}

/// Scatter props over every room, claiming each cell used
pub fn place_props(rooms: &mut [Room], rules: &[PropRule], rng: &mut DungeonRng) -> Vec<PlacedProp> {
    let mut placed = Vec::new();
    for room in rooms.iter_mut() {
        for rule in rules {
            if !rng.chance(rule.chance) {
                continue;
            }
            let wanted = rng.range(rule.count.min, rule.count.max).max(0) as usize;
            let mut got = 0;
            for p in order_candidates(rule.strategy, &room.info, rng) {
                if got == wanted {
                    break;
                }
                if rule.avoid_entrances && room.info.near_entrance(p) {
                    continue;
                }
                if !room.info.try_claim(p) {
                    continue;
                }
                placed.push(PlacedProp {
                    name: rule.name.clone(),
                    room: room.id(),
                    pos: p,
                    loot: rule.is_loot_container(),
                });
                got += 1;
            }
            if got < wanted {
                debug!(room = %room.id(), prop = %rule.name, wanted, got, "room ran out of prop cells");
            }
        }
    }
    placed
}
