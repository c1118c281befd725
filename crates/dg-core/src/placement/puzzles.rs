//! Puzzle placement and per-run puzzle state
//!
//! Placement only decides where a puzzle's pieces go. Progress lives in a
//! [`PuzzleState`] owned by the [`RunContext`], which starts fresh for every
//! run instead of carrying flags over from the last one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dungeon::{BandAssignment, Pos, Room, RoomId};
use crate::rng::DungeonRng;

use super::strategy::{PlacementStrategy, order_candidates};

/// Kind of puzzle and its size
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PuzzleKind {
    /// Levers along the walls that must be pulled in a hidden order
    LeverSequence { levers: u32 },
    /// Pedestals that each need a sword
    SwordCounter { swords: u32 },
    /// An altar that wants one specific item
    ItemDelivery { item: String },
}

impl PuzzleKind {
    /// Number of cells the puzzle occupies
    pub fn cells_needed(&self) -> usize {
        match self {
            PuzzleKind::LeverSequence { levers } => *levers as usize,
            PuzzleKind::SwordCounter { swords } => *swords as usize,
            PuzzleKind::ItemDelivery { .. } => 1,
        }
    }

    fn strategy(&self) -> PlacementStrategy {
        match self {
            PuzzleKind::LeverSequence { .. } => PlacementStrategy::Wall,
            PuzzleKind::SwordCounter { .. } | PuzzleKind::ItemDelivery { .. } => PlacementStrategy::Interior,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleSpec {
    pub name: String,
    pub kind: PuzzleKind,
    /// Only rooms at least this far from the start may host the puzzle
    pub min_distance: u32,
}

impl Default for PuzzleSpec {
    fn default() -> Self {
        Self {
            name: "levers".to_string(),
            kind: PuzzleKind::LeverSequence { levers: 3 },
            min_distance: 1,
        }
    }
}

/// Where a puzzle's pieces were put
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzlePlacement {
    pub name: String,
    pub kind: PuzzleKind,
    pub room: RoomId,
    pub cells: Vec<Pos>,
}

/// Put each puzzle in its own randomly chosen eligible room
///
/// A room is eligible if it is far enough from the start, has no puzzle yet
/// and has enough free cells away from its entrances. Puzzles without an
/// eligible room are skipped.
pub fn place_puzzles(
    rooms: &mut [Room],
    bands: &BandAssignment,
    specs: &[PuzzleSpec],
    rng: &mut DungeonRng,
) -> Vec<PuzzlePlacement> {
    let mut placed: Vec<PuzzlePlacement> = Vec::new();
    for spec in specs {
        let needed = spec.kind.cells_needed();
        let eligible: Vec<usize> = rooms
            .iter()
            .enumerate()
            .filter(|(i, room)| {
                bands.distance(*i).unwrap_or(0) >= spec.min_distance
                    && !placed.iter().any(|p| p.room == room.id())
                    && room.info.free_cells().filter(|p| !room.info.near_entrance(*p)).count() >= needed
            })
            .map(|(i, _)| i)
            .collect();

        let Some(&i) = rng.choose(&eligible) else {
            debug!(puzzle = %spec.name, "no room can host puzzle");
            continue;
        };
        let room = &mut rooms[i];
        let candidates: Vec<Pos> = order_candidates(spec.kind.strategy(), &room.info, rng)
            .into_iter()
            .filter(|&p| !room.info.near_entrance(p))
            .collect();

        let mut cells = Vec::with_capacity(needed);
        for p in candidates {
            if cells.len() == needed {
                break;
            }
            if room.info.try_claim(p) {
                cells.push(p);
            }
        }

        debug!(puzzle = %spec.name, room = %room.id(), cells = cells.len(), "placed puzzle");
        placed.push(PuzzlePlacement {
            name: spec.name.clone(),
            kind: spec.kind.clone(),
            room: room.id(),
            cells,
        });
    }
    placed
}

/// Progress of one puzzle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PuzzleProgress {
    Levers { order: Vec<u32>, next: usize },
    Swords { placed: u32, needed: u32 },
    Delivery { item: String, delivered: bool },
}

impl PuzzleProgress {
    pub fn is_solved(&self) -> bool {
        match self {
            PuzzleProgress::Levers { order, next } => *next >= order.len(),
            PuzzleProgress::Swords { placed, needed } => placed >= needed,
            PuzzleProgress::Delivery { delivered, .. } => *delivered,
        }
    }

    fn restart(&mut self) {
        match self {
            PuzzleProgress::Levers { next, .. } => *next = 0,
            PuzzleProgress::Swords { placed, .. } => *placed = 0,
            PuzzleProgress::Delivery { delivered, .. } => *delivered = false,
        }
    }
}

/// Result of pulling a lever
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeverOutcome {
    /// Right lever, more to go
    Advanced,
    /// Right lever, sequence complete
    Solved,
    /// Wrong lever; the sequence starts over
    Reset,
    AlreadySolved,
    /// No lever puzzle by that name
    Unknown,
}

/// Progress of every puzzle in the current run, keyed by puzzle name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleState {
    puzzles: BTreeMap<String, PuzzleProgress>,
}

impl PuzzleState {
    /// Fresh state for a set of placed puzzles. Lever orders are shuffled.
    pub fn from_placements(placements: &[PuzzlePlacement], rng: &mut DungeonRng) -> Self {
        let mut puzzles = BTreeMap::new();
        for placement in placements {
            let progress = match &placement.kind {
                PuzzleKind::LeverSequence { .. } => {
                    let mut order: Vec<u32> = (0..placement.cells.len() as u32).collect();
                    rng.shuffle(&mut order);
                    PuzzleProgress::Levers { order, next: 0 }
                }
                PuzzleKind::SwordCounter { .. } => PuzzleProgress::Swords {
                    placed: 0,
                    needed: placement.cells.len() as u32,
                },
                PuzzleKind::ItemDelivery { item } => PuzzleProgress::Delivery {
                    item: item.clone(),
                    delivered: false,
                },
            };
            puzzles.insert(placement.name.clone(), progress);
        }
        Self { puzzles }
    }

    pub fn progress(&self, name: &str) -> Option<&PuzzleProgress> {
        self.puzzles.get(name)
    }

    pub fn is_solved(&self, name: &str) -> bool {
        self.puzzles.get(name).is_some_and(PuzzleProgress::is_solved)
    }

    pub fn solved_count(&self) -> usize {
        self.puzzles.values().filter(|p| p.is_solved()).count()
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// Pull lever `lever` (index into the placement's cells)
    pub fn pull_lever(&mut self, name: &str, lever: u32) -> LeverOutcome {
        let Some(PuzzleProgress::Levers { order, next }) = self.puzzles.get_mut(name) else {
            return LeverOutcome::Unknown;
        };
        if *next >= order.len() {
            return LeverOutcome::AlreadySolved;
        }
        if order[*next] != lever {
            *next = 0;
            return LeverOutcome::Reset;
        }
        *next += 1;
        if *next == order.len() {
            LeverOutcome::Solved
        } else {
            LeverOutcome::Advanced
        }
    }

    /// Put a sword on a pedestal. Returns whether the puzzle is now solved,
    /// or `None` if there is no sword puzzle by that name.
    pub fn place_sword(&mut self, name: &str) -> Option<bool> {
        let Some(PuzzleProgress::Swords { placed, needed }) = self.puzzles.get_mut(name) else {
            return None;
        };
        if *placed < *needed {
            *placed += 1;
        }
        Some(*placed >= *needed)
    }

    /// Offer `item` at a delivery altar. Returns whether it was accepted.
    pub fn deliver(&mut self, name: &str, item: &str) -> Option<bool> {
        let Some(PuzzleProgress::Delivery { item: wanted, delivered }) = self.puzzles.get_mut(name) else {
            return None;
        };
        if *wanted == item {
            *delivered = true;
        }
        Some(*delivered)
    }

    /// Forget all progress but keep the puzzles and lever orders
    pub fn reset(&mut self) {
        for progress in self.puzzles.values_mut() {
            progress.restart();
        }
    }
}

/// State that lives exactly as long as one run through a dungeon
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunContext {
    /// Number of runs started so far
    pub run: u32,
    pub seed: u32,
    pub puzzles: PuzzleState,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new run: all state from the previous run is dropped
    pub fn begin_run(&mut self, seed: u32, placements: &[PuzzlePlacement], rng: &mut DungeonRng) {
        self.run += 1;
        self.seed = seed;
        self.puzzles = PuzzleState::from_placements(placements, rng);
        info!(run = self.run, seed, puzzles = self.puzzles.len(), "run started");
    }

    /// Replay the current run from the start
    pub fn reset(&mut self) {
        self.puzzles.reset();
    }
}
