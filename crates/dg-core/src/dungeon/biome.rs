//! Distance bands: repaint room floors by how far they are from the start
//!
//! Distance is measured from the first room (the one attached to the seed
//! entrance), either in growth-tree hops or along a minimum spanning tree of
//! room centers. Each band maps "at least this far" to a floor kind.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::cell::{CellKind, FloorKind};
use super::grid::Grid;
use super::room::Room;

/// How distance from the start room is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// Hop count through the growth tree (room -> parent links)
    #[default]
    Bfs,
    /// Summed Manhattan edge weights along a minimum spanning tree of room centers
    Mst,
}

/// Rooms at least `min_distance` from the start get `floor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiomeBand {
    pub min_distance: u32,
    pub floor: FloorKind,
}

/// Per-room distance and band, indexed like the room list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandAssignment {
    /// `None` for rooms the metric could not reach
    pub distances: Vec<Option<u32>>,
    /// Index into the sorted band list
    pub bands: Vec<Option<usize>>,
}

impl BandAssignment {
    pub fn distance(&self, room: usize) -> Option<u32> {
        self.distances.get(room).copied().flatten()
    }

    pub fn band(&self, room: usize) -> Option<usize> {
        self.bands.get(room).copied().flatten()
    }
}

/// Measure every room's distance from room 0 and paint its floor by band
///
/// Bands are applied in ascending `min_distance` order; the furthest band a
/// room qualifies for wins. Only `Floor` cells inside the room are
/// repainted. An empty room list returns an empty assignment.
pub fn assign_distance_bands(
    grid: &mut Grid,
    rooms: &[Room],
    bands: &[BiomeBand],
    metric: DistanceMetric,
) -> BandAssignment {
    if rooms.is_empty() {
        debug!("no rooms to band");
        return BandAssignment::default();
    }

    let distances = match metric {
        DistanceMetric::Bfs => growth_tree_distances(rooms),
        DistanceMetric::Mst => spanning_tree_distances(rooms),
    };

    let mut sorted = bands.to_vec();
    sorted.sort_by_key(|b| b.min_distance);

    let mut assigned = Vec::with_capacity(rooms.len());
    for (room, distance) in rooms.iter().zip(&distances) {
        let band = distance.and_then(|d| sorted.iter().rposition(|b| b.min_distance <= d));
        if let Some(i) = band {
            paint_room(grid, room, sorted[i].floor);
        }
        assigned.push(band);
    }

    debug!(rooms = rooms.len(), bands = sorted.len(), ?metric, "assigned distance bands");
    BandAssignment {
        distances,
        bands: assigned,
    }
}

fn paint_room(grid: &mut Grid, room: &Room, floor: FloorKind) {
    for p in room.bounds().cells() {
        if matches!(grid.kind(p), Some(CellKind::Floor(_))) {
            grid.set_kind(p, CellKind::Floor(floor));
        }
    }
}

/// Hop distance from room 0 through parent/child links
pub fn growth_tree_distances(rooms: &[Room]) -> Vec<Option<u32>> {
    let mut adjacency = vec![Vec::new(); rooms.len()];
    for (i, room) in rooms.iter().enumerate() {
        if let Some(parent) = room.parent() {
            let p = parent.index();
            if p < rooms.len() {
                adjacency[p].push((i, 1));
                adjacency[i].push((p, 1));
            }
        }
    }
    tree_distances(&adjacency)
}

/// Distance from room 0 along a minimum spanning tree (Prim's algorithm)
/// over room centers with Manhattan weights
pub fn spanning_tree_distances(rooms: &[Room]) -> Vec<Option<u32>> {
    let n = rooms.len();
    let mut adjacency = vec![Vec::new(); n];
    if n == 0 {
        return Vec::new();
    }

    let mut in_tree = vec![false; n];
    let mut heap = BinaryHeap::new();
    in_tree[0] = true;
    for j in 1..n {
        heap.push(Reverse((rooms[0].center().manhattan(rooms[j].center()), j, 0usize)));
    }

    while let Some(Reverse((weight, to, from))) = heap.pop() {
        if in_tree[to] {
            continue;
        }
        in_tree[to] = true;
        adjacency[from].push((to, weight));
        adjacency[to].push((from, weight));
        for j in 0..n {
            if !in_tree[j] {
                heap.push(Reverse((rooms[to].center().manhattan(rooms[j].center()), j, to)));
            }
        }
    }

    tree_distances(&adjacency)
}

/// Weighted distances from node 0 over a tree (or any graph where the first
/// visit is the shortest, which holds for trees)
fn tree_distances(adjacency: &[Vec<(usize, u32)>]) -> Vec<Option<u32>> {
    let mut dist = vec![None; adjacency.len()];
    if adjacency.is_empty() {
        return dist;
    }
    let mut queue = VecDeque::new();
    dist[0] = Some(0);
    queue.push_back(0);
    while let Some(cur) = queue.pop_front() {
        let base = dist[cur].unwrap_or(0);
        for &(next, w) in &adjacency[cur] {
            if dist[next].is_none() {
                dist[next] = Some(base + w);
                queue.push_back(next);
            }
        }
    }
    dist
}
