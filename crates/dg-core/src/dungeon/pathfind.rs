//! Constrained corridor pathfinding
//!
//! Breadth-first search over the 4-connected grid. Corridors may cross other
//! corridors and solid wall, but never room floor, the no-dig halo, or the
//! rectangle of the room about to be carved (except its doorway goal).

use std::collections::VecDeque;

use hashbrown::HashMap;

use super::footprint::NoDigMask;
use super::grid::Grid;
use super::rect::{Pos, Rect};

/// Obstacles a corridor must route around
#[derive(Debug, Clone, Copy)]
pub struct PathConstraints<'a> {
    /// Rect of the room about to be carved. The goal is exempt.
    pub forbidden: Option<Rect>,
    pub no_dig: &'a NoDigMask,
}

impl PathConstraints<'_> {
    /// Whether a corridor may occupy `p` on its way to `goal`
    pub fn is_traversable(&self, grid: &Grid, p: Pos, goal: Pos) -> bool {
        let Some(kind) = grid.kind(p) else {
            return false;
        };
        if p != goal && self.forbidden.is_some_and(|r| r.contains_pos(p)) {
            return false;
        }
        if self.no_dig.contains(p) {
            return false;
        }
        !kind.is_room_floor()
    }
}

/// Shortest 4-connected corridor path from `start` to `goal`
///
/// Returns `None` if the goal is unreachable and an empty path if
/// `start == goal`. Otherwise the path excludes `start` and ends at `goal`.
/// Neighbours are expanded in `+x, -x, +y, -y` order, so ties always
/// resolve the same way.
pub fn find_corridor_path(
    grid: &Grid,
    start: Pos,
    goal: Pos,
    constraints: &PathConstraints<'_>,
) -> Option<Vec<Pos>> {
    if start == goal {
        return Some(Vec::new());
    }
    if !constraints.is_traversable(grid, goal, goal) {
        return None;
    }

    let mut came_from: HashMap<Pos, Pos> = HashMap::new();
    let mut queue = VecDeque::new();
    came_from.insert(start, start);
    queue.push_back(start);

    while let Some(cur) = queue.pop_front() {
        if cur == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        for next in cur.neighbors4() {
            if came_from.contains_key(&next) || !constraints.is_traversable(grid, next, goal) {
                continue;
            }
            came_from.insert(next, cur);
            queue.push_back(next);
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Pos, Pos>, start: Pos, goal: Pos) -> Vec<Pos> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(&prev) = came_from.get(&cur) {
        if prev == start {
            break;
        }
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    path
}
