//! Door planning
//!
//! Every room entrance becomes a door. Doors into rooms that are far enough
//! from the start are locked behind a tier derived from the room's distance
//! band, so deeper parts of the dungeon need better keys.

use serde::{Deserialize, Serialize};

use crate::dungeon::{BandAssignment, Pos, Room, RoomId};

/// A door for the engine to spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorPlan {
    pub room: RoomId,
    pub position: Pos,
    /// 0 means unlocked
    pub required_tier: u32,
}

/// Lock tier for the room at `index`
///
/// Rooms closer than `min_path_distance`, and rooms without a band, are
/// unlocked. Otherwise the tier is the band index plus one.
pub fn required_tier(bands: &BandAssignment, index: usize, min_path_distance: u32) -> u32 {
    match (bands.distance(index), bands.band(index)) {
        (Some(d), Some(b)) if d >= min_path_distance => b as u32 + 1,
        _ => 0,
    }
}

/// One door per room entrance, in room order then cell order
pub fn plan_doors(rooms: &[Room], bands: &BandAssignment, min_path_distance: u32) -> Vec<DoorPlan> {
    rooms
        .iter()
        .enumerate()
        .flat_map(|(i, room)| {
            let tier = required_tier(bands, i, min_path_distance);
            room.info.entrances.iter().map(move |&position| DoorPlan {
                room: room.id(),
                position,
                required_tier: tier,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{CellKind, CorridorKind, Dir, FloorKind, Grid, Rect};

    fn rooms() -> Vec<Room> {
        let mut grid = Grid::new(40, 12);
        let mut rooms = Vec::new();
        for i in 0..3 {
            let x = 2 + 12 * i;
            let bounds = Rect::new(x, 2, x + 5, 7);
            grid.carve_room(&bounds, CellKind::Floor(FloorKind::Stone));
            grid.set_kind(Pos::new(x + 2, 8), CellKind::Corridor(CorridorKind::Dirt));
            let parent = (i > 0).then(|| RoomId(i as u32 - 1));
            rooms.push(Room::new(RoomId(i as u32), bounds, parent, Dir::Right, i as u32 + 1, FloorKind::Stone));
        }
        for room in &mut rooms {
            room.rebuild_info(&mut grid, 2);
        }
        rooms
    }

    fn bands() -> BandAssignment {
        BandAssignment {
            distances: vec![Some(0), Some(1), Some(3)],
            bands: vec![None, Some(0), Some(1)],
        }
    }

    #[test]
    fn test_tiers() {
        let b = bands();
        assert_eq!(required_tier(&b, 0, 2), 0);
        // Banded but too close
        assert_eq!(required_tier(&b, 1, 2), 0);
        assert_eq!(required_tier(&b, 2, 2), 2);
        assert_eq!(required_tier(&b, 1, 0), 1);
        assert_eq!(required_tier(&b, 9, 0), 0);
    }

    #[test]
    fn test_one_door_per_entrance() {
        let rooms = rooms();
        let plans = plan_doors(&rooms, &bands(), 2);
        assert_eq!(plans.len(), 3);
        assert_eq!(plans[0].position, Pos::new(4, 7));
        assert_eq!(
            plans.iter().map(|p| p.required_tier).collect::<Vec<_>>(),
            vec![0, 0, 2]
        );
        assert!(plans.iter().all(|p| rooms[p.room.index()].info.entrances.contains(&p.position)));
    }

    #[test]
    fn test_no_bands_means_unlocked() {
        let plans = plan_doors(&rooms(), &BandAssignment::default(), 0);
        assert!(plans.iter().all(|p| p.required_tier == 0));
    }
}
