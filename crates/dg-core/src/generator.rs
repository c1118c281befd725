//! The build pipeline and the host that commits finished builds
//!
//! A build runs stamp, growth, cleanup, banding, room info and indexing in
//! that order on a scratch [`Dungeon`]. [`DungeonHost`] swaps a scratch build
//! in only when it succeeded, so a failed rebuild leaves the last good
//! dungeon in place.

use tracing::{error, info, info_span};

use crate::config::{BiomeProfile, DungeonConfig, GrowthConfig};
use crate::dungeon::{
    BandAssignment, DungeonMapIndex, FootprintProvider, Grid, GrowthStats, Palette, Room, RoomId,
    SeedStamp, assign_distance_bands, grow_rooms, remove_dangling_corridors, stamp_footprint,
};
use crate::error::GenError;
use crate::events::{DungeonEvent, EventHub};
use crate::rng::DungeonRng;

/// A finished build
#[derive(Debug, Clone)]
pub struct Dungeon {
    pub seed: u32,
    pub profile: String,
    pub grid: Grid,
    /// Grown rooms in placement order. The seed footprint is not a room.
    pub rooms: Vec<Room>,
    pub index: DungeonMapIndex,
    pub seed_stamp: SeedStamp,
    pub bands: BandAssignment,
    pub stats: GrowthStats,
    /// Corridor cells removed by cleanup
    pub removed_corridors: usize,
    /// Generation stream, continued by the placers
    pub(crate) rng: DungeonRng,
}

impl Dungeon {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The RNG the placers draw from, positioned right after generation
    pub fn rng_mut(&mut self) -> &mut DungeonRng {
        &mut self.rng
    }
}

/// Build a dungeon from `seed`
///
/// Fails without side effects if the profile or footprint is missing, the
/// growth settings are invalid, or the footprint does not fit the map.
pub fn build_dungeon(
    seed: u32,
    growth: &GrowthConfig,
    profile: Option<&BiomeProfile>,
    footprint: Option<&dyn FootprintProvider>,
) -> Result<Dungeon, GenError> {
    let span = info_span!("build_dungeon", seed);
    let _enter = span.enter();

    let result = build_inner(seed, growth, profile, footprint);
    if let Err(e) = &result {
        error!(error = %e, "dungeon build aborted");
    }
    result
}

/// [`build_dungeon`] with the growth settings and profile of a loaded config
pub fn build_from_config(
    seed: u32,
    config: &DungeonConfig,
    footprint: Option<&dyn FootprintProvider>,
) -> Result<Dungeon, GenError> {
    build_dungeon(seed, &config.growth, Some(&config.profile), footprint)
}

fn build_inner(
    seed: u32,
    growth: &GrowthConfig,
    profile: Option<&BiomeProfile>,
    footprint: Option<&dyn FootprintProvider>,
) -> Result<Dungeon, GenError> {
    let profile = profile.ok_or(GenError::MissingProfile)?;
    let footprint = footprint
        .and_then(|provider| provider.footprint())
        .ok_or(GenError::MissingFootprint)?;

    let (width, height) = profile.map_size(growth);
    let config = GrowthConfig {
        width,
        height,
        ..growth.clone()
    };
    config.validate()?;

    let mut grid = Grid::new(width, height);
    let seed_stamp = stamp_footprint(&mut grid, &footprint, profile.corridor, config.no_dig_margin)?;

    let mut rng = DungeonRng::new(seed);
    let palette = Palette {
        floor: profile.floor,
        corridor: profile.corridor,
    };
    let outcome = grow_rooms(&mut grid, &seed_stamp, &config, palette, &mut rng);
    let mut rooms = outcome.rooms;

    let removed_corridors = remove_dangling_corridors(&mut grid);
    let bands = assign_distance_bands(&mut grid, &rooms, &profile.bands, profile.distance_metric);

    for room in &mut rooms {
        room.rebuild_info(&mut grid, config.edge_band_width);
    }
    let index = DungeonMapIndex::build(&grid, &rooms);

    info!(
        profile = %profile.name,
        width,
        height,
        rooms = rooms.len(),
        target = outcome.stats.target,
        corridors = index.corridors().len(),
        removed_corridors,
        "dungeon built"
    );

    Ok(Dungeon {
        seed,
        profile: profile.name.clone(),
        grid,
        rooms,
        index,
        seed_stamp,
        bands,
        stats: outcome.stats,
        removed_corridors,
        rng,
    })
}

/// Owns the committed dungeon and the event hub
#[derive(Debug, Default)]
pub struct DungeonHost {
    current: Option<Dungeon>,
    events: EventHub,
    commits: u32,
}

impl DungeonHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: EventHub) -> Self {
        Self {
            current: None,
            events,
            commits: 0,
        }
    }

    pub fn current(&self) -> Option<&Dungeon> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Dungeon> {
        self.current.as_mut()
    }

    pub fn events_mut(&mut self) -> &mut EventHub {
        &mut self.events
    }

    /// Number of successful commits so far
    pub fn commits(&self) -> u32 {
        self.commits
    }

    /// Build a new dungeon and commit it
    ///
    /// On failure the committed dungeon is untouched. On success it is
    /// replaced, then `RoomReady` is emitted for every room in order.
    pub fn regenerate(
        &mut self,
        seed: u32,
        growth: &GrowthConfig,
        profile: Option<&BiomeProfile>,
        footprint: Option<&dyn FootprintProvider>,
    ) -> Result<&Dungeon, GenError> {
        let scratch = build_dungeon(seed, growth, profile, footprint)?;
        self.commits += 1;
        let dungeon = self.current.insert(scratch);
        info!(seed, commit = self.commits, rooms = dungeon.rooms.len(), "committed dungeon");
        for room in &dungeon.rooms {
            self.events.emit(DungeonEvent::RoomReady(room.id()));
        }
        Ok(&*dungeon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IntRange;
    use crate::dungeon::{CellKind, FloorKind, SeedFootprint};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn growth(rooms: i32) -> GrowthConfig {
        GrowthConfig {
            room_count: Some(IntRange::new(rooms, rooms)),
            ..GrowthConfig::default()
        }
    }

    #[test]
    fn test_build_pipeline() {
        let fp = SeedFootprint::builtin();
        let profile = BiomeProfile::default();
        let dungeon = build_dungeon(42, &growth(6), Some(&profile), Some(&fp)).unwrap();

        assert_eq!(dungeon.seed, 42);
        assert!((1..=6).contains(&dungeon.room_count()));
        assert_eq!(dungeon.index.room_count(), dungeon.room_count());
        assert_eq!(dungeon.bands.distances.len(), dungeon.room_count());
        assert_eq!(dungeon.bands.distance(0), Some(0));
        for room in &dungeon.rooms {
            assert!(!room.info.interior.is_empty());
            assert!(!room.info.entrances.is_empty(), "{} has no entrance", room.id());
        }
        assert_eq!(dungeon.room(RoomId(0)).map(|r| r.id()), Some(RoomId(0)));
    }

    #[test]
    fn test_missing_inputs() {
        let fp = SeedFootprint::builtin();
        let profile = BiomeProfile::default();
        assert_eq!(
            build_dungeon(1, &growth(3), None, Some(&fp)).unwrap_err(),
            GenError::MissingProfile
        );
        assert_eq!(
            build_dungeon(1, &growth(3), Some(&profile), None).unwrap_err(),
            GenError::MissingFootprint
        );
    }

    #[test]
    fn test_profile_size_override_is_validated() {
        let fp = SeedFootprint::builtin();
        let profile = BiomeProfile {
            width: Some(12),
            height: Some(10),
            ..BiomeProfile::default()
        };
        assert!(matches!(
            build_dungeon(1, &growth(3), Some(&profile), Some(&fp)),
            Err(GenError::FootprintTooLarge { map_width: 12, map_height: 10, .. })
        ));
    }

    #[test]
    fn test_profile_floor_and_bands_are_applied() {
        let fp = SeedFootprint::builtin();
        let profile = BiomeProfile {
            floor: FloorKind::Sand,
            bands: vec![crate::dungeon::BiomeBand {
                min_distance: 1,
                floor: FloorKind::Ice,
            }],
            ..BiomeProfile::default()
        };
        let dungeon = build_dungeon(7, &growth(5), Some(&profile), Some(&fp)).unwrap();
        let first = &dungeon.rooms[0];
        assert!(first.info.interior.iter().all(|p| dungeon.grid.kind(*p) == Some(CellKind::Floor(FloorKind::Sand))));
        for (i, room) in dungeon.rooms.iter().enumerate().skip(1) {
            assert_eq!(dungeon.bands.band(i), Some(0));
            assert!(room.info.interior.iter().all(|p| dungeon.grid.kind(*p) == Some(CellKind::Floor(FloorKind::Ice))));
        }
    }

    #[test]
    fn test_host_commits_only_on_success() {
        let fp = SeedFootprint::builtin();
        let profile = BiomeProfile::default();
        let ready = Rc::new(RefCell::new(Vec::new()));
        let mut host = DungeonHost::new();
        let r = Rc::clone(&ready);
        host.events_mut().subscribe(move |e| {
            if let DungeonEvent::RoomReady(id) = e {
                r.borrow_mut().push(*id);
            }
        });

        let rooms = host.regenerate(42, &growth(4), Some(&profile), Some(&fp)).unwrap().room_count();
        assert_eq!(ready.borrow().len(), rooms);
        assert_eq!(host.commits(), 1);
        let committed = host.current().unwrap().grid.clone();

        // A failed rebuild keeps the previous dungeon and emits nothing
        let err = host.regenerate(43, &growth(4), None, Some(&fp));
        assert_eq!(err.unwrap_err(), GenError::MissingProfile);
        assert_eq!(host.commits(), 1);
        assert_eq!(host.current().unwrap().seed, 42);
        assert_eq!(host.current().unwrap().grid, committed);
        assert_eq!(ready.borrow().len(), rooms);
    }

    #[test]
    fn test_build_from_config() {
        let config = DungeonConfig::default();
        let fp = SeedFootprint::builtin();
        let a = build_from_config(5, &config, Some(&fp)).unwrap();
        let b = build_from_config(5, &config, Some(&fp)).unwrap();
        assert_eq!(a.grid, b.grid);
        assert_eq!(a.index, b.index);
    }
}
