//! Dungeon generator front-end
//!
//! Builds one dungeon and prints it as ASCII with a short summary, or as a
//! JSON summary of the map index.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use dg_core::config::{DungeonConfig, IntRange};
use dg_core::dungeon::{CellFeatures, SeedFootprint};
use dg_core::generator::{Dungeon, build_from_config};
use dg_core::placement::{Population, populate};
use dg_core::rng::DungeonRng;

/// Seeded room-and-corridor dungeon generator
#[derive(Parser, Debug)]
#[command(name = "dungeon-gen")]
#[command(author, version, about = "Grow a dungeon from a seed footprint", long_about = None)]
struct Args {
    /// Generation seed (random if omitted)
    #[arg(short = 's', long = "seed")]
    seed: Option<u32>,

    /// Exact number of rooms to aim for
    #[arg(short = 'r', long = "rooms")]
    rooms: Option<i32>,

    /// Map width in cells
    #[arg(short = 'W', long = "width")]
    width: Option<i32>,

    /// Map height in cells
    #[arg(short = 'H', long = "height")]
    height: Option<i32>,

    /// Grow depth-first (long corridors) instead of breadth-first
    #[arg(short = 'd', long = "depth-first")]
    depth_first: bool,

    /// JSON config file with growth, profile and placer settings
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// ASCII seed footprint ('#' wall, '.' floor, '+' corridor exit)
    #[arg(short = 'f', long = "footprint")]
    footprint: Option<PathBuf>,

    /// Run the placers (puzzles, props, traps, doors)
    #[arg(short = 'p', long = "populate")]
    populate: bool,

    /// Print a JSON summary instead of the map
    #[arg(long = "json")]
    json: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn load_config(args: &Args) -> Result<DungeonConfig, Box<dyn Error>> {
    let mut config = match &args.config {
        Some(path) => DungeonConfig::load(path)?,
        None => DungeonConfig::default(),
    };

    let growth = &mut config.growth;
    if let Some(rooms) = args.rooms {
        growth.room_count = Some(IntRange::new(rooms, rooms));
    }
    // Explicit size flags beat the profile override
    if let Some(width) = args.width {
        growth.width = width;
        config.profile.width = None;
    }
    if let Some(height) = args.height {
        growth.height = height;
        config.profile.height = None;
    }
    if args.depth_first {
        growth.depth_first = true;
    }
    Ok(config)
}

fn load_footprint(args: &Args) -> Result<SeedFootprint, Box<dyn Error>> {
    match &args.footprint {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("cannot read footprint {}: {e}", path.display()))?;
            debug!(path = %path.display(), "loaded footprint");
            Ok(SeedFootprint::from_ascii(&text))
        }
        None => Ok(SeedFootprint::builtin()),
    }
}

fn print_summary(dungeon: &Dungeon, population: Option<&Population>) {
    let stats = &dungeon.stats;
    println!(
        "seed {}  profile {}  {}x{}",
        dungeon.seed,
        dungeon.profile,
        dungeon.grid.width(),
        dungeon.grid.height()
    );
    println!(
        "rooms {}/{}  corridors {}  fronts popped {} dropped {}  cleaned {}",
        dungeon.room_count(),
        stats.target,
        dungeon.index.corridors().len(),
        stats.fronts_popped,
        stats.fronts_dropped,
        dungeon.removed_corridors
    );
    for (i, room) in dungeon.rooms.iter().enumerate() {
        let b = room.bounds();
        println!(
            "  {:<9} {:>3},{:<3} {:>2}x{:<2} depth {:<2} distance {:<2} entrances {}",
            room.id().to_string(),
            b.lx,
            b.ly,
            b.width(),
            b.height(),
            room.depth(),
            dungeon.bands.distance(i).map_or_else(|| "-".to_string(), |d| d.to_string()),
            room.info.entrances.len()
        );
    }
    if let Some(pop) = population {
        println!(
            "puzzles {}  props {}  traps {}  doors {}",
            pop.puzzles.len(),
            pop.props.len(),
            pop.traps.len(),
            pop.doors.len()
        );
    }
}

fn json_summary(dungeon: &Dungeon, population: Option<&Population>) -> serde_json::Value {
    let rooms: Vec<_> = dungeon.index.rooms().collect();
    json!({
        "seed": dungeon.seed,
        "profile": dungeon.profile,
        "width": dungeon.grid.width(),
        "height": dungeon.grid.height(),
        "entrance": dungeon.seed_stamp.entrance,
        "stats": dungeon.stats,
        "removed_corridors": dungeon.removed_corridors,
        "distances": dungeon.bands.distances,
        "rooms": rooms,
        "corridors": dungeon.index.corridors(),
        "walls": dungeon.index.cells_with(CellFeatures::WALL).count(),
        "population": population,
        "map": dungeon.grid.to_string().lines().collect::<Vec<_>>(),
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_tracing();

    let config = load_config(&args)?;
    let footprint = load_footprint(&args)?;
    let seed = args.seed.unwrap_or_else(|| DungeonRng::from_entropy().seed());
    info!(seed, "generating");

    let mut dungeon = build_from_config(seed, &config, Some(&footprint))?;
    let population = args.populate.then(|| populate(&mut dungeon, &config));

    if args.json {
        let summary = json_summary(&dungeon, population.as_ref());
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", dungeon.grid);
        println!();
        print_summary(&dungeon, population.as_ref());
    }
    Ok(())
}
