//! Application pipeline.
//!
//! Loads configuration, generates a world, spawns an agent and searches a
//! route from the spawn block to a random target.

use anyhow::{Context, Result};
use std::collections::HashSet;
use tracing::{info, warn};

use labyrinth_common::{GenerationError, GridPos};
use labyrinth_gameplay::{cast_light, find_path, find_spawn, travel_ticks, PathResult};
use labyrinth_world::{World, WorldGenerator};

use crate::config::EngineConfig;
use crate::dump;
use crate::Args;

/// One generated world with an agent's search on it.
#[derive(Debug)]
pub struct Session {
    /// Seed the world was generated from
    pub seed: u64,
    /// Generated world
    pub world: World,
    /// Agent spawn block
    pub spawn: GridPos,
    /// Blocks lit by the agent's light at the spawn
    pub lit: HashSet<GridPos>,
    /// Search goal, if any walkable block besides the spawn exists
    pub target: Option<GridPos>,
    /// Search outcome
    pub result: PathResult,
}

/// Generates a world and runs one search on it.
pub fn run_session(config: &EngineConfig, seed: u64) -> Result<Session> {
    let generator =
        WorldGenerator::new(config.world.clone()).context("Invalid world configuration")?;
    let mut rng = fastrand::Rng::with_seed(seed);
    let world = generator.generate(&mut rng)?;

    let spawn = find_spawn(&world.grid).ok_or_else(|| GenerationError::Incomplete {
        phase: "spawn",
        reason: "no clear block in the central region".to_string(),
    })?;
    let lit = cast_light(&world.grid, spawn, config.light_radius);

    let walkable: Vec<GridPos> = world
        .grid
        .blocks()
        .iter()
        .filter(|b| b.pos != spawn && b.traits.is_walkable())
        .map(|b| b.pos)
        .collect();
    let target = if walkable.is_empty() {
        warn!("No walkable block besides the spawn, skipping search");
        None
    } else {
        Some(walkable[rng.usize(..walkable.len())])
    };

    let targets: HashSet<GridPos> = target.into_iter().collect();
    let result = find_path(&world.grid, spawn, &HashSet::new(), &targets);

    Ok(Session {
        seed,
        world,
        spawn,
        lit,
        target,
        result,
    })
}

/// Runs the command line application.
pub fn run(args: &Args) -> Result<()> {
    let mut config = EngineConfig::load_from(&args.config)
        .with_context(|| format!("Failed to load {}", args.config.display()))?;

    if args.init_config {
        config
            .save_to(&args.config)
            .with_context(|| format!("Failed to write {}", args.config.display()))?;
        return Ok(());
    }

    if args.seed.is_some() {
        config.seed = args.seed;
    }
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    info!("World seed: {seed}");
    info!(
        "Maze: {}x{} cells, {} blocks per cell",
        config.world.maze.width, config.world.maze.height, config.world.maze.blocks_in_cell
    );

    let session = run_session(&config, seed)?;
    let report = &session.world.report;
    info!(
        "Regions: {} forest, {} lava; lakes: {} kept, {} discarded; rivers: {} kept, {} rolled back",
        report.forest_regions,
        report.lava_regions,
        report.lakes,
        report.discarded_lakes,
        report.rivers,
        report.rolled_back_rivers
    );
    info!(
        "Agent spawns at {} and sees {} blocks",
        session.spawn,
        session.lit.len()
    );

    if let Some(target) = session.target {
        let route = session.result.route();
        let ticks = travel_ticks(&session.world.grid, route, config.world.rivers.speed_in_river);
        if session.result.found() {
            info!("Reached {target} in {} steps ({ticks} ticks)", route.len() - 1);
        } else {
            info!(
                "{target} unreachable; longest route has {} steps ({ticks} ticks)",
                route.len().saturating_sub(1)
            );
        }
    }

    if args.dump {
        print!(
            "{}",
            dump::render(
                &session.world.grid,
                session.result.route(),
                session.spawn,
                session.target
            )
        );
        print!("{}", dump::legend(&session.world.grid));
    }

    Ok(())
}
