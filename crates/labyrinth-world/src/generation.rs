//! World generation pipeline.
//!
//! [`WorldGenerator`] owns the phase order. Every phase writes into the same
//! block grid and reads what earlier phases committed:
//!
//! 1. region placement
//! 2. forest planting
//! 3. lava lake carving
//! 4. heightmap
//! 5. river routing
//! 6. maze carving
//! 7. maze imprinting

use labyrinth_common::{ConfigResult, GenerationError, LabyrinthResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::block::BlockGrid;
use crate::config::WorldConfig;
use crate::heightmap::apply_heightmap;
use crate::imprint::imprint_maze;
use crate::maze::{self, Maze};
use crate::regions::{place_regions, Circle, RegionCategory};
use crate::rivers::route_rivers;
use crate::territory::{carve_lava_lakes, plant_forest, Territory};

/// Summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Forest circles placed
    pub forest_regions: usize,
    /// Lava circles placed
    pub lava_regions: usize,
    /// Trees planted
    pub trees: usize,
    /// Lava lakes committed
    pub lakes: usize,
    /// Lakes discarded for being too small
    pub discarded_lakes: usize,
    /// Blocks carrying lava
    pub lava_blocks: usize,
    /// Seed the heightmap noise was built from
    pub noise_seed: u32,
    /// River sources found on high ground
    pub river_sources: usize,
    /// Rivers kept
    pub rivers: usize,
    /// Rivers rolled back for being too short
    pub rolled_back_rivers: usize,
    /// Blocks carrying river water
    pub river_blocks: usize,
    /// Block walls closed by the imprinter
    pub walls_closed: usize,
}

/// A finished world.
#[derive(Debug, Clone)]
pub struct World {
    /// Terrain blocks with imprinted walls
    pub grid: BlockGrid,
    /// Coarse maze the walls came from
    pub maze: Maze,
    /// Blocks covered by forest circles
    pub forest: Territory,
    /// Blocks covered by lava circles
    pub lava: Territory,
    /// Placed regions
    pub regions: Vec<Circle>,
    /// Run summary
    pub report: GenerationReport,
}

/// Runs the generation phases for one configuration.
#[derive(Debug, Clone)]
pub struct WorldGenerator {
    config: WorldConfig,
}

impl WorldGenerator {
    /// Creates a generator, rejecting configurations that cannot produce a
    /// world.
    pub fn new(config: WorldConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the generator configuration.
    #[must_use]
    pub const fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Generates a world from a seed.
    pub fn generate_with_seed(&self, seed: u64) -> LabyrinthResult<World> {
        self.generate(&mut fastrand::Rng::with_seed(seed))
    }

    /// Generates a world, drawing all randomness from `rng`.
    pub fn generate(&self, rng: &mut fastrand::Rng) -> LabyrinthResult<World> {
        let config = &self.config;
        let mut grid = BlockGrid::new(config.grid_width(), config.grid_height());
        let mut report = GenerationReport::default();

        let regions = place_regions(
            &config.regions.categories(),
            grid.width(),
            grid.height(),
            rng,
        );
        report.forest_regions = count_category(&regions, RegionCategory::Forest);
        report.lava_regions = count_category(&regions, RegionCategory::Lava);
        if config.regions.requested() > 0 && regions.is_empty() {
            return Err(GenerationError::Incomplete {
                phase: "regions",
                reason: format!("none of {} requested regions fit", config.regions.requested()),
            }
            .into());
        }

        let forest = Territory::from_circles(RegionCategory::Forest, &regions, &grid);
        let forest_stats = plant_forest(&mut grid, &forest, config.regions.forest.fill_pct, rng);
        report.trees = forest_stats.trees;

        let lava = Territory::from_circles(RegionCategory::Lava, &regions, &grid);
        let lava_stats = carve_lava_lakes(&mut grid, &lava, &config.regions.lava, rng);
        report.lakes = lava_stats.lakes.len();
        report.discarded_lakes = lava_stats.discarded;
        report.lava_blocks = lava_stats.lava_blocks();

        report.noise_seed = apply_heightmap(&mut grid, &config.noise, rng);

        let river_stats = route_rivers(&mut grid, &lava, &config.rivers);
        report.river_sources = river_stats.sources;
        report.rivers = river_stats.rivers.len();
        report.rolled_back_rivers = river_stats.rolled_back;
        report.river_blocks = river_stats.rivers.iter().map(Vec::len).sum();
        if config.rivers.count > 0 && river_stats.sources == 0 {
            return Err(GenerationError::Incomplete {
                phase: "rivers",
                reason: "no river source outside lava territory".to_string(),
            }
            .into());
        }

        let maze = maze::generate(config.maze.width, config.maze.height, rng);
        report.walls_closed = imprint_maze(&maze, &mut grid, config.maze.blocks_in_cell);

        info!(
            "Generated {}x{} world: {} regions, {} trees, {} lava lakes, {} rivers",
            grid.width(),
            grid.height(),
            regions.len(),
            report.trees,
            report.lakes,
            report.rivers
        );

        Ok(World {
            grid,
            maze,
            forest,
            lava,
            regions,
            report,
        })
    }
}

fn count_category(regions: &[Circle], category: RegionCategory) -> usize {
    regions.iter().filter(|c| c.category == category).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Traits;
    use labyrinth_common::ConfigError;

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = WorldConfig::default();
        config.maze.blocks_in_cell = 0;
        assert!(matches!(
            WorldGenerator::new(config),
            Err(ConfigError::Zero { .. })
        ));
    }

    #[test]
    fn test_generation_deterministic() {
        let generator = WorldGenerator::new(WorldConfig::default()).expect("valid config");
        let world1 = generator.generate_with_seed(42).expect("generation failed");
        let world2 = generator.generate_with_seed(42).expect("generation failed");

        assert_eq!(world1.grid.blocks(), world2.grid.blocks());
        assert_eq!(world1.regions, world2.regions);
        assert_eq!(world1.report, world2.report);
    }

    #[test]
    fn test_world_matches_report() {
        let generator = WorldGenerator::new(WorldConfig::default()).expect("valid config");
        let world = generator.generate_with_seed(7).expect("generation failed");
        let report = &world.report;

        assert_eq!(world.grid.width(), 100);
        assert_eq!(world.grid.height(), 75);
        assert_eq!(world.grid.count_traits(Traits::FOREST), report.trees);
        assert_eq!(world.grid.count_traits(Traits::LAVA), report.lava_blocks);
        assert_eq!(world.grid.count_traits(Traits::RIVER), report.river_blocks);
        assert_eq!(report.forest_regions + report.lava_regions, world.regions.len());
        assert!(report.walls_closed > 0);
    }

    #[test]
    fn test_features_stay_in_their_territories() {
        let generator = WorldGenerator::new(WorldConfig::default()).expect("valid config");
        let world = generator.generate_with_seed(1234).expect("generation failed");
        for block in world.grid.blocks() {
            if block.traits.contains(Traits::LAVA) {
                assert!(world.lava.contains(block.pos));
            }
            if block.traits.contains(Traits::FOREST) {
                assert!(world.forest.contains(block.pos));
            }
            if block.traits.contains(Traits::RIVER) {
                assert!(!world.lava.contains(block.pos));
                assert_eq!(block.traits, Traits::RIVER);
            }
        }
    }

    #[test]
    fn test_bare_world_without_features() {
        let mut config = WorldConfig::default();
        config.regions.forest.count = 0;
        config.regions.lava.count = 0;
        config.rivers.count = 0;
        let generator = WorldGenerator::new(config).expect("valid config");
        let world = generator.generate_with_seed(5).expect("generation failed");

        assert!(world.regions.is_empty());
        assert!(world.grid.blocks().iter().all(|b| b.traits.is_empty()));
        assert_eq!(world.maze.open_passages(), 20 * 15 - 1);
    }
}
