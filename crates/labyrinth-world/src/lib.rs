//! # Labyrinth World
//!
//! Maze and terrain generation.
//!
//! This crate handles:
//! - The block grid data model (walls, traits, height)
//! - Perfect maze carving over a coarse cell grid
//! - Forest and lava regions with their territories
//! - Noise heightmaps and downhill rivers
//! - Imprinting maze walls onto the block grid

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod block;
pub mod config;
pub mod generation;
pub mod heightmap;
pub mod imprint;
pub mod maze;
pub mod regions;
pub mod rivers;
pub mod territory;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::block::*;
    pub use crate::config::*;
    pub use crate::generation::*;
    pub use crate::heightmap::*;
    pub use crate::imprint::*;
    pub use crate::maze::{Cell, Maze};
    pub use crate::regions::*;
    pub use crate::rivers::*;
    pub use crate::territory::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_common::GridPos;

    #[test]
    fn test_grid_dimensions_follow_config() {
        let config = WorldConfig::default();
        let grid = BlockGrid::new(config.grid_width(), config.grid_height());
        assert_eq!(grid.len(), 100 * 75);
        assert!(grid.contains(GridPos::new(99, 74)));
        assert!(!grid.contains(GridPos::new(100, 0)));
    }

    #[test]
    fn test_generate_small_world() {
        let mut config = WorldConfig::default();
        config.maze.width = 8;
        config.maze.height = 8;
        config.regions.forest.max_radius = 8;
        config.regions.lava.max_radius = 8;
        let generator = WorldGenerator::new(config).expect("valid config");
        let world = generator.generate_with_seed(99).expect("generation failed");
        assert_eq!(world.grid.width(), 40);
        assert_eq!(world.maze.open_passages(), 63);
    }
}
