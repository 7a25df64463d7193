//! Noise-driven elevation.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use tracing::debug;

use crate::block::BlockGrid;
use crate::config::NoiseConfig;

/// Builds the fractal noise field described by `config`.
#[must_use]
pub fn noise_field(config: &NoiseConfig, seed: u32) -> Fbm<Perlin> {
    Fbm::<Perlin>::new(seed)
        .set_octaves(config.octaves)
        .set_frequency(1.0)
        .set_persistence(config.persistence)
        .set_lacunarity(config.lacunarity)
}

/// Assigns every block a height in [0, 1].
///
/// One seed is drawn from `rng` for the whole map, so neighbouring blocks
/// sample the same continuous field. Returns the seed used.
pub fn apply_heightmap(
    grid: &mut BlockGrid,
    config: &NoiseConfig,
    rng: &mut fastrand::Rng,
) -> u32 {
    let seed = rng.u32(..);
    let field = noise_field(config, seed);

    for block in grid.blocks_mut() {
        let sample = field.get([
            f64::from(block.pos.x) * config.scale,
            f64::from(block.pos.y) * config.scale,
        ]);
        block.height = ((sample + 1.0) / 2.0).clamp(0.0, 1.0);
    }

    debug!("Applied heightmap with noise seed {seed}");
    seed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heights_in_unit_range() {
        let mut grid = BlockGrid::new(64, 48);
        let mut rng = fastrand::Rng::with_seed(7);
        apply_heightmap(&mut grid, &NoiseConfig::default(), &mut rng);
        assert!(grid
            .blocks()
            .iter()
            .all(|b| (0.0..=1.0).contains(&b.height)));
    }

    #[test]
    fn test_heightmap_deterministic() {
        let mut grid1 = BlockGrid::new(32, 32);
        let mut grid2 = BlockGrid::new(32, 32);
        let config = NoiseConfig::default();
        let seed1 = apply_heightmap(&mut grid1, &config, &mut fastrand::Rng::with_seed(99));
        let seed2 = apply_heightmap(&mut grid2, &config, &mut fastrand::Rng::with_seed(99));
        assert_eq!(seed1, seed2);
        assert_eq!(grid1.blocks(), grid2.blocks());
    }

    #[test]
    fn test_heightmap_varies() {
        let mut grid = BlockGrid::new(64, 64);
        let mut rng = fastrand::Rng::with_seed(123);
        apply_heightmap(&mut grid, &NoiseConfig::default(), &mut rng);
        let first = grid.blocks()[1].height;
        assert!(grid.blocks().iter().any(|b| (b.height - first).abs() > 1e-6));
    }

    #[test]
    fn test_heightmap_is_continuous() {
        let mut grid = BlockGrid::new(64, 64);
        let config = NoiseConfig {
            scale: 0.02,
            ..NoiseConfig::default()
        };
        apply_heightmap(&mut grid, &config, &mut fastrand::Rng::with_seed(5));
        for pair in grid.blocks().windows(2) {
            if pair[0].pos.y == pair[1].pos.y {
                assert!((pair[0].height - pair[1].height).abs() < 0.25);
            }
        }
    }
}
