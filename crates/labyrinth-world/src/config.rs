//! World generation configuration.
//!
//! Every section derives serde with `#[serde(default)]`, so a partial TOML
//! file only overrides the keys it names. [`WorldConfig::validate`] rejects
//! geometry and parameters that cannot produce a world before any phase
//! runs.

use labyrinth_common::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

use crate::regions::RegionCategory;

/// Highest octave count the noise backend supports.
pub const MAX_OCTAVES: usize = 32;

/// Longest grid side in blocks; block coordinates are `i32`.
pub const MAX_GRID_SIDE: u32 = i32::MAX as u32;

/// Complete world generation configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Maze dimensions and block resolution
    pub maze: MazeConfig,
    /// Region quotas per category
    pub regions: RegionsConfig,
    /// Heightmap noise parameters
    pub noise: NoiseConfig,
    /// River routing parameters
    pub rivers: RiverConfig,
}

/// Maze dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Maze width in cells
    pub width: u32,
    /// Maze height in cells
    pub height: u32,
    /// Blocks along one side of a cell
    pub blocks_in_cell: u32,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            width: 20,
            height: 15,
            blocks_in_cell: 5,
        }
    }
}

/// Placement and fill parameters for one region category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionSpec {
    /// Number of circles to place (best effort)
    pub count: u32,
    /// Smallest circle radius in blocks
    pub min_radius: u32,
    /// Largest circle radius in blocks
    pub max_radius: u32,
    /// Fraction of the territory to fill with the category's feature
    pub fill_pct: f64,
    /// Smallest lake worth keeping (lava only)
    pub min_lake_size: u32,
    /// Largest lake grown from one seed (lava only)
    pub max_lake_size: u32,
}

impl Default for RegionSpec {
    fn default() -> Self {
        Self {
            count: 3,
            min_radius: 5,
            max_radius: 10,
            fill_pct: 0.3,
            min_lake_size: 6,
            max_lake_size: 30,
        }
    }
}

/// Region quotas, one entry per category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionsConfig {
    /// Forest stands
    pub forest: RegionSpec,
    /// Lava fields
    pub lava: RegionSpec,
}

impl Default for RegionsConfig {
    fn default() -> Self {
        Self {
            forest: RegionSpec {
                count: 4,
                min_radius: 6,
                max_radius: 12,
                fill_pct: 0.2,
                ..RegionSpec::default()
            },
            lava: RegionSpec {
                count: 3,
                min_radius: 5,
                max_radius: 10,
                fill_pct: 0.4,
                min_lake_size: 6,
                max_lake_size: 30,
            },
        }
    }
}

impl RegionsConfig {
    /// Settings for one category.
    #[must_use]
    pub const fn spec(&self, category: RegionCategory) -> &RegionSpec {
        match category {
            RegionCategory::Forest => &self.forest,
            RegionCategory::Lava => &self.lava,
        }
    }

    /// Categories paired with their specs, in placement order.
    #[must_use]
    pub fn categories(&self) -> Vec<(RegionCategory, &RegionSpec)> {
        RegionCategory::ALL
            .iter()
            .map(|&c| (c, self.spec(c)))
            .collect()
    }

    /// Total number of circles requested across all categories.
    #[must_use]
    pub fn requested(&self) -> u32 {
        RegionCategory::ALL.iter().map(|&c| self.spec(c).count).sum()
    }
}

/// Fractal noise parameters for the heightmap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    /// Multiplier applied to block coordinates before sampling
    pub scale: f64,
    /// Number of noise layers
    pub octaves: usize,
    /// Amplitude falloff per octave
    pub persistence: f64,
    /// Frequency growth per octave
    pub lacunarity: f64,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            scale: 0.05,
            octaves: 4,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }
}

/// River routing parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiverConfig {
    /// Rivers to attempt
    pub count: u32,
    /// Shortest river kept
    pub min_length: u32,
    /// Longest river routed
    pub max_length: u32,
    /// Minimum Manhattan distance between river sources
    pub min_distance: u32,
    /// Ticks per move for an agent wading through a river
    pub speed_in_river: u32,
}

impl Default for RiverConfig {
    fn default() -> Self {
        Self {
            count: 6,
            min_length: 10,
            max_length: 120,
            min_distance: 15,
            speed_in_river: 2,
        }
    }
}

impl WorldConfig {
    /// Block grid width.
    ///
    /// Saturates for configurations that [`validate`](Self::validate)
    /// rejects as too large.
    #[must_use]
    pub const fn grid_width(&self) -> u32 {
        self.maze.width.saturating_mul(self.maze.blocks_in_cell)
    }

    /// Block grid height.
    #[must_use]
    pub const fn grid_height(&self) -> u32 {
        self.maze.height.saturating_mul(self.maze.blocks_in_cell)
    }

    /// Checks that the configuration can drive a generation run.
    pub fn validate(&self) -> ConfigResult<()> {
        non_zero("maze.width", self.maze.width)?;
        non_zero("maze.height", self.maze.height)?;
        non_zero("maze.blocks_in_cell", self.maze.blocks_in_cell)?;
        let (width, height) = self.checked_grid_size()?;
        for (category, spec) in self.regions.categories() {
            if spec.count == 0 {
                continue;
            }
            let name = category.name();
            ordered(format!("regions.{name}.radius"), spec.min_radius, spec.max_radius)?;
            if spec.max_radius.saturating_mul(2) > width.min(height) {
                return Err(ConfigError::RadiusTooLarge {
                    category: name.to_string(),
                    radius: spec.max_radius,
                    width,
                    height,
                });
            }
            fraction(format!("regions.{name}.fill_pct"), spec.fill_pct)?;
        }

        let lava = &self.regions.lava;
        if lava.count > 0 && lava.fill_pct > 0.0 {
            non_zero("regions.lava.max_lake_size", lava.max_lake_size)?;
            ordered(
                "regions.lava.lake_size".to_string(),
                lava.min_lake_size,
                lava.max_lake_size,
            )?;
        }

        positive("noise.scale", self.noise.scale)?;
        positive("noise.persistence", self.noise.persistence)?;
        positive("noise.lacunarity", self.noise.lacunarity)?;
        non_zero("noise.octaves", self.noise.octaves as u32)?;
        if self.noise.octaves > MAX_OCTAVES {
            return Err(ConfigError::TooLarge {
                field: "noise.octaves",
                value: self.noise.octaves as u64,
                max: MAX_OCTAVES as u64,
            });
        }

        if self.rivers.count > 0 {
            ordered(
                "rivers.length".to_string(),
                self.rivers.min_length,
                self.rivers.max_length,
            )?;
        }
        non_zero("rivers.speed_in_river", self.rivers.speed_in_river)?;

        Ok(())
    }

    /// Block grid dimensions, rejected when either side overflows or does
    /// not fit signed block coordinates.
    fn checked_grid_size(&self) -> ConfigResult<(u32, u32)> {
        let n = self.maze.blocks_in_cell;
        let side = |cells: u32| {
            cells
                .checked_mul(n)
                .filter(|&blocks| blocks <= MAX_GRID_SIDE)
        };
        match (side(self.maze.width), side(self.maze.height)) {
            (Some(width), Some(height)) => Ok((width, height)),
            _ => Err(ConfigError::GridTooLarge {
                width: self.maze.width,
                height: self.maze.height,
                blocks_in_cell: n,
                max: MAX_GRID_SIDE,
            }),
        }
    }
}

fn non_zero(field: &'static str, value: u32) -> ConfigResult<()> {
    if value == 0 {
        return Err(ConfigError::Zero { field });
    }
    Ok(())
}

fn ordered(field: String, min: u32, max: u32) -> ConfigResult<()> {
    if min > max {
        return Err(ConfigError::InvertedRange { field, min, max });
    }
    Ok(())
}

fn fraction(field: String, value: f64) -> ConfigResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::FractionOutOfRange { field, value });
    }
    Ok(())
}

fn positive(field: &'static str, value: f64) -> ConfigResult<()> {
    if value.is_nan() || value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}
