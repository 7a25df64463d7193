//! Engine configuration.
//!
//! The world generation settings plus an optional fixed seed, read from a
//! TOML file. Generation tables (`[maze]`, `[regions.forest]`, `[noise]`,
//! ...) sit at the top level of the file next to `seed`.

use labyrinth_common::{ConfigError, LabyrinthResult};
use labyrinth_gameplay::DEFAULT_LIGHT_RADIUS;
use labyrinth_world::WorldConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tracing::info;

/// Configuration file name used when no path is given.
pub const CONFIG_FILE: &str = "labyrinth.toml";

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// World seed (None = random)
    pub seed: Option<u64>,
    /// Reach of the agent's light in blocks
    pub light_radius: u32,
    /// World generation settings
    #[serde(flatten)]
    pub world: WorldConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            light_radius: DEFAULT_LIGHT_RADIUS,
            world: WorldConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a specific path.
    ///
    /// Returns the default config if the file doesn't exist. A file that
    /// exists but cannot be read or parsed is an error.
    pub fn load_from<P: AsRef<Path>>(path: P) -> LabyrinthResult<Self> {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }
}
