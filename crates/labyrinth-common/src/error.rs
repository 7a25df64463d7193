//! Error types for Labyrinth.

use thiserror::Error;

/// Top-level error type for Labyrinth operations.
#[derive(Debug, Error)]
pub enum LabyrinthError {
    /// Configuration rejected before generation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Generation finished without producing a usable world
    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Invalid configuration, detected before any generation phase runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A dimension or count that must be positive is zero
    #[error("{field} must be greater than zero")]
    Zero {
        /// Offending field
        field: &'static str,
    },

    /// A region cannot fit inside the block grid
    #[error("{category} radius {radius} does not fit a {width}x{height} grid")]
    RadiusTooLarge {
        /// Region category name
        category: String,
        /// Offending radius in blocks
        radius: u32,
        /// Grid width in blocks
        width: u32,
        /// Grid height in blocks
        height: u32,
    },

    /// A min/max pair is inverted
    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedRange {
        /// Offending field pair
        field: String,
        /// Configured minimum
        min: u32,
        /// Configured maximum
        max: u32,
    },

    /// A fraction lies outside [0, 1]
    #[error("{field} must lie within [0, 1], got {value}")]
    FractionOutOfRange {
        /// Offending field
        field: String,
        /// Configured value
        value: f64,
    },

    /// A parameter that must be strictly positive is not
    #[error("{field} must be positive, got {value}")]
    NotPositive {
        /// Offending field
        field: &'static str,
        /// Configured value
        value: f64,
    },

    /// A parameter exceeds its supported maximum
    #[error("{field} must be at most {max}, got {value}")]
    TooLarge {
        /// Offending field
        field: &'static str,
        /// Configured value
        value: u64,
        /// Largest supported value
        max: u64,
    },

    /// The block grid would exceed the coordinate range
    #[error("{width}x{height} cells of {blocks_in_cell} blocks exceed {max} blocks per side")]
    GridTooLarge {
        /// Maze width in cells
        width: u32,
        /// Maze height in cells
        height: u32,
        /// Blocks per cell side
        blocks_in_cell: u32,
        /// Longest supported side in blocks
        max: u32,
    },

    /// The configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Generation ran to completion but could not produce a usable world.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A phase found no candidates within its retry budget
    #[error("Generation incomplete during {phase}: {reason}")]
    Incomplete {
        /// Phase that came up empty
        phase: &'static str,
        /// Human-readable explanation
        reason: String,
    },
}

/// Result type alias for Labyrinth operations.
pub type LabyrinthResult<T> = Result<T, LabyrinthError>;

/// Result type alias for configuration validation.
pub type ConfigResult<T> = Result<T, ConfigError>;
