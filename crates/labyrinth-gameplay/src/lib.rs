//! # Labyrinth Gameplay
//!
//! Gameplay systems that read a finished world.
//!
//! This crate provides:
//! - Breadth-first path finding with a longest-path fallback
//! - The move legality check shared by path finding and agents
//! - Agent spawn selection
//! - Line-of-sight light casting

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod light;
pub mod pathfinding;
pub mod spawn;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::light::*;
    pub use crate::pathfinding::*;
    pub use crate::spawn::*;
}

pub use prelude::*;
