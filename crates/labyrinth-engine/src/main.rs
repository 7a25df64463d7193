//! # Labyrinth
//!
//! Command line driver for maze and terrain generation.
//!
//! Generates a world from a TOML configuration, places an agent and runs a
//! path search on the result:
//! - World: maze, forests, lava lakes, heightmap, rivers
//! - Gameplay: spawn selection and breadth-first path finding

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod config;
mod dump;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Command line options.
#[derive(Parser, Debug)]
#[command(name = "labyrinth")]
#[command(about = "Generate a maze world and search a path across it")]
pub struct Args {
    /// Configuration file (defaults are used if it does not exist)
    #[arg(short, long, default_value = config::CONFIG_FILE)]
    pub config: PathBuf,

    /// Random seed (overrides the config; random if neither sets one)
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Print the generated world to stdout
    #[arg(long)]
    pub dump: bool,

    /// Write the effective configuration to the config path and exit
    #[arg(long)]
    pub init_config: bool,
}

/// Main entry point.
fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("labyrinth=info".parse()?))
        .init();

    let args = Args::parse();

    info!("Labyrinth {} starting", env!("CARGO_PKG_VERSION"));
    app::run(&args)?;
    Ok(())
}
