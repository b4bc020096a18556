//! Headless encounter runner.
//!
//! Run with: `cargo run -p deluge-sim -- --arena ember_hall --seconds 60`
mod runner;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use runner::{Simulation, SimulationOptions};

/// Run a boss encounter without a renderer and log the outcome
#[derive(Parser)]
#[command(name = "deluge-sim")]
#[command(about = "Headless combat encounter runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Content directory (config.toml, templates.ron, arenas/)
    #[arg(short, long, value_name = "DIR", default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data"))]
    data_dir: PathBuf,

    /// Arena name under `arenas/`
    #[arg(short, long, default_value = "ember_hall")]
    arena: String,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 60.0)]
    seconds: f32,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Encounter seed
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Spawn requests are ignored once this many combatants are alive
    #[arg(long, default_value_t = 64)]
    max_combatants: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = SimulationOptions {
        seconds: cli.seconds,
        dt: cli.dt,
        seed: cli.seed,
        max_combatants: cli.max_combatants,
    };

    let mut simulation = Simulation::load(&cli.data_dir, &cli.arena, options)?;
    let summary = simulation.run();
    summary.log();
    Ok(())
}
