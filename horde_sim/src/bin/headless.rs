use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use horde_sim::{
    build_headless_app, load_simulation_config_from_env, run_tick, SimulationConfig,
    SimulationMetrics, TickSnapshot,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless zombie/human actor simulation", long_about = None)]
struct Args {
    /// Number of ticks to run
    #[arg(long, default_value_t = 600)]
    ticks: u64,

    /// Seconds advanced by each tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// Simulation config JSON (defaults to HORDE_SIM_CONFIG_PATH or the builtin)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured human count
    #[arg(long)]
    humans: Option<usize>,

    /// Override the configured zombie count
    #[arg(long)]
    zombies: Option<usize>,

    /// Write the final tick snapshot as JSON
    #[arg(long)]
    snapshot_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::from_file(path)
            .with_context(|| format!("Failed to load config at {}", path.display()))?,
        None => load_simulation_config_from_env().0,
    };
    if let Some(humans) = args.humans {
        config.population.human_count = humans;
    }
    if let Some(zombies) = args.zombies {
        config.population.zombie_count = zombies;
    }

    let mut app = build_headless_app(config);
    info!(ticks = args.ticks, dt = args.dt, "horde headless run starting");

    for tick in 0..args.ticks {
        run_tick(&mut app, args.dt).with_context(|| format!("Tick {} faulted", tick + 1))?;
        let metrics = app.world.resource::<SimulationMetrics>();
        if metrics.humans == 0 {
            info!(tick = metrics.tick, "no humans left");
            break;
        }
    }

    let metrics = app.world.resource::<SimulationMetrics>();
    info!(
        tick = metrics.tick,
        humans = metrics.humans,
        zombies = metrics.zombies,
        total_conversions = metrics.total_conversions,
        "horde headless run finished"
    );

    if let Some(path) = &args.snapshot_out {
        let snapshot = app.world.resource::<TickSnapshot>();
        let json = serde_json::to_string_pretty(snapshot)
            .with_context(|| "Failed to serialize snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write snapshot to {}", path.display()))?;
        info!(path = %path.display(), digest = snapshot.digest, "snapshot written");
    }

    Ok(())
}
