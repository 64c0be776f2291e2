//! Flocking Simulation
//!
//! Runs a headless boid flock for a fixed number of ticks and writes JSON
//! snapshots of its state.
//!
//! Examples:
//!   flock_sim --ticks 2000 --population 500
//!   flock_sim --config flock.toml --tick-mode double_buffered
//!   RUST_LOG=flock_core=debug flock_sim --ticks 10

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use flock_core::output::{self, SnapshotGenerator};
use flock_core::{build_flock, FlockConfig, SimError, TickMode};

/// Command line arguments for the simulation
#[derive(Parser, Debug)]
#[command(name = "flock_sim")]
#[command(about = "A headless 3D flocking simulation")]
struct Args {
    /// TOML configuration file (falls back to ./flock.toml, then defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Seconds advanced per tick
    #[arg(long)]
    delta_time: Option<f32>,

    /// Number of agents to spawn
    #[arg(long)]
    population: Option<usize>,

    /// Interval between snapshots (in ticks, 0 disables)
    #[arg(long)]
    snapshot_interval: Option<u64>,

    /// Neighbor read semantics: sequential or double_buffered
    #[arg(long)]
    tick_mode: Option<TickMode>,

    /// Output directory for snapshot files
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

impl Args {
    fn effective_config(&self) -> Result<FlockConfig, SimError> {
        let mut config = match &self.config {
            Some(path) => FlockConfig::from_file(path)?,
            None => FlockConfig::load_or_default(),
        };
        let sim = &mut config.simulation;
        if let Some(seed) = self.seed {
            sim.seed = seed;
        }
        if let Some(ticks) = self.ticks {
            sim.ticks = ticks;
        }
        if let Some(delta_time) = self.delta_time {
            sim.delta_time = delta_time;
        }
        if let Some(interval) = self.snapshot_interval {
            sim.snapshot_interval = interval;
        }
        if let Some(mode) = self.tick_mode {
            sim.tick_mode = mode;
        }
        if let Some(population) = self.population {
            config.flock.population = population;
        }
        Ok(config)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init();
}

fn main() {
    init_tracing();
    let args = Args::parse();
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), SimError> {
    let config = args.effective_config()?;
    if args.print_config {
        println!("{}", config.to_toml()?);
        return Ok(());
    }

    let sim = &config.simulation;
    info!("Flocking Simulation");
    info!(
        seed = sim.seed,
        ticks = sim.ticks,
        delta_time = sim.delta_time,
        tick_mode = %sim.tick_mode,
        index = ?config.index.kind,
        "configuration loaded"
    );

    let (mut flock, _summary) = build_flock(&config)?;
    let mut generator = SnapshotGenerator::new(sim.snapshot_interval);

    let initial = output::generate_snapshot(&flock, generator.next_id(), "simulation_start");
    output::write_snapshot_to_dir(&initial, &args.output_dir)?;
    output::write_current_state(&initial, &args.output_dir)?;
    generator.mark_snapshot(0);
    info!("Wrote initial snapshot (tick 0)");

    let progress_every = (sim.ticks / 10).max(1);
    for _ in 0..sim.ticks {
        flock.tick(sim.delta_time);
        let tick = flock.tick_count();

        if generator.should_snapshot(tick) {
            let snapshot = output::generate_snapshot(&flock, generator.next_id(), "periodic");
            if let Err(e) = output::write_snapshot_to_dir(&snapshot, &args.output_dir) {
                warn!("Could not write snapshot at tick {}: {}", tick, e);
            }
            if let Err(e) = output::write_current_state(&snapshot, &args.output_dir) {
                warn!("Could not write current state at tick {}: {}", tick, e);
            }
            generator.mark_snapshot(tick);
        }

        if tick % progress_every == 0 {
            info!("Tick {} / {} ({})", tick, sim.ticks, flock.clock());
        }
    }

    let final_snapshot = output::generate_snapshot(&flock, generator.next_id(), "simulation_end");
    output::write_snapshot_to_dir(&final_snapshot, &args.output_dir)?;
    output::write_current_state(&final_snapshot, &args.output_dir)?;

    let metrics = &final_snapshot.metrics;
    info!(
        polarization = metrics.polarization,
        mean_speed = metrics.mean_speed,
        outside_boundary = metrics.agents_outside_boundary,
        "Simulation complete. Ran {} ticks, generated {} snapshots.",
        sim.ticks,
        generator.snapshot_count()
    );
    Ok(())
}
