mod metrics;
mod snapshots;

use clap::Parser;
use std::path::PathBuf;
use std::time::Instant;
use shoal_core::sim::FlockSimulation;
use shoal_params::SimulationConfig;
use metrics::MetricsWriter;
use snapshots::SnapshotWriter;

#[derive(Parser)]
#[command(name = "shoal-headless")]
#[command(about = "Headless CLI runner for Shoal flocking experiments")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,

    /// Output directory for results
    #[arg(short, long, value_name = "DIR")]
    out: PathBuf,

    /// Override the configured step count
    #[arg(long)]
    steps: Option<u32>,

    /// Override the configured random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Write a metrics row every N steps
    #[arg(long, default_value = "50")]
    metrics_every: u32,

    /// Write fish snapshots every N steps
    #[arg(long, default_value = "500")]
    snapshot_every: u32,

    /// Enable strict mode (fail as soon as any fish state turns non-finite)
    #[arg(long)]
    strict: bool,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let cli = Cli::parse();

    // Load configuration
    log::info!("Loading configuration from {}", cli.config.display());
    let mut config: SimulationConfig = serde_yaml::from_str(
        &std::fs::read_to_string(&cli.config)?
    )?;
    if let Some(steps) = cli.steps {
        config.world.steps = steps;
    }
    if let Some(seed) = cli.seed {
        config.world.seed = seed;
    }

    // Validate configuration
    if let Err(reason) = config.validate() {
        anyhow::bail!("Invalid configuration: {}", reason);
    }
    if config.world.steps == 0 {
        anyhow::bail!("Step count must be greater than 0.");
    }
    if cli.metrics_every == 0 || cli.snapshot_every == 0 {
        anyhow::bail!("Metrics and snapshot intervals must be greater than 0.");
    }
    config.log_summary();

    // Create output directory
    std::fs::create_dir_all(&cli.out)?;

    let mut sim = FlockSimulation::new(&config);
    let mut metrics_writer = MetricsWriter::new(&cli.out)?;
    let snapshot_writer = SnapshotWriter::new(&cli.out)?;

    // Main simulation loop
    log::info!("Starting simulation for {} steps (seed {})...", config.world.steps, config.world.seed);
    let start_time = Instant::now();

    for step in 0..=config.world.steps {
        let step_start = Instant::now();
        let time = step as f32 * config.world.dt;

        if step > 0 {
            sim.update(time);
        }

        if cli.strict && !sim.is_finite() {
            anyhow::bail!("Non-finite fish state at step {}", step);
        }

        if step % cli.metrics_every == 0 {
            sim.update_stats();
            let step_time = step_start.elapsed();
            metrics_writer.write_step(step, time, &sim.stats, step_time)?;

            log::info!(
                "Step {}: polarization={:.3}, nn={:.3}, outside={}, Time={:?}",
                step,
                sim.stats.polarization,
                sim.stats.mean_nearest_neighbor,
                sim.stats.outside_tank,
                step_time
            );
        }

        if step % cli.snapshot_every == 0 || step == config.world.steps {
            snapshot_writer.write_fish_snapshot(step, &sim)?;
            snapshot_writer.write_school_image(step, &sim)?;
            log::debug!("Snapshot written for step {}", step);
        }
    }

    if !sim.is_finite() {
        log::warn!("Simulation finished with non-finite fish state");
    }

    let total_time = start_time.elapsed();
    log::info!("Simulation completed in {:?}", total_time);
    log::info!("Results written to {}", cli.out.display());

    Ok(())
}
