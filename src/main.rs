use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::time::{Duration, Instant};

use street_sim::simulation::{SimConfig, SimWorld, SimulationStats, TICK_INTERVAL_MS};

#[derive(Parser)]
#[command(name = "street_sim")]
#[command(about = "Headless street scene simulation: traffic signal, vehicles and pedestrians")]
struct Cli {
    /// Number of simulation ticks to run
    #[arg(long, default_value = "2000")]
    ticks: u64,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Scene width in scene units
    #[arg(long, default_value = "1000")]
    width: f32,

    /// Scene height in scene units
    #[arg(long, default_value = "600")]
    height: f32,

    /// Freeze the time of day
    #[arg(long)]
    no_day_night: bool,

    /// Time of day to start at, in [0, 1)
    #[arg(long, default_value = "0.15")]
    start_time: f32,

    /// Ticks between printed summaries (0 disables them)
    #[arg(long, default_value = "500")]
    report_every: u64,

    /// Draw the road strip with each summary
    #[arg(long)]
    map: bool,

    /// Print the final snapshot as JSON
    #[arg(long)]
    json: bool,

    /// Pace ticks at the real-time frame interval
    #[arg(long)]
    realtime: bool,
}

impl Cli {
    fn config(&self) -> SimConfig {
        SimConfig {
            width: self.width,
            height: self.height,
            day_night_cycle: !self.no_day_night,
            start_time: self.start_time,
            seed: self.seed,
            ..SimConfig::default()
        }
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn,street_sim=info"))
        .init();

    let cli = Cli::parse();
    let mut world = SimWorld::from_config(&cli.config())?;

    info!("Running {} ticks", cli.ticks);
    if cli.report_every > 0 {
        world.print_summary();
        if cli.map {
            world.draw_map();
        }
    }

    let frame = Duration::from_millis(TICK_INTERVAL_MS);
    let mut next_frame = Instant::now();
    for tick in 1..=cli.ticks {
        world.tick();

        if cli.report_every > 0 && tick % cli.report_every == 0 {
            println!("--- After tick {} ---", tick);
            world.print_summary();
            if cli.map {
                world.draw_map();
            }
        }

        if cli.realtime {
            next_frame += frame;
            if let Some(wait) = next_frame.checked_duration_since(Instant::now()) {
                std::thread::sleep(wait);
            }
        }
    }

    log_statistics(&world.stats);

    if cli.json {
        let json = world
            .snapshot()
            .to_json()
            .context("Failed to serialise the final snapshot")?;
        println!("{}", json);
    }

    Ok(())
}

fn log_statistics(stats: &SimulationStats) {
    info!("=== SIMULATION COMPLETE ===");
    info!("Ticks: {}", stats.ticks);
    info!(
        "Simulated time: {:.1}s",
        stats.ticks as f64 * TICK_INTERVAL_MS as f64 / 1000.0
    );
    info!("Signal phase changes: {}", stats.phase_changes);
    info!("Signal cycles: {}", stats.signal_cycles);
    info!("Vehicles recycled: {}", stats.vehicles_recycled);
    info!("Crossings started: {}", stats.crossings_started);
    info!("Crossings completed: {}", stats.crossings_completed);
    info!("Peak crossers: {}", stats.peak_crossers);
}
