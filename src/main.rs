use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use intersection_sim::{
    config::SimulationConfig,
    feed::LaneFeed,
    simulation::{Direction, Intersection},
};

#[derive(Parser)]
#[command(name = "intersection-sim")]
#[command(about = "Four-way signalized intersection traffic simulation")]
struct Args {
    /// Intersection configuration file
    #[arg(short, long, default_value = "intersection.toml")]
    intersection: String,

    /// Vehicles configuration file
    #[arg(long, default_value = "vehicles.toml")]
    vehicles: String,

    /// Random seed for reproducible simulations
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulated seconds to run before exiting
    #[arg(short, long, default_value_t = 60.0)]
    duration: f32,

    /// Directory of lane files written by an external vehicle generator;
    /// when absent, vehicles are generated internally
    #[arg(short, long)]
    feed_dir: Option<PathBuf>,

    /// Enable verbose logging for detailed simulation progress
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .init();
    info!("Starting intersection simulator");

    let config = SimulationConfig::load_from_files(&args.intersection, &args.vehicles)?;
    info!(
        "Loaded configuration: {} ({}), {} active vehicles max",
        config.intersection.intersection.name,
        config.intersection.intersection.description,
        config.vehicles.simulation.max_active
    );

    if args.verbose {
        let geometry = &config.intersection.intersection.geometry;
        let signals = &config.intersection.intersection.signals;
        info!(
            "Geometry: {:.0}x{:.0} window, {:.0} lane width, center {:.0},{:.0}",
            geometry.window_width,
            geometry.window_height,
            geometry.lane_width,
            geometry.center_x,
            geometry.center_y
        );
        info!(
            "Signals: {:.1}s cycle, congestion thresholds {}/{}, {:.1}s emergency hold",
            signals.cycle_duration,
            signals.congestion_set_threshold,
            signals.congestion_reset_threshold,
            signals.emergency_hold
        );
        info!("Vehicle types loaded: {}", config.vehicles.vehicle_types.len());
    }

    let dt = 1.0 / 60.0; // 60 Hz simulation timestep
    let seed = args.seed.or(config.vehicles.random.seed);
    if let Some(seed) = seed {
        info!("Random seed: {}", seed);
    }

    let spawn_interval = config.vehicles.simulation.spawn_interval;
    let mut simulation = Intersection::new(config, dt, seed);
    let mut feed = args.feed_dir.map(LaneFeed::new);
    if feed.is_some() {
        info!("Reading spawn requests from lane files");
    }

    let start = Instant::now();
    let mut last_report = Instant::now();
    let mut next_spawn = 0.0;
    let tick_duration = Duration::from_secs_f32(dt);

    info!("Running simulation for {:.0} seconds...", args.duration);

    while simulation.time() < args.duration {
        match &mut feed {
            Some(feed) => {
                for record in feed.poll()? {
                    if let Err(e) = simulation.spawn_request(record.direction, Some(record.kind)) {
                        log::debug!("spawn rejected: {}", e);
                    }
                }
            }
            None => {
                if simulation.time() >= next_spawn {
                    for direction in Direction::ALL {
                        if let Err(e) = simulation.spawn_request(direction, None) {
                            log::debug!("spawn rejected: {}", e);
                        }
                    }
                    next_spawn += spawn_interval;
                }
            }
        }

        let summary = simulation.tick();

        if last_report.elapsed() >= Duration::from_secs(1) {
            let stats = simulation.stats();
            info!(
                "t={:.1}s: {} active, {} queued, {} passed, {:.1} vehicles/min",
                summary.time,
                summary.active,
                Direction::ALL
                    .iter()
                    .map(|d| simulation.queue_len(*d))
                    .sum::<usize>(),
                stats.passed,
                stats.vehicles_per_minute
            );
            last_report = Instant::now();
        }

        std::thread::sleep(tick_duration);
    }

    let stats = simulation.stats();
    info!("Simulation completed!");
    info!("Wall-clock time: {:.2}s", start.elapsed().as_secs_f64());
    info!(
        "Vehicles: {} spawned, {} passed, {} rejected",
        stats.spawned, stats.passed, stats.rejected
    );
    info!("Throughput: {:.1} vehicles/min", stats.vehicles_per_minute);

    Ok(())
}
