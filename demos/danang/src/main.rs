//! danang: route across Đà Nẵng while the flood feed opens and closes roads.
//!
//! ```text
//! danang [--roads overpass.json] [--config router.json] [--flood status.json]
//! ```
//!
//! Without `--roads` a small synthetic grid is used.  With `--flood` the
//! status file is polled in the background for a few cycles and the routes
//! are recomputed after each one.  Set `RUST_LOG=info` to see blocking
//! changes as they happen.

mod network;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use fw_core::{GeoPoint, RouterConfig, TravelMode, WayId};
use fw_engine::{Engine, EngineBuilder, FloodMonitor, JsonFileSource, LogObserver};
use fw_spatial::overpass::read_overpass;

use network::{RIVERSIDE_WAY, build_roads};

// ── Constants ─────────────────────────────────────────────────────────────────

const FLOOD_CYCLES: u32 = 3;

// ── Arguments ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "danang")]
#[command(about = "Fastest routes across Đà Nẵng with flood-closed roads", long_about = None)]
struct Args {
    /// Overpass `out geom tags` JSON export; a synthetic grid when absent
    #[arg(long)]
    roads: Option<PathBuf>,

    /// Router configuration JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Flood status JSON, polled in the background
    #[arg(long)]
    flood: Option<PathBuf>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => RouterConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RouterConfig::default(),
    };

    let t0 = Instant::now();
    let (roads, [start, end]) = match &args.roads {
        Some(path) => {
            let roads = read_overpass(path, config.area.as_ref())
                .with_context(|| format!("reading {}", path.display()))?;
            let area = config.area.unwrap_or_default();
            (roads, [area.center, GeoPoint::new(area.center.lat + 0.01, area.center.lon + 0.01)])
        }
        None => build_roads(),
    };

    let engine = Arc::new(
        EngineBuilder::new(config.clone())
            .observer(LogObserver)
            .build(roads)?,
    );
    println!(
        "graph: {} nodes, {} edges, {} roads ({:.1} ms)",
        engine.graph().node_count(),
        engine.graph().edge_count(),
        engine.graph().road_count(),
        t0.elapsed().as_secs_f64() * 1e3,
    );

    print_routes(&engine, start, end);

    match &args.flood {
        Some(path) => {
            let monitor = FloodMonitor::from_config(&config);
            let handle = monitor.spawn(
                Arc::clone(&engine),
                JsonFileSource::new(path),
                config.flood_poll_interval(),
            );
            for cycle in 1..=FLOOD_CYCLES {
                std::thread::sleep(config.flood_poll_interval());
                println!("\nafter poll cycle {cycle}: blocked {:?}", engine.blocked_roads());
                print_routes(&engine, start, end);
            }
            let monitor = handle.stop()?;
            println!("\nflood monitor stopped (flooded = {})", monitor.is_flooded());
        }
        None => {
            // Simulate the feed reporting a flood on the riverside street.
            let way = WayId(RIVERSIDE_WAY);
            if engine.graph().road_id(way).is_some() {
                engine.set_blocked(way, true)?;
                println!("\n{way} closed by flood:");
                print_routes(&engine, start, end);
            }
        }
    }

    Ok(())
}

fn print_routes(engine: &Engine, start: GeoPoint, end: GeoPoint) {
    for mode in TravelMode::ALL {
        match engine.find_route(start, end, mode) {
            Ok(planned) => println!(
                "  {mode:<4} {} via {} nodes",
                planned.metrics,
                planned.route.nodes.len()
            ),
            Err(e) if e.is_no_route() => println!("  {mode:<4} no route available"),
            Err(e) => println!("  {mode:<4} error: {e}"),
        }
    }
}
