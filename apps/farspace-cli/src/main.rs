use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use farspace_common::Length;
use farspace_kernel::Universe;
use farspace_massive::DistanceCompressor;
use farspace_orbit::OrbitParams;
use farspace_render::{DebugTextRenderer, FrameCollector, Renderer, submit_frame};
use farspace_scene::SceneDescription;
use farspace_tools::UniverseInspector;
use glam::{DQuat, DVec3};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "farspace-cli", about = "CLI tool for floating-origin scenes")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Write the built-in demo scene to a file (.yaml, .yml or .json)
    Init {
        path: PathBuf,
    },
    /// Load a scene and run late-update passes
    Simulate {
        /// Scene file; the built-in demo when omitted
        scene: Option<PathBuf>,
        /// Number of passes to run
        #[arg(short, long, default_value = "10")]
        ticks: u64,
        /// Seconds per pass
        #[arg(long, default_value = "1.0")]
        dt: f64,
        /// Advance nothing, only recompute
        #[arg(long)]
        paused: bool,
        /// Write the final state back out as a scene file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// Print compressed distances against a horizon
    Compress {
        /// Horizon distance in metres
        #[arg(long, default_value = "1000")]
        horizon: f64,
        /// Distances to compress; a decade sweep when omitted
        distances: Vec<f64>,
    },
    /// Sample points around an orbit ellipse
    Ring {
        /// Radius in metres
        #[arg(short, long, default_value = "100")]
        radius: f64,
        #[arg(short, long, default_value = "0")]
        oblateness: f64,
        /// Tilt as Euler degrees "x,y,z"
        #[arg(long, value_delimiter = ',', default_value = "0,0,0")]
        tilt: Vec<f64>,
        #[arg(short, long, default_value = "8")]
        points: usize,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("farspace-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", farspace_common::crate_info());
            println!("position: {}", farspace_position::crate_info());
            println!("orbit: {}", farspace_orbit::crate_info());
            println!("massive: {}", farspace_massive::crate_info());
            println!("kernel: tick={}", Universe::new().tick());
            println!("render: {}", farspace_render::crate_info());
            println!("scene: {}", farspace_scene::crate_info());
            println!("tools: {}", farspace_tools::crate_info());
        }
        Commands::Init { path } => {
            SceneDescription::demo()
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote demo scene to {}", path.display());
        }
        Commands::Simulate {
            scene,
            ticks,
            dt,
            paused,
            save,
        } => {
            let description = match &scene {
                Some(path) => SceneDescription::load(path)
                    .with_context(|| format!("loading {}", path.display()))?,
                None => SceneDescription::demo(),
            };
            let mut universe = description.build().context("building scene")?;
            if paused {
                universe.set_paused(true);
            }
            println!("{}", UniverseInspector::summary(&universe));

            let mut collector = FrameCollector::new();
            let mut events = 0;
            for _ in 0..ticks {
                let frame = universe.late_update(dt);
                submit_frame(&mut collector, &frame);
                events += universe.drain_events().len();
            }
            tracing::info!(frames = collector.frames(), events, "simulation finished");

            print!("{}", DebugTextRenderer::new().render(&universe));
            for id in UniverseInspector::list_bodies(&universe) {
                if let Some(info) = UniverseInspector::inspect_body(&universe, id) {
                    println!("{info}");
                }
            }
            println!("{}", UniverseInspector::summary(&universe));

            if let Some(path) = save {
                SceneDescription::capture(&universe)
                    .save(&path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("Saved scene to {}", path.display());
            }
        }
        Commands::Compress { horizon, distances } => {
            let compressor = DistanceCompressor::new(horizon);
            let distances = if distances.is_empty() {
                (0..8).map(|e| horizon * 0.1 * 10f64.powi(e)).collect()
            } else {
                distances
            };
            println!("horizon={horizon} active={}", compressor.is_active());
            println!("{:>16} {:>16} {:>12}", "distance", "compressed", "factor");
            for d in distances {
                let c = compressor.compute(d);
                println!("{d:>16.3} {:>16.6} {:>12.6e}", c.compressed, c.scale_factor);
            }
        }
        Commands::Ring {
            radius,
            oblateness,
            tilt,
            points,
        } => {
            let tilt = match tilt.as_slice() {
                [x, y, z] => DVec3::new(*x, *y, *z),
                _ => anyhow::bail!("tilt needs three components"),
            };
            let params = OrbitParams::circular(Length::meters(radius))
                .with_oblateness(oblateness)
                .with_tilt(tilt);
            let ring = params.ring_points(DQuat::IDENTITY, points);
            if ring.is_empty() {
                println!("no ring for {points} points (need at least 3)");
            }
            for (i, p) in ring.iter().enumerate() {
                println!("{i:>4}: ({:.4}, {:.4}, {:.4}) |r|={:.4}", p.x, p.y, p.z, p.length());
            }
        }
    }

    Ok(())
}
