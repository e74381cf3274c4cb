/*
 * Boid Flocking Runner
 *
 * Headless host for the flocking engine. It loads the settings list, spawns
 * the flock at the chosen anchor, runs a fixed number of ticks with a fixed
 * time step and reports where the camera target (the flock leader) ended up.
 *
 * Logging goes through tracing; set RUST_LOG=debug to see every tick.
 */

use anyhow::{Context, Result};
use boid_flock::{AnchorPoint, Pose, Simulation, SimulationConfig, Trace, WorldConfig};
use clap::Parser;
use glam::Vec3;
use std::f32::consts::TAU;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "boid-flock", about = "Run a boid flock headlessly")]
struct Args {
    /// JSON settings list, one record per anchor
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Number of anchors laid out on a circle
    #[arg(long, default_value_t = 1)]
    anchors: usize,

    /// Anchor to spawn the flock at
    #[arg(long, default_value_t = 0)]
    anchor: usize,

    /// Auxiliary birds per grid side
    #[arg(long, default_value_t = 10)]
    aux_birds: usize,

    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Fixed time step in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Scan the whole flock instead of using the spatial grid
    #[arg(long)]
    no_grid: bool,
}

// Square loop of waypoints around an anchor
fn square_trace(center: Vec3, half_extent: f32) -> Trace {
    let corners = [(1.0, 1.0), (-1.0, 1.0), (-1.0, -1.0), (1.0, -1.0)];
    Trace::new(
        corners
            .iter()
            .map(|&(x, z)| center + Vec3::new(x * half_extent, 0.0, z * half_extent))
            .collect(),
    )
}

fn anchors(count: usize) -> Vec<AnchorPoint> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count.max(1) as f32;
            let center = Vec3::new(angle.cos(), 0.0, angle.sin()) * 20.0;
            AnchorPoint::new(Pose::at(center), square_trace(center, 5.0))
        })
        .collect()
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let config = SimulationConfig {
        anchors: anchors(args.anchors),
        active_anchor: args.anchor,
        aux_birds_count: args.aux_birds,
        seed: args.seed,
        settings_path: args.settings.clone(),
        world: WorldConfig {
            use_spatial_grid: !args.no_grid,
            ..WorldConfig::default()
        },
        ..SimulationConfig::default()
    };

    let mut simulation = Simulation::start(config).context("failed to start simulation")?;

    for _ in 0..args.ticks {
        simulation.tick(args.dt);
    }

    let leader = simulation
        .world()
        .agent(simulation.camera_target())
        .context("leader disappeared")?;

    info!(
        ticks = simulation.world().ticks(),
        agents = simulation.world().agent_count(),
        "run finished"
    );
    println!(
        "leader {} at ({:.3}, {:.3}, {:.3}) moving ({:.3}, {:.3}, {:.3})",
        leader.id,
        leader.position.x,
        leader.position.y,
        leader.position.z,
        leader.velocity.x,
        leader.velocity.y,
        leader.velocity.z,
    );

    if args.settings.is_some() {
        simulation.save().context("failed to save settings")?;
    }

    Ok(())
}
