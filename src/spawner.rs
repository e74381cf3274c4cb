/*
 * Spawner Module
 *
 * Builds one flock: a leader boid at the anchor pose plus a square grid of
 * auxiliary boids around it. The grid spans offsets lo..lo+n on both the
 * x and y axes with lo = -(n / 2), so odd counts lean toward negative
 * offsets. Each auxiliary gets a small random depth jitter and a random
 * yaw/pitch heading. All randomness comes from the caller's generator.
 */

use glam::{EulerRot, Quat, Vec3};
use rand::Rng;
use std::f32::consts::{FRAC_PI_2, PI};
use tracing::info;

use crate::boid::{AgentId, Pose};
use crate::error::{FlockError, FlockResult};
use crate::flock::FlockId;
use crate::settings::FlockSettings;
use crate::trace::Trace;
use crate::world::World;

#[derive(Debug, Clone)]
pub struct SpawnRequest {
    pub anchor: Pose,
    pub aux_birds_count: usize,
    pub cell_size: f32,
    pub settings: FlockSettings,
    pub trace: Option<Trace>,
}

impl SpawnRequest {
    pub const DEFAULT_CELL_SIZE: f32 = 0.1;

    pub fn new(anchor: Pose, settings: FlockSettings, trace: Trace) -> Self {
        Self {
            anchor,
            aux_birds_count: 10,
            cell_size: Self::DEFAULT_CELL_SIZE,
            settings,
            trace: Some(trace),
        }
    }

    pub fn with_aux_birds(mut self, count: usize) -> Self {
        self.aux_birds_count = count;
        self
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }
}

// Handle to a freshly spawned flock; the leader is the camera target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlockHandle {
    pub flock: FlockId,
    pub leader: AgentId,
}

// Grid offsets along one axis, matching lo = -n/2, hi = lo + n
pub fn grid_offsets(aux_birds_count: usize) -> std::ops::Range<i64> {
    let n = aux_birds_count as i64;
    let lo = -n / 2;
    lo..lo + n
}

// Random heading with no roll
pub fn random_yaw_pitch<R: Rng>(rng: &mut R) -> Quat {
    let yaw = rng.gen_range(-PI..PI);
    let pitch = rng.gen_range(-FRAC_PI_2..FRAC_PI_2);
    Quat::from_euler(EulerRot::YXZ, yaw, pitch, 0.0)
}

pub fn spawn_flock<R: Rng>(
    world: &mut World,
    request: &SpawnRequest,
    rng: &mut R,
) -> FlockResult<FlockHandle> {
    let trace = request.trace.clone().ok_or(FlockError::MissingTrace)?;
    if trace.waypoints().is_empty() {
        return Err(FlockError::MissingTrace);
    }

    let cell = request.cell_size;
    if !cell.is_finite() || cell <= 0.0 {
        return Err(FlockError::InvalidCellSize(cell));
    }

    let flock = world.create_flock(request.settings.sanitized(), trace);
    let leader = world.spawn_agent(flock, request.anchor)?;
    world.set_leader(flock, leader)?;

    let origin = request.anchor.position;
    for i in grid_offsets(request.aux_birds_count) {
        for j in grid_offsets(request.aux_birds_count) {
            let offset = Vec3::new(
                cell * i as f32,
                cell * j as f32,
                rng.gen_range(-cell..=cell),
            );
            world.spawn_agent(flock, Pose::new(origin + offset, random_yaw_pitch(rng)))?;
        }
    }

    info!(
        %flock,
        %leader,
        agents = world.flock(flock)?.len(),
        "flock spawned"
    );

    Ok(FlockHandle { flock, leader })
}
