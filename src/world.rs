/*
 * World Module
 *
 * The world owns every boid and the flock registry, and runs the simulation
 * tick. A tick is two passes:
 * 1. Steering: every force is computed from the same snapshot of the world
 * 2. Integration: each boid advances from its own previous state and force
 *
 * No boid ever sees another boid's state from the current tick. Settings are
 * copied per flock when the tick starts, so edits from the tuning surface
 * take effect on the next tick as a whole.
 */

use glam::{Quat, Vec3};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::boid::{AgentId, Boid, Pose};
use crate::error::{FlockError, FlockResult};
use crate::flock::{Flock, FlockId, FlockRegistry};
use crate::integrator::{self, IntegratorConfig};
use crate::settings::FlockSettings;
use crate::spatial_grid::SpatialGrid;
use crate::steering;
use crate::trace::Trace;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldConfig {
    // Narrow neighbor candidates with a hashed grid instead of scanning the flock
    pub use_spatial_grid: bool,
    pub integrator: IntegratorConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            use_spatial_grid: true,
            integrator: IntegratorConfig::default(),
        }
    }
}

// What the host needs to place one boid in its scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub id: AgentId,
    pub position: Vec3,
    pub orientation: Quat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickStats {
    pub advanced: bool,
    pub agents: usize,
}

pub struct World {
    pub config: WorldConfig,
    agents: BTreeMap<AgentId, Boid>,
    flocks: FlockRegistry,
    next_agent: u64,
    grid: SpatialGrid,
    ticks: u64,
}

impl Default for World {
    fn default() -> Self {
        Self::new(WorldConfig::default())
    }
}

impl World {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            config,
            agents: BTreeMap::new(),
            flocks: FlockRegistry::new(),
            next_agent: 0,
            grid: SpatialGrid::new(1.0),
            ticks: 0,
        }
    }

    pub fn create_flock(&mut self, settings: FlockSettings, trace: Trace) -> FlockId {
        self.flocks.register(settings, trace)
    }

    pub fn spawn_agent(&mut self, flock: FlockId, pose: Pose) -> FlockResult<AgentId> {
        let id = AgentId(self.next_agent);
        self.flocks.add_member(flock, id)?;
        self.next_agent += 1;
        self.agents.insert(id, Boid::new(id, flock, pose));
        Ok(id)
    }

    pub fn set_leader(&mut self, flock: FlockId, agent: AgentId) -> FlockResult<()> {
        match self.agents.get(&agent) {
            Some(boid) if boid.flock == flock => self.flocks.set_leader(flock, agent),
            _ => Err(FlockError::UnknownAgent(agent)),
        }
    }

    pub fn remove_agent(&mut self, agent: AgentId) -> FlockResult<Boid> {
        let boid = self.agents.remove(&agent).ok_or(FlockError::UnknownAgent(agent))?;
        self.flocks.remove_member(boid.flock, agent)?;
        Ok(boid)
    }

    // Removes the flock together with all of its boids
    pub fn remove_flock(&mut self, flock: FlockId) -> FlockResult<()> {
        let removed = self.flocks.remove(flock)?;
        for id in removed.members() {
            self.agents.remove(id);
        }
        Ok(())
    }

    // Full teardown; ids start over from zero afterwards
    pub fn clear(&mut self) {
        self.agents.clear();
        self.flocks.clear();
        self.grid.reset(self.grid.cell_size);
        self.next_agent = 0;
        self.ticks = 0;
    }

    pub fn agent(&self, id: AgentId) -> FlockResult<&Boid> {
        self.agents.get(&id).ok_or(FlockError::UnknownAgent(id))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> FlockResult<&mut Boid> {
        self.agents.get_mut(&id).ok_or(FlockError::UnknownAgent(id))
    }

    pub fn agents(&self) -> impl Iterator<Item = &Boid> {
        self.agents.values()
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn flock(&self, id: FlockId) -> FlockResult<&Flock> {
        self.flocks.get(id)
    }

    pub fn flocks(&self) -> &FlockRegistry {
        &self.flocks
    }

    pub fn leader(&self, flock: FlockId) -> FlockResult<Option<AgentId>> {
        Ok(self.flocks.get(flock)?.leader())
    }

    pub fn settings(&self, flock: FlockId) -> FlockResult<&FlockSettings> {
        Ok(&self.flocks.get(flock)?.settings)
    }

    /// Applies an edit to a flock's settings; every member sees the new
    /// values from the next tick on.
    pub fn update_settings<F>(&mut self, flock: FlockId, edit: F) -> FlockResult<()>
    where
        F: FnOnce(&mut FlockSettings),
    {
        edit(&mut self.flocks.get_mut(flock)?.settings);
        Ok(())
    }

    pub fn trace(&self, flock: FlockId) -> FlockResult<&Trace> {
        Ok(&self.flocks.get(flock)?.trace)
    }

    pub fn trace_mut(&mut self, flock: FlockId) -> FlockResult<&mut Trace> {
        Ok(&mut self.flocks.get_mut(flock)?.trace)
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.agents
            .values()
            .map(|boid| Placement {
                id: boid.id,
                position: boid.position,
                orientation: boid.orientation,
            })
            .collect()
    }

    /// Steering force of every boid, computed from the current state only.
    /// Boids are listed flock by flock, in ascending id order.
    pub fn steering_forces(&mut self) -> Vec<(AgentId, Vec3)> {
        let mut forces = Vec::with_capacity(self.agents.len());

        for (_, flock) in self.flocks.iter() {
            let settings = flock.settings;
            let waypoint = flock.trace.target();
            let members: Vec<&Boid> = flock
                .members()
                .iter()
                .filter_map(|id| self.agents.get(id))
                .collect();

            // A non-positive or broken radius sees nobody. Positions too far
            // out for the radius have no grid cell and fall back to a scan.
            let radius = settings.view_radius;
            let grid_usable = self.config.use_spatial_grid
                && radius.is_finite()
                && radius > 0.0
                && members
                    .iter()
                    .all(|boid| SpatialGrid::covers(radius, boid.position));

            if grid_usable {
                if self.grid.cell_size == radius {
                    self.grid.clear();
                } else {
                    self.grid.reset(radius);
                }
                for (i, boid) in members.iter().enumerate() {
                    self.grid.insert(i, boid.position);
                }
            }

            for boid in &members {
                let force = if grid_usable {
                    let nearby = self.grid.get_nearby_indices(boid.position);
                    steering::steering_force(
                        boid,
                        nearby.iter().map(|&i| members[i]),
                        &settings,
                        waypoint,
                    )
                } else {
                    steering::steering_force(boid, members.iter().copied(), &settings, waypoint)
                };
                forces.push((boid.id, force));
            }
        }

        forces
    }

    /// Advances every boid by `dt` seconds. An invalid `dt` skips the tick
    /// and leaves the world untouched.
    pub fn tick(&mut self, dt: f32) -> TickStats {
        if let Err(err) = integrator::validate_time_step(dt) {
            warn!(%err, "skipping tick");
            return TickStats {
                advanced: false,
                agents: self.agents.len(),
            };
        }

        // Settings as they were when the tick started
        let settings: BTreeMap<FlockId, FlockSettings> = self
            .flocks
            .iter()
            .map(|(id, flock)| (id, flock.settings))
            .collect();

        let forces = self.steering_forces();

        for (id, force) in forces {
            let Some(boid) = self.agents.get_mut(&id) else {
                continue;
            };
            let Some(flock_settings) = settings.get(&boid.flock) else {
                continue;
            };

            match integrator::integrate(boid, force, flock_settings, dt, &self.config.integrator) {
                Ok(motion) => motion.apply_to(boid),
                Err(err) => warn!(agent = %id, %err, "integration skipped"),
            }
        }

        self.ticks += 1;
        debug!(tick = self.ticks, agents = self.agents.len(), dt, "world advanced");

        TickStats {
            advanced: true,
            agents: self.agents.len(),
        }
    }
}
