/*
 * Simulation Module
 *
 * This module defines the Simulation session a host drives once per frame.
 * It handles loading and saving the settings list, spawning the flock at the
 * active anchor, exposing the leader as the camera target, toggling the
 * tuning panel and restarting the flock. Rendering and input stay with the
 * host; the session only reports placements.
 */

use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::boid::{AgentId, Pose};
use crate::error::{FlockError, FlockResult};
use crate::settings::{FlockSettings, SettingKey};
use crate::spawner::{self, FlockHandle, SpawnRequest};
use crate::store::SettingsStore;
use crate::trace::Trace;
use crate::world::{Placement, TickStats, World, WorldConfig};

// A spawn point together with the trace its flock will follow
#[derive(Debug, Clone)]
pub struct AnchorPoint {
    pub pose: Pose,
    pub trace: Option<Trace>,
}

impl AnchorPoint {
    pub fn new(pose: Pose, trace: Trace) -> Self {
        Self { pose, trace: Some(trace) }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub anchors: Vec<AnchorPoint>,
    pub active_anchor: usize,
    pub aux_birds_count: usize,
    pub cell_size: f32,
    pub seed: u64,
    // No path means settings live in memory only
    pub settings_path: Option<PathBuf>,
    pub world: WorldConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            anchors: Vec::new(),
            active_anchor: 0,
            aux_birds_count: 10,
            cell_size: SpawnRequest::DEFAULT_CELL_SIZE,
            seed: 0,
            settings_path: None,
            world: WorldConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAttachment {
    Attached,
    Detached,
}

pub struct Simulation {
    config: SimulationConfig,
    store: SettingsStore,
    world: World,
    handle: FlockHandle,
    camera: CameraAttachment,
    // Settings as they were when the panel opened
    panel_snapshot: Option<FlockSettings>,
}

impl Simulation {
    pub fn start(config: SimulationConfig) -> FlockResult<Self> {
        let store = match &config.settings_path {
            Some(path) => SettingsStore::load(path)?,
            None => SettingsStore::default(),
        };
        Self::with_store(config, store)
    }

    // Starts from an already loaded settings list
    pub fn with_store(config: SimulationConfig, mut store: SettingsStore) -> FlockResult<Self> {
        if config.active_anchor >= config.anchors.len() {
            return Err(FlockError::InvalidAnchor {
                index: config.active_anchor,
                count: config.anchors.len(),
            });
        }

        store.reconcile(config.anchors.len());

        let mut world = World::new(config.world);
        let handle = Self::spawn(&mut world, &config, &store)?;

        Ok(Self {
            config,
            store,
            world,
            handle,
            camera: CameraAttachment::Attached,
            panel_snapshot: None,
        })
    }

    fn spawn(
        world: &mut World,
        config: &SimulationConfig,
        store: &SettingsStore,
    ) -> FlockResult<FlockHandle> {
        let index = config.active_anchor;
        let anchor = config.anchors.get(index).ok_or(FlockError::InvalidAnchor {
            index,
            count: config.anchors.len(),
        })?;
        let settings = store.get(index).copied().unwrap_or_default();

        let request = SpawnRequest {
            anchor: anchor.pose,
            aux_birds_count: config.aux_birds_count,
            cell_size: config.cell_size,
            settings,
            trace: anchor.trace.clone(),
        };

        world.clear();
        let mut rng = StdRng::seed_from_u64(config.seed);
        spawner::spawn_flock(world, &request, &mut rng)
    }

    pub fn tick(&mut self, dt: f32) -> TickStats {
        let stats = self.world.tick(dt);

        if stats.advanced {
            let leader = self.world.agent(self.handle.leader).map(|boid| boid.position);
            if let (Ok(position), Ok(trace)) = (leader, self.world.trace_mut(self.handle.flock)) {
                if trace.advance_if_reached(position) {
                    debug!(waypoint = trace.current_index(), "trace advanced");
                }
            }
        }

        stats
    }

    pub fn placements(&self) -> Vec<Placement> {
        self.world.placements()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn handle(&self) -> FlockHandle {
        self.handle
    }

    pub fn store(&self) -> &SettingsStore {
        &self.store
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    // Leader of the active flock; stable until the next restart
    pub fn camera_target(&self) -> AgentId {
        self.handle.leader
    }

    pub fn camera_attachment(&self) -> CameraAttachment {
        self.camera
    }

    pub fn detach_camera(&mut self) {
        self.camera = CameraAttachment::Detached;
    }

    pub fn attach_camera(&mut self) {
        self.camera = CameraAttachment::Attached;
    }

    pub fn settings(&self) -> FlockResult<&FlockSettings> {
        self.world.settings(self.handle.flock)
    }

    pub fn update_settings<F>(&mut self, edit: F) -> FlockResult<()>
    where
        F: FnOnce(&mut FlockSettings),
    {
        self.world.update_settings(self.handle.flock, edit)
    }

    pub fn set_setting(&mut self, key: SettingKey, value: f32) -> FlockResult<()> {
        self.update_settings(|settings| settings.set(key, value))
    }

    pub fn is_settings_panel_open(&self) -> bool {
        self.panel_snapshot.is_some()
    }

    /// Opens or closes the tuning panel and returns the new state. Closing
    /// always saves, including edits made while the panel was closed.
    pub fn toggle_settings_panel(&mut self) -> FlockResult<bool> {
        match self.panel_snapshot.take() {
            None => {
                self.panel_snapshot = Some(*self.settings()?);
                Ok(true)
            }
            Some(snapshot) => {
                let changed = *self.settings()? != snapshot;
                debug!(changed, "settings panel closed");
                self.save()?;
                Ok(false)
            }
        }
    }

    // Copies the live settings into the store and writes it out if a path is set
    pub fn save(&mut self) -> FlockResult<()> {
        let live = *self.settings()?;
        if let Some(record) = self.store.get_mut(self.config.active_anchor) {
            *record = live;
        }

        if let Some(path) = &self.config.settings_path {
            self.store.save(path)?;
        }
        Ok(())
    }

    /// Saves settings, tears the world down and spawns the flock again from
    /// the same seed. Repeated calls produce the same flock.
    pub fn restart(&mut self) -> FlockResult<FlockHandle> {
        self.save()?;
        self.panel_snapshot = None;
        self.handle = Self::spawn(&mut self.world, &self.config, &self.store)?;
        self.camera = CameraAttachment::Attached;
        info!(flock = %self.handle.flock, "simulation restarted");
        Ok(self.handle)
    }
}
