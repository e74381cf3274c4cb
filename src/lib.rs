/*
 * Boid Flocking Engine - Module Definitions
 *
 * This file defines the module structure of the flocking engine. The core is
 * the steering engine and the motion integrator; around them sit the flock
 * registry, the world tick, the spawner, the settings store and the
 * host-facing simulation session.
 */

// Re-export key components for easier access
pub use boid::{AgentId, Boid, Pose};
pub use error::{FlockError, FlockResult};
pub use flock::{Flock, FlockId, FlockRegistry};
pub use integrator::{IntegratorConfig, Motion};
pub use settings::{FlockSettings, SettingKey, TunableParam};
pub use simulation::{AnchorPoint, CameraAttachment, Simulation, SimulationConfig};
pub use spatial_grid::SpatialGrid;
pub use spawner::{FlockHandle, SpawnRequest};
pub use steering::SteeringTerms;
pub use store::SettingsStore;
pub use trace::Trace;
pub use world::{Placement, TickStats, World, WorldConfig};

// Define modules
pub mod boid;
pub mod error;
pub mod flock;
pub mod integrator;
pub mod settings;
pub mod simulation;
pub mod spatial_grid;
pub mod spawner;
pub mod steering;
pub mod store;
pub mod trace;
pub mod world;
