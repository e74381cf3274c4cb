/*
 * Error Module
 *
 * Defines the single error type shared by the flocking engine, the spawner
 * and the settings store. Errors raised inside the per-tick path are handled
 * locally by the world and never escape `World::tick`.
 */

use thiserror::Error;

use crate::boid::AgentId;
use crate::flock::FlockId;

pub type FlockResult<T> = Result<T, FlockError>;

#[derive(Debug, Error)]
pub enum FlockError {
    #[error("invalid time step: {0} (must be finite and greater than zero)")]
    InvalidTimeStep(f32),

    #[error("flock has no waypoint trace bound")]
    MissingTrace,

    #[error("invalid spawn cell size: {0}")]
    InvalidCellSize(f32),

    #[error("anchor index {index} out of range ({count} anchors)")]
    InvalidAnchor { index: usize, count: usize },

    #[error("unknown flock: {0}")]
    UnknownFlock(FlockId),

    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("settings parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
