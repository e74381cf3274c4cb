/*
 * Boid Module
 *
 * This module defines the Boid struct: the kinematic state of one agent and
 * the flock it belongs to. Boids do not own their settings; the flock id is
 * the handle through which settings and the waypoint trace are looked up.
 */

use glam::{Quat, Vec3};
use std::fmt;

use crate::flock::FlockId;

// Stable handle of one agent inside a world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AgentId(pub u64);

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

// Position plus rotation, used for spawn anchors and world placement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self { position, orientation }
    }

    pub fn at(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::at(Vec3::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Boid {
    pub id: AgentId,
    pub flock: FlockId,
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
}

impl Boid {
    pub fn new(id: AgentId, flock: FlockId, pose: Pose) -> Self {
        Self {
            id,
            flock,
            position: pose.position,
            orientation: pose.orientation,
            velocity: Vec3::ZERO,
        }
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.position, self.orientation)
    }

    // Unit vector the boid is facing (local +Z)
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::Z
    }
}
