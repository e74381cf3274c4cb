/*
 * Motion Integrator Module
 *
 * Turns a steering force into the next velocity, orientation and position of
 * a boid. The force is read as a desired velocity and the current velocity is
 * low-pass filtered toward it:
 *
 *     alpha     = dt / (dt + inertness)
 *     velocity' = velocity + (desired - velocity) * alpha
 *
 * With zero inertness the boid adopts the desired velocity immediately; as
 * inertness grows alpha falls monotonically toward zero and the heading
 * freezes. Boids face their direction of travel (local +Z forward, +Y up).
 */

use glam::{Mat3, Quat, Vec3};
use tracing::warn;

use crate::boid::Boid;
use crate::error::{FlockError, FlockResult};
use crate::settings::FlockSettings;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntegratorConfig {
    // Desired velocity magnitude is clamped to this before filtering
    pub max_desired_speed: f32,
    // Below this speed the previous orientation is kept
    pub min_heading_speed: f32,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            max_desired_speed: 1.0e4,
            min_heading_speed: 1.0e-4,
        }
    }
}

// Next kinematic state of one boid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub position: Vec3,
    pub orientation: Quat,
    pub velocity: Vec3,
}

impl Motion {
    pub fn apply_to(&self, boid: &mut Boid) {
        boid.position = self.position;
        boid.orientation = self.orientation;
        boid.velocity = self.velocity;
    }
}

pub fn validate_time_step(dt: f32) -> FlockResult<()> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        Err(FlockError::InvalidTimeStep(dt))
    }
}

/// Fraction of the gap between current and desired velocity closed in one
/// step of length `dt`.
#[inline]
pub fn response_fraction(dt: f32, inertness: f32) -> f32 {
    let inertness = if inertness.is_finite() { inertness.max(0.0) } else { 0.0 };
    dt / (dt + inertness)
}

/// Rotation that points local +Z along `direction` with +Y kept as close to
/// world up as possible. `direction` must be normalized.
pub fn look_rotation(direction: Vec3) -> Quat {
    let right = Vec3::Y.cross(direction);

    // Straight up or down: any roll is as good as another
    if right.length_squared() < 1.0e-12 {
        return Quat::from_rotation_arc(Vec3::Z, direction);
    }

    let right = right.normalize();
    let up = direction.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, up, direction)).normalize()
}

// Limits the length of a finite vector without overflowing on huge components
fn clamp_length(v: Vec3, max: f32) -> Vec3 {
    let largest = v.abs().max_element();
    if largest == 0.0 {
        return Vec3::ZERO;
    }

    let scaled = v / largest;
    if largest * scaled.length() > max {
        scaled.normalize() * max
    } else {
        v
    }
}

pub fn integrate(
    boid: &Boid,
    force: Vec3,
    settings: &FlockSettings,
    dt: f32,
    config: &IntegratorConfig,
) -> FlockResult<Motion> {
    validate_time_step(dt)?;

    let desired = if force.is_finite() {
        clamp_length(force, config.max_desired_speed)
    } else {
        warn!(agent = %boid.id, "non-finite steering force dropped");
        Vec3::ZERO
    };

    let alpha = response_fraction(dt, settings.inertness);
    let velocity = if alpha >= 1.0 {
        desired
    } else {
        boid.velocity + (desired - boid.velocity) * alpha
    };

    let speed = velocity.length();
    let orientation = if speed >= config.min_heading_speed {
        look_rotation(velocity / speed)
    } else {
        boid.orientation
    };

    let mut position = boid.position + velocity * (dt * settings.speed_multiplier);
    if !position.is_finite() {
        warn!(agent = %boid.id, "position step overflowed, holding position");
        position = boid.position;
    }

    Ok(Motion {
        position,
        orientation,
        velocity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_fraction_is_one_without_inertness() {
        assert_eq!(response_fraction(0.016, 0.0), 1.0);
        assert_eq!(response_fraction(0.016, -3.0), 1.0);
        assert_eq!(response_fraction(0.016, f32::NAN), 1.0);
    }

    #[test]
    fn look_rotation_faces_direction() {
        let diagonal = Vec3::new(1.0, 1.0, 0.5).normalize();
        for dir in [Vec3::X, -Vec3::X, Vec3::Z, diagonal, Vec3::Y, -Vec3::Y] {
            let facing = look_rotation(dir) * Vec3::Z;
            assert!(facing.distance(dir) < 1.0e-5, "{dir:?} -> {facing:?}");
        }
    }

    #[test]
    fn look_rotation_keeps_up_vertical_for_level_flight() {
        let q = look_rotation(Vec3::X);
        assert!((q * Vec3::Y).distance(Vec3::Y) < 1.0e-5);
    }
}
