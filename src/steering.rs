/*
 * Steering Module
 *
 * This module computes the steering force of one boid from a read-only view
 * of its flock. Four rules contribute:
 * 1. Alignment: match the average velocity of visible neighbors
 * 2. Spacing: pull toward neighbors farther than the optimal distance and
 *    push away from closer ones, with the vertical part scaled separately
 * 3. Attraction: pull toward the flock's current waypoint
 * 4. Combination: the sum of the above scaled by the reaction gain
 *
 * Everything here is a pure function of its inputs. Results depend on the
 * order neighbors are supplied in, so callers pass them in ascending id order.
 */

use glam::Vec3;

use crate::boid::Boid;
use crate::settings::FlockSettings;

// Individual contributions before the total gain is applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteeringTerms {
    pub alignment: Vec3,
    pub spacing: Vec3,
    pub attraction: Vec3,
    pub neighbor_count: usize,
}

impl SteeringTerms {
    pub fn combined(&self, settings: &FlockSettings) -> Vec3 {
        (self.alignment + self.spacing + self.attraction) * settings.total_force_multiplier
    }
}

// A neighbor is visible strictly inside the view radius
#[inline]
pub fn is_visible(boid: &Boid, other: &Boid, view_radius: f32) -> bool {
    other.id != boid.id
        && other.flock == boid.flock
        && boid.position.distance(other.position) < view_radius
}

pub fn steering_terms<'a, I>(
    boid: &Boid,
    neighbors: I,
    settings: &FlockSettings,
    waypoint: Vec3,
) -> SteeringTerms
where
    I: IntoIterator<Item = &'a Boid>,
{
    let mut velocity_sum = Vec3::ZERO;
    let mut spacing_sum = Vec3::ZERO;
    let mut count = 0usize;

    // Process all neighbors in a single pass
    for other in neighbors {
        if !is_visible(boid, other, settings.view_radius) {
            continue;
        }

        let offset = other.position - boid.position;
        let d = offset.length();

        velocity_sum += other.velocity;

        // Coincident boids have no direction to push along
        if d > 0.0 {
            spacing_sum += offset / d * (d - settings.optimal_distance);
        }

        count += 1;
    }

    let mut alignment = Vec3::ZERO;
    let mut spacing = Vec3::ZERO;

    if count > 0 {
        let inv = 1.0 / count as f32;

        alignment = (velocity_sum * inv - boid.velocity) * settings.alignment_force_fraction;

        spacing = spacing_sum * inv;
        spacing.y *= settings.vertical_priority;
    }

    let attraction = (waypoint - boid.position) * settings.attraction_force;

    SteeringTerms {
        alignment,
        spacing,
        attraction,
        neighbor_count: count,
    }
}

/// Combined, unclamped steering force for `boid`.
pub fn steering_force<'a, I>(
    boid: &Boid,
    neighbors: I,
    settings: &FlockSettings,
    waypoint: Vec3,
) -> Vec3
where
    I: IntoIterator<Item = &'a Boid>,
{
    steering_terms(boid, neighbors, settings, waypoint).combined(settings)
}
