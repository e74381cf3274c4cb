/*
 * Trace Module
 *
 * A trace is the moving target a flock follows: an ordered loop of waypoints.
 * The steering engine only ever reads the current target; the host session
 * moves the target forward once the flock leader gets close enough.
 */

use glam::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    waypoints: Vec<Vec3>,
    current: usize,
    pub reach_radius: f32,
}

impl Trace {
    pub const DEFAULT_REACH_RADIUS: f32 = 0.5;

    pub fn new(waypoints: Vec<Vec3>) -> Self {
        Self {
            waypoints,
            current: 0,
            reach_radius: Self::DEFAULT_REACH_RADIUS,
        }
    }

    // A trace that never moves
    pub fn fixed(target: Vec3) -> Self {
        Self::new(vec![target])
    }

    pub fn with_reach_radius(mut self, reach_radius: f32) -> Self {
        self.reach_radius = reach_radius;
        self
    }

    // Current target; an empty trace pins the flock to the origin
    pub fn target(&self) -> Vec3 {
        self.waypoints.get(self.current).copied().unwrap_or(Vec3::ZERO)
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn waypoints(&self) -> &[Vec3] {
        &self.waypoints
    }

    // Lets the host drive the target directly, e.g. from an animated object
    pub fn set_target(&mut self, target: Vec3) {
        match self.waypoints.get_mut(self.current) {
            Some(slot) => *slot = target,
            None => {
                self.waypoints.push(target);
                self.current = self.waypoints.len() - 1;
            }
        }
    }

    /// Moves to the next waypoint (wrapping around) when `position` is
    /// strictly within `reach_radius` of the current one. Returns true when
    /// the target changed.
    pub fn advance_if_reached(&mut self, position: Vec3) -> bool {
        if self.waypoints.len() < 2 {
            return false;
        }

        if position.distance_squared(self.target()) < self.reach_radius * self.reach_radius {
            self.current = (self.current + 1) % self.waypoints.len();
            return true;
        }

        false
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }
}
