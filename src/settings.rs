/*
 * Flock Settings Module
 *
 * This module defines the FlockSettings struct that parameterizes every boid
 * of one flock. Settings are shared through the flock id, so retuning one
 * instance retunes the whole flock on the next tick. They can be edited live
 * through the tuning surface and are persisted as a flat record by the
 * settings store. A stored field that is null or not a number reads back as
 * NaN, which sanitizing then turns into the default.
 */

use serde::{Deserialize, Deserializer, Serialize};
use std::ops::RangeInclusive;
use tracing::warn;

// Parameters shared by all boids of a flock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlockSettings {
    #[serde(deserialize_with = "lenient_f32")]
    pub speed_multiplier: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub view_radius: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub optimal_distance: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub alignment_force_fraction: f32,
    // "Reaction speed" in the tuning panel
    #[serde(deserialize_with = "lenient_f32")]
    pub total_force_multiplier: f32,
    // Low-pass time constant in seconds, 0 means instant response
    #[serde(deserialize_with = "lenient_f32")]
    pub inertness: f32,
    // Scale on the up-axis part of the spacing force
    #[serde(deserialize_with = "lenient_f32")]
    pub vertical_priority: f32,
    #[serde(deserialize_with = "lenient_f32")]
    pub attraction_force: f32,
}

fn lenient_f32<'de, D>(deserializer: D) -> Result<f32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64().map_or(f32::NAN, |v| v as f32))
}

impl Default for FlockSettings {
    fn default() -> Self {
        Self {
            speed_multiplier: 3.0,
            view_radius: 0.5,
            optimal_distance: 0.1,
            alignment_force_fraction: 0.005,
            total_force_multiplier: 12.0,
            inertness: 0.5,
            vertical_priority: 1.0,
            attraction_force: 0.2,
        }
    }
}

// Keys for the fields exposed to the tuning surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    SpeedMultiplier,
    ViewRadius,
    OptimalDistance,
    AlignmentForceFraction,
    TotalForceMultiplier,
    Inertness,
    VerticalPriority,
    AttractionForce,
}

// Describes one editable field: what to show and the slider bounds
#[derive(Debug, Clone)]
pub struct TunableParam {
    pub key: SettingKey,
    pub label: &'static str,
    pub range: RangeInclusive<f32>,
}

impl FlockSettings {
    /// Returns a copy where every value that would break the simulation is
    /// replaced by its default: non-finite fields, and non-positive
    /// `view_radius` / `optimal_distance`.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut fixed = *self;

        for param in Self::tunables() {
            let value = fixed.get(param.key);
            let must_be_positive = matches!(
                param.key,
                SettingKey::ViewRadius | SettingKey::OptimalDistance
            );

            if !value.is_finite() || (must_be_positive && value <= 0.0) {
                let replacement = defaults.get(param.key);
                warn!(
                    field = param.label,
                    value = %value,
                    replacement,
                    "flock setting out of range, using default"
                );
                fixed.set(param.key, replacement);
            }
        }

        fixed
    }

    pub fn is_valid(&self) -> bool {
        self.sanitized() == *self
    }

    pub fn get(&self, key: SettingKey) -> f32 {
        match key {
            SettingKey::SpeedMultiplier => self.speed_multiplier,
            SettingKey::ViewRadius => self.view_radius,
            SettingKey::OptimalDistance => self.optimal_distance,
            SettingKey::AlignmentForceFraction => self.alignment_force_fraction,
            SettingKey::TotalForceMultiplier => self.total_force_multiplier,
            SettingKey::Inertness => self.inertness,
            SettingKey::VerticalPriority => self.vertical_priority,
            SettingKey::AttractionForce => self.attraction_force,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: f32) {
        let field = match key {
            SettingKey::SpeedMultiplier => &mut self.speed_multiplier,
            SettingKey::ViewRadius => &mut self.view_radius,
            SettingKey::OptimalDistance => &mut self.optimal_distance,
            SettingKey::AlignmentForceFraction => &mut self.alignment_force_fraction,
            SettingKey::TotalForceMultiplier => &mut self.total_force_multiplier,
            SettingKey::Inertness => &mut self.inertness,
            SettingKey::VerticalPriority => &mut self.vertical_priority,
            SettingKey::AttractionForce => &mut self.attraction_force,
        };
        *field = value;
    }

    // Every field in panel order, with its label and slider range
    pub fn tunables() -> [TunableParam; 8] {
        [
            TunableParam {
                key: SettingKey::SpeedMultiplier,
                label: "Speed",
                range: Self::get_speed_range(),
            },
            TunableParam {
                key: SettingKey::ViewRadius,
                label: "View distance",
                range: Self::get_view_radius_range(),
            },
            TunableParam {
                key: SettingKey::OptimalDistance,
                label: "Optimal distance between birds",
                range: Self::get_optimal_distance_range(),
            },
            TunableParam {
                key: SettingKey::AlignmentForceFraction,
                label: "Fraction of flock alignment force",
                range: Self::get_alignment_range(),
            },
            TunableParam {
                key: SettingKey::TotalForceMultiplier,
                label: "Reaction speed",
                range: Self::get_reaction_range(),
            },
            TunableParam {
                key: SettingKey::Inertness,
                label: "Inertness",
                range: Self::get_inertness_range(),
            },
            TunableParam {
                key: SettingKey::VerticalPriority,
                label: "Flock's shape deformation",
                range: Self::get_vertical_priority_range(),
            },
            TunableParam {
                key: SettingKey::AttractionForce,
                label: "Waypoint attraction force",
                range: Self::get_attraction_range(),
            },
        ]
    }

    // Get parameter ranges for UI sliders
    pub fn get_speed_range() -> RangeInclusive<f32> {
        0.0..=20.0
    }

    pub fn get_view_radius_range() -> RangeInclusive<f32> {
        0.0..=20.0
    }

    pub fn get_optimal_distance_range() -> RangeInclusive<f32> {
        0.0..=2.0
    }

    pub fn get_alignment_range() -> RangeInclusive<f32> {
        0.0..=0.01
    }

    pub fn get_reaction_range() -> RangeInclusive<f32> {
        0.0..=50.0
    }

    pub fn get_inertness_range() -> RangeInclusive<f32> {
        0.0..=1.0
    }

    pub fn get_vertical_priority_range() -> RangeInclusive<f32> {
        0.0..=3.0
    }

    pub fn get_attraction_range() -> RangeInclusive<f32> {
        0.0..=1.0
    }
}
