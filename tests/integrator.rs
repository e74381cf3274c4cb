use boid_flock::integrator::{integrate, response_fraction, IntegratorConfig, Motion};
use boid_flock::{AgentId, Boid, FlockError, FlockId, FlockSettings, Pose};
use glam::{Quat, Vec3};

const DT: f32 = 1.0 / 60.0;

fn boid(velocity: Vec3) -> Boid {
    Boid::new(AgentId(0), FlockId(0), Pose::at(Vec3::ZERO)).with_velocity(velocity)
}

fn step(boid: &Boid, force: Vec3, settings: &FlockSettings, dt: f32) -> Motion {
    integrate(boid, force, settings, dt, &IntegratorConfig::default()).unwrap()
}

fn settings(inertness: f32) -> FlockSettings {
    FlockSettings {
        inertness,
        speed_multiplier: 1.0,
        ..FlockSettings::default()
    }
}

#[test]
fn zero_inertness_reaches_desired_velocity_in_one_step() {
    let desired = Vec3::new(1.0, -2.0, 0.5);
    let motion = step(&boid(Vec3::X * 3.0), desired, &settings(0.0), DT);
    assert_eq!(motion.velocity, desired);
}

#[test]
fn convergence_shrinks_monotonically_with_inertness() {
    let start = Vec3::X;
    let desired = Vec3::Z;
    let config = IntegratorConfig::default();

    let mut previous_gap = 0.0;
    for inertness in [0.0, 0.01, 0.1, 0.5, 1.0, 10.0, 1000.0] {
        let motion = integrate(&boid(start), desired, &settings(inertness), DT, &config).unwrap();
        let gap = motion.velocity.distance(desired);
        assert!(gap >= previous_gap, "inertness {inertness}: {gap} < {previous_gap}");
        previous_gap = gap;
    }

    let frozen = integrate(&boid(start), desired, &settings(1.0e6), DT, &config).unwrap();
    assert!(frozen.velocity.distance(start) < 1.0e-6);
}

#[test]
fn response_fraction_decreases_toward_zero() {
    let mut last = response_fraction(DT, 0.0);
    assert_eq!(last, 1.0);
    for inertness in [0.001, 0.1, 1.0, 100.0] {
        let next = response_fraction(DT, inertness);
        assert!(next < last);
        last = next;
    }
    assert!(response_fraction(DT, 1.0e9) < 1.0e-9);
}

#[test]
fn position_advances_by_velocity_dt_and_speed() {
    let s = FlockSettings { inertness: 0.0, speed_multiplier: 2.5, ..FlockSettings::default() };
    let motion = step(&boid(Vec3::ZERO), Vec3::new(4.0, 0.0, 0.0), &s, 0.5);
    assert_eq!(motion.position, Vec3::new(5.0, 0.0, 0.0));
}

#[test]
fn boid_faces_direction_of_travel() {
    let motion = step(&boid(Vec3::ZERO), Vec3::X, &settings(0.0), DT);
    let forward = motion.orientation * Vec3::Z;
    assert!(forward.distance(Vec3::X) < 1.0e-5);
}

#[test]
fn standing_still_keeps_previous_orientation() {
    let mut b = boid(Vec3::ZERO);
    b.orientation = Quat::from_rotation_y(0.7);
    let motion = step(&b, Vec3::ZERO, &settings(0.0), DT);
    assert_eq!(motion.orientation, b.orientation);
}

#[test]
fn invalid_time_steps_are_rejected() {
    let config = IntegratorConfig::default();
    for dt in [0.0, -0.1, f32::NAN, f32::INFINITY] {
        let result = integrate(&boid(Vec3::X), Vec3::Y, &settings(0.0), dt, &config);
        assert!(matches!(result, Err(FlockError::InvalidTimeStep(_))));
    }
}

#[test]
fn huge_forces_stay_finite() {
    let config = IntegratorConfig::default();
    let s = FlockSettings { inertness: 0.0, speed_multiplier: 20.0, ..FlockSettings::default() };

    let huge = integrate(&boid(Vec3::ZERO), Vec3::splat(f32::MAX), &s, DT, &config).unwrap();
    assert!(huge.velocity.is_finite());
    assert!(huge.position.is_finite());
    assert!(huge.velocity.length() <= config.max_desired_speed * 1.001);
    assert!(huge.velocity.length() >= config.max_desired_speed * 0.999);
    assert!(huge.velocity.distance(Vec3::ONE.normalize() * config.max_desired_speed) < 1.0);

    let bad_force = Vec3::new(f32::NAN, 0.0, f32::INFINITY);
    let broken = integrate(&boid(Vec3::X), bad_force, &s, DT, &config).unwrap();
    assert_eq!(broken.velocity, Vec3::ZERO);
    assert!(broken.orientation.is_finite());
}
