use boid_flock::{
    AnchorPoint, CameraAttachment, FlockError, FlockSettings, Pose, SettingKey, SettingsStore,
    Simulation, SimulationConfig, Trace,
};
use glam::Vec3;
use std::path::PathBuf;

fn anchors() -> Vec<AnchorPoint> {
    vec![
        AnchorPoint::new(Pose::at(Vec3::ZERO), Trace::fixed(Vec3::new(5.0, 0.0, 0.0))),
        AnchorPoint::new(
            Pose::at(Vec3::new(0.0, 10.0, 0.0)),
            Trace::new(vec![Vec3::new(0.0, 10.0, 0.2), Vec3::new(4.0, 10.0, 0.0)]),
        ),
    ]
}

fn config(path: Option<PathBuf>) -> SimulationConfig {
    SimulationConfig {
        anchors: anchors(),
        aux_birds_count: 3,
        seed: 7,
        settings_path: path,
        ..SimulationConfig::default()
    }
}

#[test]
fn start_pads_settings_and_spawns_the_active_flock() {
    let sim = Simulation::start(config(None)).unwrap();

    assert_eq!(sim.store().len(), 2);
    assert_eq!(sim.world().agent_count(), 10);
    assert_eq!(sim.camera_target(), sim.handle().leader);
    assert_eq!(sim.camera_attachment(), CameraAttachment::Attached);
    assert_eq!(sim.placements().len(), 10);
}

#[test]
fn out_of_range_anchor_is_rejected() {
    let cfg = SimulationConfig { active_anchor: 5, ..config(None) };
    assert!(matches!(
        Simulation::start(cfg),
        Err(FlockError::InvalidAnchor { index: 5, count: 2 })
    ));
}

#[test]
fn anchor_without_trace_fails_at_spawn() {
    let mut cfg = config(None);
    cfg.anchors[0].trace = None;
    assert!(matches!(Simulation::start(cfg), Err(FlockError::MissingTrace)));
}

#[test]
fn restart_is_idempotent() {
    let mut sim = Simulation::start(config(None)).unwrap();
    let initial = sim.placements();

    for _ in 0..30 {
        sim.tick(1.0 / 60.0);
    }
    assert_ne!(sim.placements(), initial);

    let first = sim.restart().unwrap();
    let after_first = sim.placements();
    let second = sim.restart().unwrap();

    assert_eq!(first, second);
    assert_eq!(after_first, initial);
    assert_eq!(sim.placements(), initial);
    assert_eq!(sim.world().ticks(), 0);
}

#[test]
fn camera_can_be_detached_and_reattached() {
    let mut sim = Simulation::start(config(None)).unwrap();
    let target = sim.camera_target();

    sim.detach_camera();
    assert_eq!(sim.camera_attachment(), CameraAttachment::Detached);
    sim.tick(1.0 / 60.0);
    assert_eq!(sim.camera_target(), target);

    sim.attach_camera();
    assert_eq!(sim.camera_attachment(), CameraAttachment::Attached);
}

#[test]
fn closing_the_panel_always_saves() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut sim = Simulation::start(config(Some(path.clone()))).unwrap();

    assert!(sim.toggle_settings_panel().unwrap());
    assert!(!sim.toggle_settings_panel().unwrap());
    assert!(path.exists());
    assert_eq!(SettingsStore::load(&path).unwrap().len(), 2);

    assert!(sim.toggle_settings_panel().unwrap());
    sim.set_setting(SettingKey::Inertness, 0.9).unwrap();
    assert_eq!(sim.settings().unwrap().inertness, 0.9);
    assert!(!sim.toggle_settings_panel().unwrap());

    let saved = SettingsStore::load(&path).unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(saved.get(0).unwrap().inertness, 0.9);
    assert_eq!(saved.get(1), Some(&FlockSettings::default()));
}

#[test]
fn edits_made_while_closed_are_saved_on_next_close() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut sim = Simulation::start(config(Some(path.clone()))).unwrap();

    sim.set_setting(SettingKey::SpeedMultiplier, 6.5).unwrap();
    assert!(!path.exists());

    assert!(sim.toggle_settings_panel().unwrap());
    assert!(!sim.toggle_settings_panel().unwrap());

    let saved = SettingsStore::load(&path).unwrap();
    assert_eq!(saved.get(0).unwrap().speed_multiplier, 6.5);
}

#[test]
fn non_finite_tuning_survives_save_and_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let mut sim = Simulation::start(config(Some(path.clone()))).unwrap();

    sim.set_setting(SettingKey::AttractionForce, f32::INFINITY).unwrap();
    sim.save().unwrap();

    let sim = Simulation::start(config(Some(path))).unwrap();
    let settings = sim.settings().unwrap();
    assert_eq!(settings.attraction_force, FlockSettings::default().attraction_force);
    assert!(settings.is_valid());
}

#[test]
fn saved_settings_are_used_on_next_start() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.json");

    let custom = FlockSettings { speed_multiplier: 11.0, ..FlockSettings::default() };
    SettingsStore::new(vec![FlockSettings::default(), custom]).save(&path).unwrap();

    let cfg = SimulationConfig { active_anchor: 1, ..config(Some(path)) };
    let sim = Simulation::start(cfg).unwrap();
    assert_eq!(sim.settings().unwrap().speed_multiplier, 11.0);
}

#[test]
fn trace_advances_when_the_leader_arrives() {
    let cfg = SimulationConfig { active_anchor: 1, aux_birds_count: 0, ..config(None) };
    let mut sim = Simulation::start(cfg).unwrap();
    let flock = sim.handle().flock;
    assert_eq!(sim.world().trace(flock).unwrap().current_index(), 0);

    sim.tick(1.0 / 60.0);
    assert_eq!(sim.world().trace(flock).unwrap().current_index(), 1);
}
