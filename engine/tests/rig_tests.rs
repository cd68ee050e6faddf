//! Rig Tests - Components Wired Together
//!
//! Input dispatch feeding locomotion and the camera, locomotion feeding foot IK
//! suppression, foot contacts feeding capsule elevation, and config files.

use approx::assert_relative_eq;
use footfall_engine::camera::ShoulderCamera;
use footfall_engine::config::RigConfig;
use footfall_engine::error::ConfigError;
use footfall_engine::input::{InputChannel, InputDispatcher, InputEvent};
use footfall_engine::physics::{Collider, CollisionWorld, LayerMask, Transform};
use footfall_engine::player::{
    ElevationController, FootBone, FootIkEngine, FootSide, IkAnimator, LocomotionController,
};
use glam::{Quat, Vec2, Vec3};

const DT: f32 = 1.0 / 50.0;

/// Animator whose feet stand on a staircase: left foot one step higher.
struct StairAnimator {
    body: Transform,
    left_height: f32,
}

impl IkAnimator for StairAnimator {
    fn body_transform(&self) -> Transform {
        self.body
    }

    fn bone(&self, bone: FootBone) -> Option<Transform> {
        Some(match bone {
            FootBone::LeftFoot | FootBone::LeftToes => self.animated_goal(FootSide::Left),
            FootBone::RightFoot | FootBone::RightToes => self.animated_goal(FootSide::Right),
        })
    }

    fn animated_goal(&self, side: FootSide) -> Transform {
        match side {
            FootSide::Left => Transform::from_position(Vec3::new(-0.1, self.left_height, 0.0)),
            FootSide::Right => Transform::from_position(Vec3::new(0.1, 0.0, 0.0)),
        }
    }

    fn set_ik_position(&mut self, _side: FootSide, _position: Vec3) {}
    fn set_ik_position_weight(&mut self, _side: FootSide, _weight: f32) {}
    fn set_ik_rotation(&mut self, _side: FootSide, _rotation: Quat) {}
    fn set_ik_rotation_weight(&mut self, _side: FootSide, _weight: f32) {}
}

/// Floor with a 0.2m step under x < 0.
fn staircase() -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add(Collider::plane(Vec3::ZERO, Vec3::Y), 0);
    world.add(Collider::aabb(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(0.0, 0.2, 1.0)), 0);
    world
}

#[test]
fn test_input_drives_locomotion_and_camera() {
    let config = RigConfig::default();
    let mut input = InputDispatcher::new();
    let walker = input.subscribe(&[InputChannel::Movement]);
    let viewer = input.subscribe(&[InputChannel::Camera]);
    let mut locomotion = LocomotionController::new(config.locomotion.clone());
    let mut camera = ShoulderCamera::new(config.camera.clone());

    input.publish(InputEvent::Move(Vec2::Y));
    input.publish(InputEvent::Rotate(Vec2::new(90.0, 0.0)));
    for event in input.drain(walker) {
        locomotion.handle(&event);
    }
    for event in input.drain(viewer) {
        camera.handle(&event);
    }

    let mut params = locomotion.params();
    for _ in 0..500 {
        params = locomotion.tick(DT, camera.orbit_rotation(), Vec3::NEG_Z, false);
    }

    assert!(params.has_movement && params.is_moving);
    assert_relative_eq!(params.speed, 1.0, epsilon = 1e-4);
    // Camera turned to +X, so walking forward means walking toward +X
    let facing = locomotion.facing().normalize();
    assert_relative_eq!(facing.x, 1.0, epsilon = 1e-3);
}

#[test]
fn test_locomotion_state_suppresses_swinging_foot() {
    let config = RigConfig::default();
    let animator = StairAnimator {
        body: Transform::IDENTITY,
        left_height: 0.7,
    };
    let mut feet = FootIkEngine::configure(animator, config.foot_ik.clone())
        .expect("rig configures");
    let mut locomotion = LocomotionController::new(config.locomotion.clone());
    let world = staircase();

    locomotion.on_move(Vec2::Y);
    for _ in 0..5 {
        let params = locomotion.tick(DT, Quat::IDENTITY, Vec3::NEG_Z, false);
        feet.set_moving(params.is_moving);
        feet.tick(&world, DT);
    }
    assert!(feet.foot(FootSide::Left).is_suppressed());

    locomotion.on_move(Vec2::ZERO);
    let params = locomotion.tick(DT, Quat::IDENTITY, Vec3::NEG_Z, false);
    feet.set_moving(params.is_moving);
    feet.tick(&world, DT);
    assert!(!feet.foot(FootSide::Left).is_suppressed());
}

#[test]
fn test_foot_contacts_lower_capsule_on_stairs() {
    let config = RigConfig::default();
    let animator = StairAnimator {
        body: Transform::IDENTITY,
        left_height: 0.2,
    };
    let mut feet = FootIkEngine::configure(animator, config.foot_ik.clone())
        .expect("rig configures");
    let mut elevation = ElevationController::new(config.elevation.clone());
    let world = staircase();
    // Body rays sample the floor clear of the step edge
    let body = Transform::from_position(Vec3::new(0.5, 0.0, 0.0));

    for _ in 0..1000 {
        feet.tick(&world, DT);
        let (left, right) = feet.contact_points();
        elevation.set_foot_hits(left, right);
        elevation.tick(&world, body, DT);
    }

    let (left, right) = feet.contact_points();
    assert_relative_eq!(left.expect("left on step").y, 0.2, epsilon = 1e-5);
    assert_relative_eq!(right.expect("right on floor").y, 0.0, epsilon = 1e-5);

    // Feet 0.2m apart on flat body rays: displacement 0.2 * 0.25
    let capsule = elevation.output();
    assert_relative_eq!(capsule.height, 1.75, epsilon = 1e-4);
    assert_relative_eq!(
        config.elevation.flat_ground_height - capsule.height,
        capsule.center.y - config.elevation.flat_ground_center.y,
        epsilon = 1e-5
    );
}

#[test]
fn test_config_file_round_trip() {
    let mut config = RigConfig::default();
    config.foot_ik.ground_layer_mask = LayerMask::from_layers(&[0, 4]);
    config.camera.pitch_limits_deg = (-45.0, 60.0);

    let path = std::env::temp_dir().join(format!("footfall_rig_{}.json", std::process::id()));
    std::fs::write(&path, config.to_json_string().expect("serializes")).expect("temp file writes");
    let loaded = RigConfig::load(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(loaded.expect("config loads"), config);
}

#[test]
fn test_config_rejects_empty_ground_mask() {
    let result = RigConfig::from_json_str(r#"{ "foot_ik": { "ground_layer_mask": 0 } }"#);
    assert!(matches!(
        result,
        Err(ConfigError::Invalid {
            field: "ground_layer_mask",
            ..
        })
    ));
}
