//! Foot IK Tests - Engine Configuration, Physics Phase and Pose Phase
//!
//! Drives FootIkEngine against a CollisionWorld with a recording animator that
//! captures every IK write.

use approx::assert_relative_eq;
use footfall_engine::config::FootIkConfig;
use footfall_engine::error::FootIkError;
use footfall_engine::physics::{Collider, CollisionWorld, Transform};
use footfall_engine::player::{FootBone, FootIkEngine, FootPhase, FootSide, IkAnimator};
use glam::{Quat, Vec2, Vec3};

const DT: f32 = 1.0 / 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum IkWrite {
    Position(FootSide, Vec3),
    PositionWeight(FootSide, f32),
    Rotation(FootSide, Quat),
    RotationWeight(FootSide, f32),
}

/// Animator with fixed animated goals that records IK writes in order.
#[derive(Debug)]
struct RecordingAnimator {
    body: Transform,
    left_goal: Transform,
    right_goal: Transform,
    missing: Vec<FootBone>,
    writes: Vec<IkWrite>,
}

impl RecordingAnimator {
    fn standing_at(position: Vec3) -> Self {
        Self {
            body: Transform::from_position(position),
            left_goal: Transform::from_position(position + Vec3::new(-0.1, 0.0, 0.0)),
            right_goal: Transform::from_position(position + Vec3::new(0.1, 0.0, 0.0)),
            missing: Vec::new(),
            writes: Vec::new(),
        }
    }

    fn without(mut self, bone: FootBone) -> Self {
        self.missing.push(bone);
        self
    }

    fn weight_written(&self, side: FootSide) -> Option<f32> {
        self.writes.iter().rev().find_map(|write| match *write {
            IkWrite::PositionWeight(s, w) if s == side => Some(w),
            _ => None,
        })
    }

    fn position_written(&self, side: FootSide) -> Option<Vec3> {
        self.writes.iter().rev().find_map(|write| match *write {
            IkWrite::Position(s, p) if s == side => Some(p),
            _ => None,
        })
    }
}

impl IkAnimator for RecordingAnimator {
    fn body_transform(&self) -> Transform {
        self.body
    }

    fn bone(&self, bone: FootBone) -> Option<Transform> {
        if self.missing.contains(&bone) {
            return None;
        }
        Some(match bone {
            FootBone::LeftFoot | FootBone::LeftToes => self.left_goal,
            FootBone::RightFoot | FootBone::RightToes => self.right_goal,
        })
    }

    fn animated_goal(&self, side: FootSide) -> Transform {
        match side {
            FootSide::Left => self.left_goal,
            FootSide::Right => self.right_goal,
        }
    }

    fn set_ik_position(&mut self, side: FootSide, position: Vec3) {
        self.writes.push(IkWrite::Position(side, position));
    }

    fn set_ik_position_weight(&mut self, side: FootSide, weight: f32) {
        self.writes.push(IkWrite::PositionWeight(side, weight));
    }

    fn set_ik_rotation(&mut self, side: FootSide, rotation: Quat) {
        self.writes.push(IkWrite::Rotation(side, rotation));
    }

    fn set_ik_rotation_weight(&mut self, side: FootSide, weight: f32) {
        self.writes.push(IkWrite::RotationWeight(side, weight));
    }
}

fn floor_at(height: f32) -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add(Collider::plane(Vec3::new(0.0, height, 0.0), Vec3::Y), 0);
    world
}

fn engine() -> FootIkEngine<RecordingAnimator> {
    FootIkEngine::configure(RecordingAnimator::standing_at(Vec3::ZERO), FootIkConfig::default())
        .expect("complete rig configures")
}

// ============================================================================
// Configure
// ============================================================================

#[test]
fn test_configure_rejects_missing_foot_bone() {
    let animator = RecordingAnimator::standing_at(Vec3::ZERO).without(FootBone::RightFoot);
    let result = FootIkEngine::configure(animator, FootIkConfig::default());
    assert!(matches!(result, Err(FootIkError::MissingBone(FootBone::RightFoot))));
}

#[test]
fn test_configure_allows_missing_toes() {
    let animator = RecordingAnimator::standing_at(Vec3::ZERO)
        .without(FootBone::LeftToes)
        .without(FootBone::RightToes);
    assert!(FootIkEngine::configure(animator, FootIkConfig::default()).is_ok());
}

#[test]
fn test_configure_rejects_invalid_config() {
    let config = FootIkConfig {
        correction_acceleration_rate: -5.0,
        ..Default::default()
    };
    let result = FootIkEngine::configure(RecordingAnimator::standing_at(Vec3::ZERO), config);
    assert!(matches!(result, Err(FootIkError::InvalidConfig(_))));
}

#[test]
fn test_configured_engine_starts_airborne() {
    let feet = engine();
    assert_eq!(feet.phases(), (FootPhase::Airborne, FootPhase::Airborne));
    assert_eq!(feet.foot(FootSide::Left).weight(), 0.0);
    assert!(feet.is_enabled());
    assert!(!feet.is_moving());
}

// ============================================================================
// Physics phase
// ============================================================================

#[test]
fn test_foot_rests_height_correction_above_ground() {
    let mut feet = engine();
    let world = floor_at(-0.05);

    feet.tick(&world, DT);

    for side in FootSide::BOTH {
        let state = feet.foot(side).state();
        assert_relative_eq!(state.corrected_position.y, 0.05, epsilon = 1e-5);
        assert_eq!(feet.foot(side).phase(), FootPhase::Grounded);
    }
    // One tick at rate 5: 1.0 * 5 * 0.02
    assert_relative_eq!(feet.foot(FootSide::Left).weight(), 0.1, epsilon = 1e-6);
}

#[test]
fn test_weight_converges_to_one_on_ground() {
    let mut feet = engine();
    let world = floor_at(0.0);

    let mut previous = 0.0;
    for _ in 0..2000 {
        feet.tick(&world, DT);
        let weight = feet.foot(FootSide::Right).weight();
        assert!(weight >= previous && weight <= 1.0);
        previous = weight;
    }
    assert_eq!(previous, 1.0);
}

#[test]
fn test_ledge_falls_back_to_animated_pose() {
    let mut feet = engine();
    let ground = floor_at(0.0);
    for _ in 0..100 {
        feet.tick(&ground, DT);
    }
    let grounded_weight = feet.foot(FootSide::Left).weight();

    let void = CollisionWorld::new();
    feet.tick(&void, DT);

    let foot = feet.foot(FootSide::Left);
    assert_eq!(foot.phase(), FootPhase::Airborne);
    assert_eq!(foot.state().corrected_position, Vec3::new(-0.1, 0.0, 0.0));
    assert!(foot.weight() < grounded_weight);
    assert_eq!(feet.contact_points(), (None, None));
}

#[test]
fn test_moving_foot_mid_swing_is_suppressed() {
    let mut animator = RecordingAnimator::standing_at(Vec3::ZERO);
    animator.left_goal.position.y = 0.5;
    let mut feet = FootIkEngine::configure(animator, FootIkConfig::default())
        .expect("complete rig configures");
    let world = floor_at(-0.05);

    feet.set_moving(true);
    for _ in 0..10 {
        feet.tick(&world, DT);
    }

    let left = feet.foot(FootSide::Left);
    assert!(left.is_suppressed());
    assert_eq!(left.weight(), 0.0);
    assert_eq!(left.state().corrected_position, Vec3::new(-0.1, 0.5, 0.0));
    // The planted foot still corrects
    assert!(!feet.foot(FootSide::Right).is_suppressed());
    assert!(feet.foot(FootSide::Right).weight() > 0.0);

    feet.set_moving(false);
    feet.tick(&world, DT);
    let left = feet.foot(FootSide::Left);
    assert!(!left.is_suppressed());
    assert_relative_eq!(left.state().corrected_position.y, 0.05, epsilon = 1e-5);
}

#[test]
fn test_body_normal_follows_slope() {
    let mut feet = engine();
    let mut world = CollisionWorld::new();
    let angle = 15f32.to_radians();
    world.add(Collider::slope(Vec3::ZERO, 0.0, angle, Vec2::splat(10.0)), 0);

    for _ in 0..500 {
        feet.tick(&world, DT);
    }

    let normal = feet.body_normal();
    assert_relative_eq!(normal.length(), 1.0, epsilon = 1e-5);
    assert_relative_eq!(normal.angle_between(Vec3::Y), angle, epsilon = 1e-3);

    // Foot up axis tilts with the ground
    let up = feet.foot(FootSide::Left).state().corrected_rotation * Vec3::Y;
    assert_relative_eq!(up.angle_between(Vec3::Y), angle, epsilon = 1e-3);
}

// ============================================================================
// Pose phase
// ============================================================================

#[test]
fn test_apply_pose_writes_all_goals_and_weights() {
    let mut feet = engine();
    let world = floor_at(-0.05);
    for _ in 0..5 {
        feet.tick(&world, DT);
    }

    feet.apply_pose();

    let animator = feet.animator();
    assert_eq!(animator.writes.len(), 8);
    for side in FootSide::BOTH {
        let state = feet.foot(side).state();
        assert_eq!(animator.position_written(side), Some(state.corrected_position));
        assert_eq!(animator.weight_written(side), Some(state.weight.current()));
    }
    assert!(animator.writes.contains(&IkWrite::RotationWeight(
        FootSide::Left,
        feet.foot(FootSide::Left).weight()
    )));
}

#[test]
fn test_apply_pose_does_not_change_state() {
    let mut feet = engine();
    let world = floor_at(0.0);
    feet.tick(&world, DT);

    let before = *feet.foot(FootSide::Left).state();
    feet.apply_pose();
    feet.apply_pose();

    assert_eq!(*feet.foot(FootSide::Left).state(), before);
    let writes = &feet.animator().writes;
    assert_eq!(writes[..8], writes[8..]);
}

#[test]
fn test_disabled_engine_neither_ticks_nor_writes() {
    let mut feet = engine();
    let world = floor_at(0.0);
    feet.set_enabled(false);

    feet.tick(&world, DT);
    feet.apply_pose();

    assert_eq!(feet.foot(FootSide::Left).weight(), 0.0);
    assert!(feet.animator().writes.is_empty());
}

#[test]
fn test_reenable_starts_from_zero_weight() {
    let mut feet = engine();
    let world = floor_at(0.0);
    for _ in 0..50 {
        feet.tick(&world, DT);
    }
    assert!(feet.foot(FootSide::Left).weight() > 0.5);

    feet.set_enabled(false);
    feet.set_enabled(true);

    assert_eq!(feet.foot(FootSide::Left).weight(), 0.0);
    assert_eq!(feet.phases(), (FootPhase::Airborne, FootPhase::Airborne));
}

#[test]
fn test_identical_inputs_are_bit_reproducible() {
    fn run() -> Vec<IkWrite> {
        let mut feet = engine();
        let mut world = floor_at(0.0);
        world.add(Collider::aabb(Vec3::new(0.0, 0.0, -1.0), Vec3::new(1.0, 0.18, 1.0)), 0);
        for frame in 0..300 {
            if frame % 3 != 0 {
                feet.tick(&world, DT);
            }
            feet.set_moving(frame % 50 < 25);
            feet.animator_mut().left_goal.position.y = ((frame as f32) * 0.1).sin().abs() * 0.2;
            feet.apply_pose();
        }
        feet.into_animator().writes
    }

    let first = run();
    let second = run();
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        match (a, b) {
            (IkWrite::Position(_, pa), IkWrite::Position(_, pb)) => {
                assert_eq!(pa.to_array().map(f32::to_bits), pb.to_array().map(f32::to_bits))
            }
            _ => assert_eq!(a, b),
        }
    }
}

#[test]
fn test_debug_rays_start_above_feet() {
    let mut feet = engine();
    feet.tick(&floor_at(0.0), DT);

    let (left, right) = feet.debug_rays();
    assert_relative_eq!(left.origin.x, -0.1, epsilon = 1e-6);
    assert_relative_eq!(right.origin.x, 0.1, epsilon = 1e-6);
    assert_relative_eq!(left.origin.y, 0.25, epsilon = 1e-6);
    assert_eq!(left.direction, Vec3::NEG_Y);
}
