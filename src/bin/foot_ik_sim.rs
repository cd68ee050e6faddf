//! Foot IK Simulation - Headless Rig Demo
//!
//! Run with: `cargo run --bin foot-ik-sim [rig.json]`
//!
//! Walks a scripted character across flat ground, a ramp and a step while the
//! full rig runs: input dispatch, locomotion, foot IK, capsule elevation and the
//! shoulder camera. Physics ticks at 50 Hz; pose application runs once per 60 Hz
//! frame. Set `RUST_LOG=debug` to see foot phase changes.

use std::f32::consts::TAU;
use std::path::Path;

use footfall_engine::animation::FixedStepClock;
use footfall_engine::camera::ShoulderCamera;
use footfall_engine::config::RigConfig;
use footfall_engine::input::{InputChannel, InputDispatcher, InputEvent};
use footfall_engine::physics::{Collider, CollisionWorld, GroundProbe, LayerMask, Transform};
use footfall_engine::player::{
    ElevationController, FootBone, FootIkEngine, FootSide, IkAnimator, LocomotionController,
    facing_after_root_motion,
};
use glam::{Quat, Vec2, Vec3};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Physics tick length (seconds)
const FIXED_PHYSICS_STEP_S: f32 = 1.0 / 50.0;

/// Rendered frame length (seconds)
const FRAME_DT_S: f32 = 1.0 / 60.0;

/// Ticks allowed per frame before backlog is dropped
const MAX_FIXED_STEPS_PER_FRAME: usize = 5;

/// Length of the scripted run (seconds)
const SIM_DURATION_S: f32 = 12.0;

/// Root motion speed at locomotion speed 1.0 (m/s)
const WALK_SPEED: f32 = 1.4;

/// Gait cycles per second at locomotion speed 1.0
const GAIT_FREQUENCY: f32 = 0.9;

/// Layer of walkable level geometry
const GROUND_LAYER: u8 = 0;

/// Layer of the stairs trigger volume
const STAIRS_LAYER: u8 = 3;

/// Animator stand-in that plays a procedural walk cycle and records IK writes.
struct GaitAnimator {
    body: Transform,
    phase: f32,
    stride: f32,
    goals: [Transform; 2],
    position_weights: [f32; 2],
    rotation_weights: [f32; 2],
}

impl GaitAnimator {
    fn new(position: Vec3) -> Self {
        Self {
            body: Transform::from_position(position),
            phase: 0.0,
            stride: 0.0,
            goals: [Transform::IDENTITY; 2],
            position_weights: [0.0; 2],
            rotation_weights: [0.0; 2],
        }
    }

    /// Advance the walk cycle for a frame at the given locomotion speed.
    fn play(&mut self, speed: f32, dt: f32) {
        self.phase = (self.phase + speed * GAIT_FREQUENCY * TAU * dt).rem_euclid(TAU);
        self.stride = 0.35 * speed.min(1.5);
    }

    fn index(side: FootSide) -> usize {
        match side {
            FootSide::Left => 0,
            FootSide::Right => 1,
        }
    }
}

impl IkAnimator for GaitAnimator {
    fn body_transform(&self) -> Transform {
        self.body
    }

    fn bone(&self, bone: FootBone) -> Option<Transform> {
        let side = match bone {
            FootBone::LeftFoot | FootBone::LeftToes => FootSide::Left,
            FootBone::RightFoot | FootBone::RightToes => FootSide::Right,
        };
        Some(self.animated_goal(side))
    }

    fn animated_goal(&self, side: FootSide) -> Transform {
        let (lateral, phase) = match side {
            FootSide::Left => (-0.1, self.phase),
            FootSide::Right => (0.1, self.phase + TAU * 0.5),
        };
        let swing = phase.sin() * self.stride * 0.5;
        let lift = phase.cos().max(0.0) * self.stride * 0.3;
        let local = Vec3::new(lateral, 0.08 + lift, -swing);
        Transform::new(self.body.position + self.body.rotation * local, self.body.rotation)
    }

    fn set_ik_position(&mut self, side: FootSide, position: Vec3) {
        self.goals[Self::index(side)].position = position;
    }

    fn set_ik_position_weight(&mut self, side: FootSide, weight: f32) {
        self.position_weights[Self::index(side)] = weight;
    }

    fn set_ik_rotation(&mut self, side: FootSide, rotation: Quat) {
        self.goals[Self::index(side)].rotation = rotation;
    }

    fn set_ik_rotation_weight(&mut self, side: FootSide, weight: f32) {
        self.rotation_weights[Self::index(side)] = weight;
    }
}

/// Flat floor, a ramp climbing away from the start and a step beyond it.
fn build_level() -> CollisionWorld {
    let mut world = CollisionWorld::new();
    world.add(Collider::plane(Vec3::ZERO, Vec3::Y), GROUND_LAYER);
    // Ramp center at z=-6, rising toward -Z by 12 degrees over 4m
    let ramp_angle = 12f32.to_radians();
    let ramp_half_length = 2.0;
    world.add(
        Collider::slope(
            Vec3::new(0.0, ramp_half_length * ramp_angle.sin(), -6.0),
            std::f32::consts::PI,
            ramp_angle,
            Vec2::new(2.0, ramp_half_length / ramp_angle.cos()),
        ),
        GROUND_LAYER,
    );
    let ramp_top = 2.0 * ramp_half_length * ramp_angle.tan();
    world.add(
        Collider::aabb(Vec3::new(-2.0, 0.0, -20.0), Vec3::new(2.0, ramp_top, -8.0)),
        GROUND_LAYER,
    );
    world
}

fn load_config() -> Result<RigConfig, Box<dyn std::error::Error>> {
    match std::env::args().nth(1) {
        Some(path) => Ok(RigConfig::load(Path::new(&path))?),
        None => {
            let mut config = RigConfig::default();
            config.foot_ik.ground_layer_mask = LayerMask::from_layers(&[GROUND_LAYER]);
            config.elevation.raycast_layer_mask = LayerMask::from_layers(&[GROUND_LAYER]);
            config.elevation.stairs_layer = LayerMask::from_layers(&[STAIRS_LAYER]);
            Ok(config)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = load_config()?;
    let world = build_level();
    let body_ground = GroundProbe::new(2.0, config.foot_ik.ground_layer_mask).with_vertical_offset(1.0);

    let mut input = InputDispatcher::new();
    let walker = input.subscribe(&[InputChannel::Movement]);
    let camera_listener = input.subscribe(&[InputChannel::Camera]);

    let mut feet = FootIkEngine::configure(GaitAnimator::new(Vec3::ZERO), config.foot_ik.clone())?;
    let mut elevation = ElevationController::new(config.elevation.clone());
    let mut locomotion = LocomotionController::new(config.locomotion.clone());
    let mut camera = ShoulderCamera::new(config.camera.clone());
    let mut clock = FixedStepClock::new(FIXED_PHYSICS_STEP_S, MAX_FIXED_STEPS_PER_FRAME);

    info!(
        colliders = world.len(),
        duration_s = SIM_DURATION_S,
        "starting foot IK simulation"
    );

    let mut time = 0.0f32;
    let mut next_report = 1.0f32;
    let mut was_stairs = false;
    while time < SIM_DURATION_S {
        // Scripted input: walk, run through the ramp, glance around, stop at the end
        let move_input = if time < 1.0 || time > SIM_DURATION_S - 2.0 {
            Vec2::ZERO
        } else {
            Vec2::Y
        };
        if move_input != input.movement_input() {
            input.publish(InputEvent::Move(move_input));
        }
        if (4.0..4.0 + FRAME_DT_S).contains(&time) {
            input.publish(InputEvent::Run(true));
        }
        if (7.0..7.0 + FRAME_DT_S).contains(&time) {
            input.publish(InputEvent::Run(false));
        }
        input.publish(InputEvent::Rotate(Vec2::new((time * 0.7).sin() * 0.2, 0.0)));

        for event in input.drain(walker) {
            locomotion.handle(&event);
        }
        for event in input.drain(camera_listener) {
            camera.handle(&event);
        }

        // Physics phase
        for _ in 0..clock.advance(FRAME_DT_S) {
            let dt = clock.step();
            let body = feet.animator().body_transform();
            let params = locomotion.tick(dt, camera.orbit_rotation(), body.forward(), false);
            feet.set_moving(params.is_moving);
            feet.tick(&world, dt);

            let (left, right) = feet.contact_points();
            elevation.set_foot_hits(left, right);
            elevation.tick(&world, body, dt);

            let in_stairs = body.position.z < -4.0 && body.position.z > -8.0;
            if in_stairs != was_stairs {
                if in_stairs {
                    elevation.on_trigger_enter(STAIRS_LAYER);
                } else {
                    elevation.on_trigger_exit(STAIRS_LAYER);
                }
                was_stairs = in_stairs;
            }

            // Root motion
            let forward = facing_after_root_motion(
                body.forward(),
                body.right(),
                params.speed * WALK_SPEED,
                params.direction,
                Quat::IDENTITY,
                locomotion.config(),
            );
            let mut position = body.position + forward * params.speed * WALK_SPEED * dt;
            if let Some(ground) = body_ground.probe(&world, position, body.rotation) {
                position.y = ground.point.y;
            }
            let rotation = Quat::from_rotation_arc(Vec3::NEG_Z, forward);
            feet.animator_mut().body = Transform::new(position, rotation);
        }

        // Pose phase
        let speed = locomotion.params().speed;
        feet.animator_mut().play(speed, FRAME_DT_S);
        feet.apply_pose();
        let view = camera.update(feet.animator().body_transform().position, FRAME_DT_S);

        time += FRAME_DT_S;
        if time >= next_report {
            next_report += 1.0;
            let animator = feet.animator();
            let capsule = elevation.output();
            let (left_phase, right_phase) = feet.phases();
            info!(
                t = time,
                body = ?animator.body.position,
                speed = locomotion.params().speed,
                ?left_phase,
                ?right_phase,
                left_goal_y = animator.goals[0].position.y,
                right_goal_y = animator.goals[1].position.y,
                left_weight = animator.position_weights[0],
                right_weight = animator.position_weights[1],
                left_rotation_weight = animator.rotation_weights[0],
                right_rotation_weight = animator.rotation_weights[1],
                capsule_height = capsule.height,
                in_stairs = capsule.in_stairs,
                camera = ?view.position,
                "rig summary"
            );
        }
    }

    info!("simulation finished");
    Ok(())
}
