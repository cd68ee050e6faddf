//! Locomotion Controller
//!
//! Turns movement input into the parameters a locomotion blend tree consumes:
//! speed, facing angle and a steering `direction`. Movement is relative to the
//! camera facing.
//!
//! # Smoothing
//!
//! - Input movement vector: damped at `movement_rate` (5.0/s)
//! - Facing direction: damped at `direction_rate` (2.5/s)
//! - `direction` parameter: damped with time constant `direction_damp_time` (0.05s)
//! - Running multiplies the input by `run_multiplier` (2.0)
//!
//! # Usage
//!
//! ```rust,ignore
//! use footfall_engine::player::LocomotionController;
//!
//! let mut locomotion = LocomotionController::new(config.locomotion.clone());
//! for event in input.drain(listener) {
//!     locomotion.handle(&event);
//! }
//!
//! // Each physics tick:
//! let params = locomotion.tick(dt, camera.rotation(), body.forward(), pivoting);
//! feet.set_moving(params.is_moving);
//! ```

use glam::{Quat, Vec2, Vec3};

use crate::animation::{DampedApproach, DampedVector2, DampedVector3};
use crate::config::LocomotionConfig;
use crate::input::InputEvent;

/// Input magnitudes at or below this count as no movement.
pub const MOVEMENT_EPSILON: f32 = 1e-4;

/// Scale from the forward/facing cross product to the `direction` parameter.
const DIRECTION_SCALE: f32 = 2.0;

/// Blend tree parameters produced each tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LocomotionParams {
    /// Magnitude of the smoothed movement vector (0..run_multiplier)
    pub speed: f32,
    /// Whether movement input is held
    pub has_movement: bool,
    /// Signed angle between the desired facing and the body forward (degrees), 0 when idle
    pub angle: f32,
    /// Smoothed lateral steering term
    pub direction: f32,
    /// Moving or pivoting; drives foot IK suppression
    pub is_moving: bool,
}

/// Camera-relative walk controller.
#[derive(Debug, Clone)]
pub struct LocomotionController {
    config: LocomotionConfig,
    movement: DampedVector2,
    facing: DampedVector3,
    direction: DampedApproach,
    raw_input: Vec2,
    speed_multiplier: f32,
    params: LocomotionParams,
}

impl LocomotionController {
    pub fn new(config: LocomotionConfig) -> Self {
        let direction_rate = if config.direction_damp_time > 0.0 {
            1.0 / config.direction_damp_time
        } else {
            0.0
        };
        Self {
            movement: DampedVector2::new(config.movement_rate),
            facing: DampedVector3::with_value(config.direction_rate, Vec3::NEG_Z),
            direction: DampedApproach::new(direction_rate),
            raw_input: Vec2::ZERO,
            speed_multiplier: 1.0,
            params: LocomotionParams::default(),
            config,
        }
    }

    pub fn config(&self) -> &LocomotionConfig {
        &self.config
    }

    /// Latest movement input (stick or WASD), clamped to unit length.
    pub fn on_move(&mut self, input: Vec2) {
        self.raw_input = input;
        self.update_movement_target();
    }

    /// Run toggle; re-applies the last movement input with the new multiplier.
    pub fn on_run(&mut self, running: bool) {
        self.speed_multiplier = if running {
            self.config.run_multiplier
        } else {
            1.0
        };
        self.update_movement_target();
    }

    /// Route a dispatched input event. Camera events are ignored.
    pub fn handle(&mut self, event: &InputEvent) {
        match *event {
            InputEvent::Move(input) => self.on_move(input),
            InputEvent::Run(running) => self.on_run(running),
            InputEvent::Rotate(_) => {}
        }
    }

    pub fn has_movement(&self) -> bool {
        self.movement.target().length() > MOVEMENT_EPSILON
    }

    /// Smoothed facing direction the body is steering toward.
    pub fn facing(&self) -> Vec3 {
        self.facing.current()
    }

    /// Unsmoothed facing target from the last tick.
    pub fn facing_target(&self) -> Vec3 {
        self.facing.target()
    }

    pub fn params(&self) -> LocomotionParams {
        self.params
    }

    /// Physics phase: advance smoothing and compute blend tree parameters.
    ///
    /// `player_forward` is the body's current facing; `pivoting` is reported by the
    /// host while a turn-in-place animation plays.
    pub fn tick(
        &mut self,
        dt: f32,
        camera_rotation: Quat,
        player_forward: Vec3,
        pivoting: bool,
    ) -> LocomotionParams {
        let has_movement = self.has_movement();
        self.movement.advance(dt);
        self.facing
            .set_target(self.facing_from_camera(camera_rotation, has_movement));
        self.facing.advance(dt);

        let steer = player_forward.cross(self.facing.current()).y * DIRECTION_SCALE;
        if self.direction.rate() > 0.0 {
            self.direction.set_target(steer);
            self.direction.advance(dt);
        } else {
            self.direction.snap_to(steer);
        }

        self.params = LocomotionParams {
            speed: self.movement.current().length(),
            has_movement,
            angle: if has_movement {
                signed_angle_deg(self.facing.target(), player_forward)
            } else {
                0.0
            },
            direction: self.direction.current(),
            is_moving: has_movement || pivoting,
        };
        self.params
    }

    /// Drop input and smoothing state (teleport, respawn).
    pub fn reset(&mut self, forward: Vec3) {
        self.raw_input = Vec2::ZERO;
        self.speed_multiplier = 1.0;
        self.movement.snap_to(Vec2::ZERO);
        self.facing.snap_to(forward);
        self.direction.snap_to(0.0);
        self.params = LocomotionParams::default();
    }

    fn update_movement_target(&mut self) {
        self.movement
            .set_target(self.raw_input.clamp_length_max(1.0) * self.speed_multiplier);
    }

    fn facing_from_camera(&self, camera_rotation: Quat, has_movement: bool) -> Vec3 {
        let camera_forward = camera_rotation * Vec3::NEG_Z;
        if !has_movement {
            return flatten(camera_forward).unwrap_or(camera_forward);
        }
        let movement = self.movement.current();
        let local = Vec3::new(movement.x, 0.0, -movement.y);
        let mut world = camera_rotation * local;
        world.y = 0.0;
        world
    }
}

/// Body forward after applying one step of root motion rotation.
///
/// Above `steer_speed_threshold` the forward is nudged toward `right` by
/// `direction * steer_strength` before `delta_rotation` is applied.
pub fn facing_after_root_motion(
    forward: Vec3,
    right: Vec3,
    speed: f32,
    direction: f32,
    delta_rotation: Quat,
    config: &LocomotionConfig,
) -> Vec3 {
    let mut facing = forward;
    if speed > config.steer_speed_threshold {
        facing += right * direction * config.steer_strength;
    }
    (delta_rotation * facing).normalize_or(forward)
}

/// Unsigned angle between `a` and `b`, negated when `cross(a, b).y > 0`.
fn signed_angle_deg(a: Vec3, b: Vec3) -> f32 {
    if a.length_squared() <= f32::EPSILON || b.length_squared() <= f32::EPSILON {
        return 0.0;
    }
    let angle = a.angle_between(b).to_degrees();
    if a.cross(b).y > 0.0 { -angle } else { angle }
}

fn flatten(v: Vec3) -> Option<Vec3> {
    Vec3::new(v.x, 0.0, v.z).try_normalize()
}
