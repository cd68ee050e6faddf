//! Shoulder Camera
//!
//! Third-person follow camera framed over the character's shoulder.
//!
//! ## Orbit
//!
//! Look input accumulates yaw and pitch in degrees. The orbit rotation is
//! `Ry(-yaw) * Rx(pitch)`, so at yaw 0 the camera faces -Z, positive yaw turns it
//! toward +X and positive pitch tilts it up. Pitch is clamped to the configured
//! limits; yaw wraps freely.
//!
//! ## Framing
//!
//! ```text
//! position = target + orbit * position_displacement
//! look_at  = target + orbit * look_at_displacement
//! ```
//!
//! Both displacements are smoothed, so switching shoulders blends instead of
//! cutting. An `offset_rate` of 0 applies new framings immediately.

use glam::{Mat3, Quat, Vec2, Vec3};

use crate::animation::DampedVector3;
use crate::config::CameraConfig;
use crate::input::InputEvent;
use crate::physics::{Transform, WORLD_FORWARD, WORLD_UP};

/// Orbiting over-the-shoulder camera.
#[derive(Debug, Clone)]
pub struct ShoulderCamera {
    config: CameraConfig,
    /// Horizontal angle (degrees), positive turns toward +X
    yaw_deg: f32,
    /// Vertical angle (degrees), limited to `pitch_limits_deg`
    pitch_deg: f32,
    position_offset: DampedVector3,
    look_at_offset: DampedVector3,
    transform: Transform,
}

impl ShoulderCamera {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            position_offset: DampedVector3::with_value(
                config.offset_rate,
                config.position_displacement,
            ),
            look_at_offset: DampedVector3::with_value(
                config.offset_rate,
                config.look_at_displacement,
            ),
            yaw_deg: 0.0,
            pitch_deg: 0.0,
            transform: Transform::IDENTITY,
            config,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    pub fn yaw_deg(&self) -> f32 {
        self.yaw_deg
    }

    pub fn pitch_deg(&self) -> f32 {
        self.pitch_deg
    }

    /// Apply a look delta. `x` turns right, `y` tilts up.
    pub fn rotate(&mut self, delta: Vec2) {
        let (min, max) = self.config.pitch_limits_deg;
        self.yaw_deg = (self.yaw_deg + delta.x * self.config.look_sensitivity).rem_euclid(360.0);
        self.pitch_deg =
            (self.pitch_deg + delta.y * self.config.look_sensitivity).clamp(min, max);
    }

    /// Route a dispatched input event. Movement events are ignored.
    pub fn handle(&mut self, event: &InputEvent) {
        if let InputEvent::Rotate(delta) = *event {
            self.rotate(delta);
        }
    }

    /// Frame the target with new displacements (orbit space).
    pub fn set_shoulder(&mut self, position_displacement: Vec3, look_at_displacement: Vec3) {
        self.position_offset.set_target(position_displacement);
        self.look_at_offset.set_target(look_at_displacement);
    }

    /// Mirror the framing to the other shoulder.
    pub fn swap_shoulder(&mut self) {
        let mirror = Vec3::new(-1.0, 1.0, 1.0);
        self.set_shoulder(
            self.position_offset.target() * mirror,
            self.look_at_offset.target() * mirror,
        );
    }

    /// Orbit rotation from the accumulated yaw and pitch.
    pub fn orbit_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw_deg.to_radians())
            * Quat::from_rotation_x(self.pitch_deg.to_radians())
    }

    /// Follow `target` for one frame and return the camera transform.
    pub fn update(&mut self, target: Vec3, dt: f32) -> Transform {
        if self.config.offset_rate > 0.0 {
            self.position_offset.advance(dt);
            self.look_at_offset.advance(dt);
        } else {
            self.position_offset.snap_to(self.position_offset.target());
            self.look_at_offset.snap_to(self.look_at_offset.target());
        }

        let orbit = self.orbit_rotation();
        let position = target + orbit * self.position_offset.current();
        let look_at = target + orbit * self.look_at_offset.current();
        let forward = (look_at - position).normalize_or(orbit * WORLD_FORWARD);

        self.transform = Transform::new(position, look_rotation(forward, orbit));
        self.transform
    }

    /// Transform from the last `update`.
    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn rotation(&self) -> Quat {
        self.transform.rotation
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }
}

/// Rotation whose -Z axis points along `forward` with Y as up.
///
/// Falls back to `orbit` for right/up when `forward` is vertical.
fn look_rotation(forward: Vec3, orbit: Quat) -> Quat {
    let right = forward
        .cross(WORLD_UP)
        .try_normalize()
        .unwrap_or(orbit * Vec3::X);
    let up = right.cross(forward);
    Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize()
}
