//! Capsule Elevation
//!
//! Adjusts the character capsule on stairs and slopes so the body sinks between
//! feet planted at different heights instead of hovering on the higher one.
//!
//! # Measurement
//!
//! Two body rays (front and back, body-local displacements) sample the ground.
//! When both hit, the height difference between them is compared with the height
//! difference between the planted feet:
//!
//! ```text
//! displacement = |(hits_delta * 0.5 - feet_delta).y| * 0.25
//! height       = flat_ground_height - displacement
//! center       = flat_ground_center + up * displacement
//! ```
//!
//! Height and center are smoothed with damped approaches, so steps never snap the
//! capsule. When either ray misses the capsule relaxes to its flat-ground shape.
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut elevation = ElevationController::new(config.elevation.clone());
//!
//! // Each physics tick, after foot IK:
//! let (left, right) = feet.contact_points();
//! elevation.set_foot_hits(left, right);
//! let capsule = elevation.tick(&world, body, dt);
//! ```

use glam::Vec3;

use crate::animation::{DampedApproach, DampedVector3};
use crate::config::ElevationConfig;
use crate::physics::{GroundProbe, ProbeRay, Raycaster, Transform, WORLD_UP};

/// Share of the front/back hit delta compared against the feet delta.
const HIT_DELTA_SCALE: f32 = 0.5;

/// Share of the height mismatch that goes into the capsule displacement.
const DISPLACEMENT_SCALE: f32 = 0.25;

/// Capsule shape and stairs state for the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationOutput {
    /// Smoothed capsule height in meters
    pub height: f32,
    /// Smoothed capsule center, body-local
    pub center: Vec3,
    /// Vertical direction of the terrain along the body (positive = climbing)
    pub direction_y: f32,
    /// Whether the body is inside a stairs trigger
    pub in_stairs: bool,
}

/// Smooths capsule height and center against uneven ground.
#[derive(Debug, Clone)]
pub struct ElevationController {
    config: ElevationConfig,
    first_probe: GroundProbe,
    second_probe: GroundProbe,
    height: DampedApproach,
    center: DampedVector3,
    direction_y: f32,
    in_stairs: bool,
    left_foot_hit: Option<Vec3>,
    right_foot_hit: Option<Vec3>,
    first_hit: Option<Vec3>,
    second_hit: Option<Vec3>,
}

impl ElevationController {
    /// Create a controller resting at the flat-ground capsule shape.
    pub fn new(config: ElevationConfig) -> Self {
        let probe = GroundProbe::new(config.raycast_max_distance, config.raycast_layer_mask);
        Self {
            first_probe: probe.with_displacement(config.first_ray_displacement),
            second_probe: probe.with_displacement(config.second_ray_displacement),
            height: DampedApproach::with_value(
                config.capsule_adjustment_rate,
                config.flat_ground_height,
            ),
            center: DampedVector3::with_value(
                config.capsule_adjustment_rate,
                config.flat_ground_center,
            ),
            direction_y: 0.0,
            in_stairs: false,
            left_foot_hit: None,
            right_foot_hit: None,
            first_hit: None,
            second_hit: None,
            config,
        }
    }

    pub fn config(&self) -> &ElevationConfig {
        &self.config
    }

    /// Record this tick's planted foot positions (from foot IK contacts).
    ///
    /// A foot without contact counts as the origin in the height comparison.
    pub fn set_foot_hits(&mut self, left: Option<Vec3>, right: Option<Vec3>) {
        self.left_foot_hit = left;
        self.right_foot_hit = right;
    }

    /// Host trigger callback: the body entered a collider on `layer`.
    pub fn on_trigger_enter(&mut self, layer: u8) {
        if self.config.stairs_layer.contains(layer) {
            self.in_stairs = true;
        }
    }

    /// Host trigger callback: the body left a collider on `layer`.
    pub fn on_trigger_exit(&mut self, layer: u8) {
        if self.config.stairs_layer.contains(layer) {
            self.in_stairs = false;
        }
    }

    /// Both body ray hits from the last tick, when both landed.
    pub fn body_hits(&self) -> Option<(Vec3, Vec3)> {
        self.first_hit.zip(self.second_hit)
    }

    /// The two body rays for debug drawing.
    pub fn debug_rays(&self, body: Transform) -> (ProbeRay, ProbeRay) {
        (
            self.first_probe.ray(body.position, body.rotation),
            self.second_probe.ray(body.position, body.rotation),
        )
    }

    /// Physics phase: re-measure the ground and advance the capsule smoothing.
    pub fn tick<R: Raycaster + ?Sized>(
        &mut self,
        world: &R,
        body: Transform,
        dt: f32,
    ) -> ElevationOutput {
        let first = self.first_probe.probe(world, body.position, body.rotation);
        let second = self.second_probe.probe(world, body.position, body.rotation);

        match first.zip(second) {
            Some((first, second)) => {
                self.first_hit = Some(first.point);
                self.second_hit = Some(second.point);

                let hits_delta = second.point - first.point;
                self.direction_y = (body.rotation * hits_delta).y;

                let feet_delta = self.left_foot_hit.unwrap_or(Vec3::ZERO)
                    - self.right_foot_hit.unwrap_or(Vec3::ZERO);
                let mismatch = hits_delta * HIT_DELTA_SCALE - feet_delta;
                self.set_capsule_targets(mismatch.y.abs() * DISPLACEMENT_SCALE);
            }
            None => {
                self.first_hit = None;
                self.second_hit = None;
                self.direction_y = 0.0;
                self.set_capsule_targets(0.0);
            }
        }

        self.height.advance(dt);
        self.center.advance(dt);
        self.output()
    }

    /// Current capsule state without advancing.
    pub fn output(&self) -> ElevationOutput {
        ElevationOutput {
            height: self.height.current(),
            center: self.center.current(),
            direction_y: self.direction_y,
            in_stairs: self.in_stairs,
        }
    }

    /// Snap back to the flat-ground capsule (teleport, respawn).
    pub fn reset(&mut self) {
        self.height.snap_to(self.config.flat_ground_height);
        self.center.snap_to(self.config.flat_ground_center);
        self.direction_y = 0.0;
        self.in_stairs = false;
        self.left_foot_hit = None;
        self.right_foot_hit = None;
        self.first_hit = None;
        self.second_hit = None;
    }

    fn set_capsule_targets(&mut self, displacement: f32) {
        self.height
            .set_target(self.config.flat_ground_height - displacement);
        self.center
            .set_target(self.config.flat_ground_center + WORLD_UP * displacement);
    }
}
