//! Foot IK Engine
//!
//! Owns both [`FootPlacement`]s and the animator they correct. Work is split into
//! two phases that must not be mixed:
//!
//! - **Physics phase** ([`FootIkEngine::tick`]): fixed-rate. Probes the ground,
//!   smooths the body ground normal, runs both foot state machines.
//! - **Pose phase** ([`FootIkEngine::apply_pose`]): once per rendered frame, after
//!   the animated pose exists. Writes the settled goals and weights to the IK
//!   resolver. No probing, no state changes.
//!
//! # Usage
//!
//! ```rust,ignore
//! use footfall_engine::player::FootIkEngine;
//!
//! let mut feet = FootIkEngine::configure(animator, config.foot_ik.clone())?;
//!
//! // Physics callback:
//! feet.set_moving(locomotion.params().is_moving);
//! feet.tick(&world, fixed_dt);
//!
//! // Animation IK callback:
//! feet.apply_pose();
//! ```

use glam::{Quat, Vec3};
use tracing::{debug, info, warn};

use super::foot_placement::{FootPhase, FootPlacement, FootSide, FootTickInput};
use crate::animation::DampedVector3;
use crate::config::FootIkConfig;
use crate::error::FootIkError;
use crate::physics::{GroundProbe, ProbeRay, Raycaster, Transform, WORLD_UP};

/// Skeleton bones the engine looks up at configure time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootBone {
    LeftFoot,
    RightFoot,
    LeftToes,
    RightToes,
}

impl FootBone {
    /// Bones without which foot IK cannot run.
    pub const REQUIRED: [FootBone; 2] = [FootBone::LeftFoot, FootBone::RightFoot];

    pub fn foot(side: FootSide) -> Self {
        match side {
            FootSide::Left => FootBone::LeftFoot,
            FootSide::Right => FootBone::RightFoot,
        }
    }
}

/// The host animator: read side for the animated pose, write side for IK goals.
pub trait IkAnimator {
    /// Root transform of the character (feet level).
    fn body_transform(&self) -> Transform;

    /// World transform of a skeleton bone, `None` if the rig lacks it.
    fn bone(&self, bone: FootBone) -> Option<Transform>;

    /// IK goal of a foot as produced by the current animation, before correction.
    fn animated_goal(&self, side: FootSide) -> Transform;

    fn set_ik_position(&mut self, side: FootSide, position: Vec3);
    fn set_ik_position_weight(&mut self, side: FootSide, weight: f32);
    fn set_ik_rotation(&mut self, side: FootSide, rotation: Quat);
    fn set_ik_rotation_weight(&mut self, side: FootSide, weight: f32);
}

/// Foot IK driver for a two-footed character.
#[derive(Debug)]
pub struct FootIkEngine<A: IkAnimator> {
    animator: A,
    config: FootIkConfig,
    left: FootPlacement,
    right: FootPlacement,
    body_probe: GroundProbe,
    body_normal: DampedVector3,
    is_moving: bool,
    enabled: bool,
}

impl<A: IkAnimator> FootIkEngine<A> {
    /// Take ownership of `animator` and set up both feet.
    ///
    /// Fails when the config is invalid or the animator lacks a foot bone.
    pub fn configure(animator: A, config: FootIkConfig) -> Result<Self, FootIkError> {
        config
            .validate()
            .inspect_err(|err| warn!(%err, "foot IK configure rejected"))?;
        for bone in FootBone::REQUIRED {
            if animator.bone(bone).is_none() {
                warn!(?bone, "foot IK configure rejected: bone missing");
                return Err(FootIkError::MissingBone(bone));
            }
        }
        for bone in [FootBone::LeftToes, FootBone::RightToes] {
            if animator.bone(bone).is_none() {
                debug!(?bone, "optional bone not present");
            }
        }

        let body_probe = GroundProbe::new(config.foot_raycast_max_distance, config.ground_layer_mask)
            .with_vertical_offset(config.probe_vertical_offset);
        info!(
            max_distance = config.foot_raycast_max_distance,
            height_correction = config.foot_height_correction,
            rate = config.correction_acceleration_rate,
            "foot IK configured"
        );

        Ok(Self {
            left: FootPlacement::new(FootSide::Left, &config),
            right: FootPlacement::new(FootSide::Right, &config),
            body_probe,
            body_normal: DampedVector3::with_value(config.body_normal_rate, WORLD_UP),
            is_moving: false,
            enabled: true,
            animator,
            config,
        })
    }

    pub fn config(&self) -> &FootIkConfig {
        &self.config
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    /// Give the animator back, ending the engine.
    pub fn into_animator(self) -> A {
        self.animator
    }

    pub fn foot(&self, side: FootSide) -> &FootPlacement {
        match side {
            FootSide::Left => &self.left,
            FootSide::Right => &self.right,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    /// Report whether the character is in locomotion (moving or pivoting).
    pub fn set_moving(&mut self, is_moving: bool) {
        self.is_moving = is_moving;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable foot IK. Re-enabling starts both feet from zero weight.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled && !self.enabled {
            self.reset();
        }
        self.enabled = enabled;
    }

    /// Reset both feet to `Airborne` and the body normal to world up.
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
        self.body_normal.snap_to(WORLD_UP);
    }

    /// Smoothed ground normal under the body.
    pub fn body_normal(&self) -> Vec3 {
        self.body_normal.current().normalize_or(WORLD_UP)
    }

    /// Latest accepted ground points, (left, right).
    pub fn contact_points(&self) -> (Option<Vec3>, Option<Vec3>) {
        (
            self.left.contact().map(|c| c.point),
            self.right.contact().map(|c| c.point),
        )
    }

    /// Probe rays of both feet for debug drawing, (left, right).
    pub fn debug_rays(&self) -> (ProbeRay, ProbeRay) {
        let rotation = self.animator.body_transform().rotation;
        (self.left.probe_ray(rotation), self.right.probe_ray(rotation))
    }

    /// Physics phase: probe and advance both feet by `dt` seconds.
    pub fn tick<R: Raycaster + ?Sized>(&mut self, world: &R, dt: f32) {
        if !self.enabled {
            return;
        }

        let body = self.animator.body_transform();
        let ground_normal = self
            .body_probe
            .probe(world, body.position, body.rotation)
            .map_or(WORLD_UP, |contact| contact.normal);
        self.body_normal.set_target(ground_normal);
        self.body_normal.advance(dt);
        let body_normal = self.body_normal();

        for side in FootSide::BOTH {
            let goal = self.animator.animated_goal(side);
            let input = FootTickInput {
                animated_position: goal.position,
                animated_rotation: goal.rotation,
                body_position: body.position,
                body_rotation: body.rotation,
                body_normal,
                is_moving: self.is_moving,
                dt,
            };
            match side {
                FootSide::Left => self.left.tick(world, &input),
                FootSide::Right => self.right.tick(world, &input),
            };
        }
    }

    /// Pose phase: write both feet's settled goals and weights to the animator.
    pub fn apply_pose(&mut self) {
        if !self.enabled {
            return;
        }

        for side in FootSide::BOTH {
            let foot = match side {
                FootSide::Left => &self.left,
                FootSide::Right => &self.right,
            };
            let state = foot.state();
            let weight = state.weight.current();
            self.animator.set_ik_position(side, state.corrected_position);
            self.animator.set_ik_position_weight(side, weight);
            self.animator.set_ik_rotation(side, state.corrected_rotation);
            self.animator.set_ik_rotation_weight(side, weight);
        }
    }

    /// Phases of both feet, (left, right).
    pub fn phases(&self) -> (FootPhase, FootPhase) {
        (self.left.phase(), self.right.phase())
    }
}
