//! Foot Placement
//!
//! Per-foot ground correction. Every physics tick a foot probes the ground under
//! its animated IK position and lands in one of two phases:
//!
//! - `Grounded`: a surface was found. The IK goal moves to the hit point plus the
//!   foot height correction and the foot's up axis is tilted onto the ground
//!   normal. Weight target 1.
//! - `Airborne`: nothing below within range. The goal falls back to the animated
//!   pose. Weight target 0.
//!
//! The phase flips instantly but the IK weight always travels through a
//! [`DampedApproach`], so feet never pop on or off the ground.
//!
//! # Second-pass probe
//!
//! A hit that lies far above or below the body root usually means the ray slipped
//! through thin or noisy geometry. Such a hit is not trusted; the foot re-probes
//! once from an origin pulled toward the body and only accepts a hit within range.
//!
//! # Locomotion suppression
//!
//! While the character moves, a correction farther than
//! `min_distance_to_suppress_correction` from the animated foot belongs to a foot
//! in mid-swing. That tick keeps the animated pose and holds the current weight.

use glam::{Quat, Vec3};
use tracing::debug;

use crate::animation::DampedApproach;
use crate::config::FootIkConfig;
use crate::physics::{GroundContact, GroundProbe, ProbeRay, Raycaster, WORLD_UP};

/// Which foot a placement drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FootSide {
    Left,
    Right,
}

impl FootSide {
    pub const BOTH: [FootSide; 2] = [FootSide::Left, FootSide::Right];
}

/// Ground phase of a foot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FootPhase {
    /// No valid contact this tick, weight heading to 0
    #[default]
    Airborne,
    /// Valid contact this tick, weight heading to 1
    Grounded,
}

impl FootPhase {
    /// Weight the IK blend approaches in this phase.
    pub fn target_weight(&self) -> f32 {
        match self {
            FootPhase::Airborne => 0.0,
            FootPhase::Grounded => 1.0,
        }
    }
}

/// Pose data of one foot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootState {
    /// Animated IK goal position, as sampled from the animation pose
    pub ik_position: Vec3,
    /// Animated IK goal rotation
    pub ik_rotation: Quat,
    /// Goal position after ground correction
    pub corrected_position: Vec3,
    /// Goal rotation after ground correction
    pub corrected_rotation: Quat,
    /// IK blend weight, always within [0, 1]
    pub weight: DampedApproach,
}

impl FootState {
    fn new(weight_rate: f32) -> Self {
        Self {
            ik_position: Vec3::ZERO,
            ik_rotation: Quat::IDENTITY,
            corrected_position: Vec3::ZERO,
            corrected_rotation: Quat::IDENTITY,
            weight: DampedApproach::new(weight_rate),
        }
    }
}

/// Everything a foot needs from the rest of the rig for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FootTickInput {
    pub animated_position: Vec3,
    pub animated_rotation: Quat,
    pub body_position: Vec3,
    pub body_rotation: Quat,
    /// Smoothed ground normal under the body
    pub body_normal: Vec3,
    pub is_moving: bool,
    pub dt: f32,
}

/// Ground-correction state machine for one foot.
#[derive(Debug, Clone)]
pub struct FootPlacement {
    side: FootSide,
    probe: GroundProbe,
    height_correction: f32,
    suppress_distance: f32,
    reprobe_distance: f32,
    reprobe_blend: f32,
    slope_normal_blend: f32,
    state: FootState,
    phase: FootPhase,
    contact: Option<GroundContact>,
    suppressed: bool,
}

impl FootPlacement {
    pub fn new(side: FootSide, config: &FootIkConfig) -> Self {
        let probe = GroundProbe::new(config.foot_raycast_max_distance, config.ground_layer_mask)
            .with_vertical_offset(config.probe_vertical_offset)
            .with_displacement(config.foot_raycast_displacement);
        Self {
            side,
            probe,
            height_correction: config.foot_height_correction,
            suppress_distance: config.min_distance_to_suppress_correction,
            reprobe_distance: config.reprobe_distance,
            reprobe_blend: config.reprobe_blend,
            slope_normal_blend: config.slope_normal_blend,
            state: FootState::new(config.correction_acceleration_rate),
            phase: FootPhase::Airborne,
            contact: None,
            suppressed: false,
        }
    }

    pub fn side(&self) -> FootSide {
        self.side
    }

    pub fn phase(&self) -> FootPhase {
        self.phase
    }

    pub fn state(&self) -> &FootState {
        &self.state
    }

    /// Current IK blend weight.
    pub fn weight(&self) -> f32 {
        self.state.weight.current()
    }

    /// Ground contact accepted on the last tick, if any.
    pub fn contact(&self) -> Option<GroundContact> {
        self.contact
    }

    /// Whether the last tick skipped its correction because the foot was mid-swing.
    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    pub fn probe(&self) -> &GroundProbe {
        &self.probe
    }

    /// The ray this foot casts from its last sampled position.
    pub fn probe_ray(&self, body_rotation: Quat) -> ProbeRay {
        self.probe.ray(self.state.ik_position, body_rotation)
    }

    /// Drop back to `Airborne` with zero weight.
    pub fn reset(&mut self) {
        self.state.weight.snap_to(0.0);
        self.state.corrected_position = self.state.ik_position;
        self.state.corrected_rotation = self.state.ik_rotation;
        self.phase = FootPhase::Airborne;
        self.contact = None;
        self.suppressed = false;
    }

    /// Run one physics tick and return the resulting phase.
    pub fn tick<R: Raycaster + ?Sized>(&mut self, world: &R, input: &FootTickInput) -> FootPhase {
        self.state.ik_position = input.animated_position;
        self.state.ik_rotation = input.animated_rotation;
        self.contact = self.find_contact(world, input);

        let phase = match self.contact {
            Some(contact) => {
                let corrected = contact.point + WORLD_UP * self.height_correction;
                let swing = corrected.distance(input.animated_position);
                if input.is_moving && swing > self.suppress_distance {
                    if !self.suppressed {
                        debug!(side = ?self.side, swing, "foot correction suppressed mid-swing");
                    }
                    self.suppressed = true;
                    self.fall_back_to_animated();
                    let held = self.state.weight.current();
                    self.state.weight.set_target(held);
                } else {
                    self.suppressed = false;
                    let normal = self.alignment_normal(contact.normal, input.body_normal);
                    self.state.corrected_position = corrected;
                    self.state.corrected_rotation =
                        align_up_to_normal(input.animated_rotation, normal);
                    self.state.weight.set_target(FootPhase::Grounded.target_weight());
                }
                FootPhase::Grounded
            }
            None => {
                self.suppressed = false;
                self.fall_back_to_animated();
                self.state.weight.set_target(FootPhase::Airborne.target_weight());
                FootPhase::Airborne
            }
        };

        if phase != self.phase {
            debug!(side = ?self.side, from = ?self.phase, to = ?phase, "foot phase changed");
            self.phase = phase;
        }
        self.state.weight.advance(input.dt);
        self.phase
    }

    fn fall_back_to_animated(&mut self) {
        self.state.corrected_position = self.state.ik_position;
        self.state.corrected_rotation = self.state.ik_rotation;
    }

    /// Probe under the foot, with one re-probe when the first hit is implausible.
    fn find_contact<R: Raycaster + ?Sized>(
        &self,
        world: &R,
        input: &FootTickInput,
    ) -> Option<GroundContact> {
        let first = self
            .probe
            .probe(world, input.animated_position, input.body_rotation)?;
        if self.is_plausible(first, input.body_position) {
            return Some(first);
        }

        let pulled = input
            .animated_position
            .lerp(input.body_position, self.reprobe_blend);
        let origin = Vec3::new(pulled.x, input.animated_position.y, pulled.z);
        debug!(
            side = ?self.side,
            hit_y = first.point.y,
            body_y = input.body_position.y,
            "implausible foot hit, re-probing"
        );

        let second = self.probe.probe(world, origin, input.body_rotation)?;
        if !self.is_plausible(second, input.body_position) {
            return None;
        }
        // Keep the foot's own footprint; only the height comes from the second ray
        Some(GroundContact {
            point: Vec3::new(
                input.animated_position.x,
                second.point.y,
                input.animated_position.z,
            ),
            normal: second.normal,
        })
    }

    fn is_plausible(&self, contact: GroundContact, body_position: Vec3) -> bool {
        (contact.point.y - body_position.y).abs() <= self.reprobe_distance
    }

    fn alignment_normal(&self, foot_normal: Vec3, body_normal: Vec3) -> Vec3 {
        foot_normal
            .lerp(body_normal, self.slope_normal_blend)
            .normalize_or(foot_normal)
    }
}

/// Tilt `rotation` so its up axis follows `normal`, keeping its heading.
///
/// The tilt is the shortest arc from world up to `normal`, applied on top of the
/// animated rotation rather than rebuilding the orientation from scratch.
pub fn align_up_to_normal(rotation: Quat, normal: Vec3) -> Quat {
    let Some(normal) = normal.try_normalize() else {
        return rotation;
    };
    (Quat::from_rotation_arc(WORLD_UP, normal) * rotation).normalize()
}
