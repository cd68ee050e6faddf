//! Ground Probe
//!
//! Downward ray queries used to find the surface under a foot or under the body.
//!
//! The raycast itself belongs to the host environment and is reached through the
//! [`Raycaster`] trait. A [`GroundProbe`] adds the rig-specific framing around it:
//! a body-local displacement, a vertical lift of the ray origin, a maximum
//! distance and a layer filter.
//!
//! A probe that finds nothing returns `None`. That is the normal outcome for a
//! foot hanging over a ledge, not an error.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use super::types::{WORLD_DOWN, WORLD_UP};

/// Bit set of collision layers (bit `n` set = layer `n` included).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Matches every layer.
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    /// Matches nothing.
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask containing exactly the given layers. Layers above 31 are ignored.
    pub fn from_layers(layers: &[u8]) -> Self {
        layers
            .iter()
            .fold(LayerMask::NONE, |mask, &layer| mask.with_layer(layer))
    }

    /// Return a copy of this mask with `layer` added.
    pub fn with_layer(self, layer: u8) -> Self {
        if layer < 32 {
            LayerMask(self.0 | (1 << layer))
        } else {
            self
        }
    }

    /// Whether `layer` is part of this mask.
    pub fn contains(&self, layer: u8) -> bool {
        layer < 32 && self.0 & (1 << layer) != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Result of a host raycast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// World-space hit position
    pub point: Vec3,
    /// Surface normal at the hit (normalized)
    pub normal: Vec3,
    /// Distance from the ray origin to `point`
    pub distance: f32,
    /// Layer of the surface that was hit
    pub layer: u8,
}

/// Host-supplied ray query: nearest surface along `direction` within
/// `max_distance` whose layer is in `mask`.
pub trait Raycaster {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit>;
}

impl<T: Raycaster + ?Sized> Raycaster for &T {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit> {
        (**self).raycast(origin, direction, max_distance, mask)
    }
}

/// Surface found under a probe. Produced fresh on every probe, never cached here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundContact {
    pub point: Vec3,
    pub normal: Vec3,
}

/// The ray a probe casts, exposed for debug observers (gizmo drawing etc).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeRay {
    pub origin: Vec3,
    pub direction: Vec3,
    pub length: f32,
}

impl ProbeRay {
    /// Point at distance `t` along the ray.
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Far end of the ray.
    pub fn end(&self) -> Vec3 {
        self.point_at(self.length)
    }
}

/// Downward probe with an origin lift, body-local displacement and layer filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundProbe {
    /// Lift applied to the ray origin along world up before casting
    pub vertical_offset: f32,
    /// Maximum ray length from the lifted origin
    pub max_distance: f32,
    /// Layers that count as ground
    pub layer_mask: LayerMask,
    /// Body-local offset, rotated by the body rotation and added to the origin
    pub displacement: Vec3,
}

impl Default for GroundProbe {
    fn default() -> Self {
        Self {
            vertical_offset: 0.0,
            max_distance: 1.0,
            layer_mask: LayerMask::ALL,
            displacement: Vec3::ZERO,
        }
    }
}

impl GroundProbe {
    pub fn new(max_distance: f32, layer_mask: LayerMask) -> Self {
        Self {
            max_distance,
            layer_mask,
            ..Default::default()
        }
    }

    pub fn with_vertical_offset(mut self, vertical_offset: f32) -> Self {
        self.vertical_offset = vertical_offset;
        self
    }

    pub fn with_displacement(mut self, displacement: Vec3) -> Self {
        self.displacement = displacement;
        self
    }

    /// The ray this probe would cast from `origin` for a body facing `body_rotation`.
    pub fn ray(&self, origin: Vec3, body_rotation: Quat) -> ProbeRay {
        ProbeRay {
            origin: origin + body_rotation * self.displacement + WORLD_UP * self.vertical_offset,
            direction: WORLD_DOWN,
            length: self.max_distance,
        }
    }

    /// Cast downward and return the nearest ground contact, if any.
    pub fn probe<R: Raycaster + ?Sized>(
        &self,
        world: &R,
        origin: Vec3,
        body_rotation: Quat,
    ) -> Option<GroundContact> {
        if self.max_distance <= 0.0 || self.layer_mask.is_empty() {
            return None;
        }
        let ray = self.ray(origin, body_rotation);
        world
            .raycast(ray.origin, ray.direction, ray.length, self.layer_mask)
            .map(|hit| GroundContact {
                point: hit.point,
                normal: hit.normal.normalize_or(WORLD_UP),
            })
    }
}
