//! Math types shared by the physics and rig modules.
//!
//! glam types are used directly; this module fixes the world axis conventions
//! (Y up, -Z forward) and adds the rigid [`Transform`] the rig passes around.

pub use glam::{Quat, Vec2, Vec3};

/// World up axis.
pub const WORLD_UP: Vec3 = Vec3::Y;

/// World down axis, the direction every ground probe casts along.
pub const WORLD_DOWN: Vec3 = Vec3::NEG_Y;

/// Facing direction of an unrotated body or camera.
pub const WORLD_FORWARD: Vec3 = Vec3::NEG_Z;

/// Position and rotation in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Facing direction (-Z in local space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * WORLD_FORWARD
    }

    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}
