//! Physics module
//!
//! Read-only ground queries for the character rig. Nothing here simulates
//! bodies; the rig only asks "what surface is below this point".
//!
//! # Unit System
//!
//! **1 unit = 1 meter**, Y up.
//!
//! # Submodules
//!
//! - [`types`] - glam re-exports, axis conventions and [`Transform`]
//! - [`ground_probe`] - Host raycast trait, layer masks and the downward [`GroundProbe`]
//! - [`collision`] - Static collider world implementing [`Raycaster`] for the demo and tests

pub mod collision;
pub mod ground_probe;
pub mod types;

pub use collision::{
    Collider, CollisionWorld, LayeredCollider, aabb_surface_normal, ray_aabb_intersect,
    ray_plane_intersect,
};
pub use ground_probe::{GroundContact, GroundProbe, LayerMask, ProbeRay, RaycastHit, Raycaster};
pub use types::{Quat, Transform, Vec2, Vec3, WORLD_DOWN, WORLD_FORWARD, WORLD_UP};
