//! Collision World
//!
//! A small set of static colliders that answers [`Raycaster`] queries. Hosts with
//! their own physics engine implement [`Raycaster`] directly; this world backs the
//! headless demo and the test suite.
//!
//! # Ray-AABB Intersection
//!
//! Boxes use the slab method: entry and exit times are computed per axis and the
//! ray hits when the latest entry comes before the earliest exit.
//!
//! # Example
//!
//! ```ignore
//! use footfall_engine::physics::{Collider, CollisionWorld, LayerMask, Raycaster};
//! use glam::Vec3;
//!
//! let mut world = CollisionWorld::new();
//! world.add(Collider::plane(Vec3::ZERO, Vec3::Y), 0);
//! world.add(Collider::aabb(Vec3::new(1.0, 0.0, -1.0), Vec3::new(2.0, 0.2, 1.0)), 0);
//!
//! let hit = world.raycast(Vec3::new(1.5, 1.0, 0.0), Vec3::NEG_Y, 2.0, LayerMask::ALL);
//! ```

use glam::{Quat, Vec2, Vec3};
use tracing::debug;

use super::ground_probe::{LayerMask, RaycastHit, Raycaster};

/// Rays closer than this to parallel with a plane are treated as misses.
const PARALLEL_EPSILON: f32 = 1e-6;

/// Static collision shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Collider {
    /// Infinite plane through `point` facing `normal`
    Plane { point: Vec3, normal: Vec3 },
    /// Axis-aligned box
    Box { min: Vec3, max: Vec3 },
    /// Bounded tilted rectangle: local XZ extents around `center`, up = `rotation * Y`
    Slope {
        center: Vec3,
        rotation: Quat,
        half_extents: Vec2,
    },
}

impl Collider {
    pub fn plane(point: Vec3, normal: Vec3) -> Self {
        Collider::Plane {
            point,
            normal: normal.normalize_or(Vec3::Y),
        }
    }

    pub fn aabb(min: Vec3, max: Vec3) -> Self {
        Collider::Box {
            min: min.min(max),
            max: min.max(max),
        }
    }

    /// Ramp rising along local +Z by `angle` radians.
    pub fn slope(center: Vec3, yaw: f32, angle: f32, half_extents: Vec2) -> Self {
        Collider::Slope {
            center,
            rotation: Quat::from_rotation_y(yaw) * Quat::from_rotation_x(-angle),
            half_extents,
        }
    }

    /// Distance and normal of the first surface the ray enters, if any.
    ///
    /// `direction` must be normalized. Rays starting inside a box do not hit it.
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<(f32, Vec3)> {
        match *self {
            Collider::Plane { point, normal } => {
                ray_plane_intersect(origin, direction, point, normal).map(|t| (t, normal))
            }
            Collider::Box { min, max } => {
                if origin.cmpge(min).all() && origin.cmple(max).all() {
                    return None;
                }
                let t = ray_aabb_intersect(origin, direction, min, max)?;
                Some((t, aabb_surface_normal(origin + direction * t, min, max)))
            }
            Collider::Slope {
                center,
                rotation,
                half_extents,
            } => {
                let normal = rotation * Vec3::Y;
                let t = ray_plane_intersect(origin, direction, center, normal)?;
                let local = rotation.inverse() * (origin + direction * t - center);
                if local.x.abs() > half_extents.x || local.z.abs() > half_extents.y {
                    return None;
                }
                Some((t, normal))
            }
        }
    }
}

/// Collider tagged with its collision layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayeredCollider {
    pub collider: Collider,
    pub layer: u8,
}

/// Flat list of static colliders; nearest hit wins.
#[derive(Debug, Clone, Default)]
pub struct CollisionWorld {
    colliders: Vec<LayeredCollider>,
}

impl CollisionWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider on `layer` and return its index.
    pub fn add(&mut self, collider: Collider, layer: u8) -> usize {
        self.colliders.push(LayeredCollider { collider, layer });
        debug!(index = self.colliders.len() - 1, layer, ?collider, "collider added");
        self.colliders.len() - 1
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayeredCollider> {
        self.colliders.iter()
    }
}

impl Raycaster for CollisionWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        mask: LayerMask,
    ) -> Option<RaycastHit> {
        let direction = direction.try_normalize()?;
        self.colliders
            .iter()
            .filter(|entry| mask.contains(entry.layer))
            .filter_map(|entry| {
                let (t, normal) = entry.collider.intersect(origin, direction)?;
                (t <= max_distance).then_some(RaycastHit {
                    point: origin + direction * t,
                    normal,
                    distance: t,
                    layer: entry.layer,
                })
            })
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Ray-plane intersection.
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the plane (t >= 0)
/// * `None` - Ray is parallel to the plane or the plane is behind the origin
pub fn ray_plane_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_point: Vec3,
    plane_normal: Vec3,
) -> Option<f32> {
    let denom = plane_normal.dot(ray_dir);
    if denom.abs() < PARALLEL_EPSILON {
        return None;
    }
    let t = (plane_point - ray_origin).dot(plane_normal) / denom;
    (t >= 0.0).then_some(t)
}

/// Performs ray-AABB (Axis-Aligned Bounding Box) intersection test using the slab method.
///
/// The ray enters and exits each pair of axis-aligned planes; if the latest entry
/// comes before the earliest exit and the exit is ahead of the origin, it hits.
///
/// # Arguments
///
/// * `ray_origin` - Starting point of the ray
/// * `ray_dir` - Direction of the ray (must be normalized)
/// * `aabb_min` - Minimum corner of the AABB
/// * `aabb_max` - Maximum corner of the AABB
///
/// # Returns
///
/// * `Some(t)` - Distance along the ray to the intersection point (t >= 0)
/// * `None` - No intersection or intersection is behind the ray origin
pub fn ray_aabb_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    aabb_min: Vec3,
    aabb_max: Vec3,
) -> Option<f32> {
    // Near-zero components get a huge inverse so the slab spans all of time
    let inv = |d: f32| if d.abs() > 1e-10 { 1.0 / d } else { f32::MAX * d.signum() };
    let inv_dir = Vec3::new(inv(ray_dir.x), inv(ray_dir.y), inv(ray_dir.z));

    let t1 = (aabb_min - ray_origin) * inv_dir;
    let t2 = (aabb_max - ray_origin) * inv_dir;

    let t_min = t1.min(t2).max_element();
    let t_max = t1.max(t2).min_element();

    if t_max >= t_min && t_max >= 0.0 {
        if t_min >= 0.0 {
            Some(t_min)
        } else {
            // Ray starts inside the AABB
            Some(t_max)
        }
    } else {
        None
    }
}

/// Outward normal of the AABB face closest to `point`.
pub fn aabb_surface_normal(point: Vec3, aabb_min: Vec3, aabb_max: Vec3) -> Vec3 {
    let center = (aabb_min + aabb_max) * 0.5;
    let half_extents = (aabb_max - aabb_min) * 0.5;
    let normalized = (point - center) / half_extents;
    let abs_normalized = normalized.abs();

    if abs_normalized.x >= abs_normalized.y && abs_normalized.x >= abs_normalized.z {
        Vec3::new(normalized.x.signum(), 0.0, 0.0)
    } else if abs_normalized.y >= abs_normalized.x && abs_normalized.y >= abs_normalized.z {
        Vec3::new(0.0, normalized.y.signum(), 0.0)
    } else {
        Vec3::new(0.0, 0.0, normalized.z.signum())
    }
}
