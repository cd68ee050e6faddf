//! Damped Approach
//!
//! Distance-proportional smoothing used for every continuously varying value in
//! the rig: foot IK weights, the body ground normal, capsule height and center,
//! locomotion vectors and the camera shoulder offset.
//!
//! # Algorithm
//!
//! Each advance moves `current` toward `target` by a step proportional to the
//! remaining gap:
//!
//! ```text
//! delta = target - current
//! step  = sign(delta) * |delta| * rate * dt
//! if |step| >= |delta|  -> current = target
//! else                  -> current += step
//! ```
//!
//! Large gaps close fast and the value settles asymptotically. The tail is cut
//! by snapping once the remaining gap falls under [`SETTLE_EPSILON`] or once a
//! step no longer changes the `f32` value, so a held target is always reached
//! exactly in a finite number of steps.
//!
//! The primitive is cadence-agnostic: `advance` takes whatever delta time the
//! caller runs at (fixed physics step or variable frame time).
//!
//! # Usage
//!
//! ```rust,ignore
//! use footfall_engine::animation::DampedApproach;
//!
//! let mut weight = DampedApproach::new(5.0);
//! weight.set_target(1.0);
//! // Each physics tick:
//! let w = weight.advance(1.0 / 50.0);
//! ```

use glam::{Vec2, Vec3};
use static_assertions::assert_impl_all;

/// Remaining gap below which the value snaps onto its target.
pub const SETTLE_EPSILON: f32 = 1e-5;

/// Scalar value that approaches its target with distance-proportional speed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DampedApproach {
    /// Fraction of the remaining gap closed per second
    rate: f32,
    /// Value being approached
    target: f32,
    /// Smoothed value (only `advance` and `snap_to` change it)
    current: f32,
}

assert_impl_all!(DampedApproach: Copy, Send, Sync);

impl DampedApproach {
    /// Create a zero-valued approach with the given acceleration rate.
    pub fn new(rate: f32) -> Self {
        Self {
            rate,
            target: 0.0,
            current: 0.0,
        }
    }

    /// Create an approach already resting at `value`.
    pub fn with_value(rate: f32, value: f32) -> Self {
        Self {
            rate,
            target: value,
            current: value,
        }
    }

    /// Set the acceleration rate.
    pub fn configure(&mut self, rate: f32) {
        self.rate = rate;
    }

    /// Get the acceleration rate.
    #[inline]
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Set the value to approach.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Get the value being approached.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Get the smoothed value.
    #[inline]
    pub fn current(&self) -> f32 {
        self.current
    }

    /// Whether `current` has reached `target` exactly.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.current == self.target
    }

    /// Jump both target and current to `value` (teleport, respawn).
    pub fn snap_to(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Advance the approach by `dt` seconds and return the new current value.
    ///
    /// `dt` must be non-negative and finite. Debug builds assert this; release
    /// builds treat a bad `dt` as zero.
    pub fn advance(&mut self, dt: f32) -> f32 {
        debug_assert!(
            dt >= 0.0 && dt.is_finite(),
            "DampedApproach::advance requires a finite, non-negative dt (got {dt})"
        );
        if !(dt > 0.0 && dt.is_finite()) {
            return self.current;
        }

        self.current = approach_step(self.current, self.target, self.rate, dt);
        self.current
    }
}

/// One damped step from `current` toward `target`.
fn approach_step(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let delta = target - current;
    if delta == 0.0 {
        return target;
    }

    let step = delta.abs() * rate * dt * delta.signum();
    if step.abs() >= delta.abs() {
        return target;
    }

    let next = current + step;
    if next == current && step != 0.0 {
        // Below f32 resolution: no further progress possible
        return target;
    }
    if (target - next).abs() < SETTLE_EPSILON && step != 0.0 {
        return target;
    }
    next
}

/// Two independent damped axes sharing one acceleration rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DampedVector2 {
    axes: [DampedApproach; 2],
}

assert_impl_all!(DampedVector2: Copy, Send, Sync);

impl DampedVector2 {
    /// Create a zero-valued vector with the given acceleration rate.
    pub fn new(rate: f32) -> Self {
        Self {
            axes: [DampedApproach::new(rate); 2],
        }
    }

    /// Create a vector already resting at `value`.
    pub fn with_value(rate: f32, value: Vec2) -> Self {
        Self {
            axes: [
                DampedApproach::with_value(rate, value.x),
                DampedApproach::with_value(rate, value.y),
            ],
        }
    }

    /// Set the acceleration rate on both axes.
    pub fn configure(&mut self, rate: f32) {
        for axis in &mut self.axes {
            axis.configure(rate);
        }
    }

    pub fn rate(&self) -> f32 {
        self.axes[0].rate()
    }

    pub fn set_target(&mut self, target: Vec2) {
        self.axes[0].set_target(target.x);
        self.axes[1].set_target(target.y);
    }

    pub fn target(&self) -> Vec2 {
        Vec2::new(self.axes[0].target(), self.axes[1].target())
    }

    pub fn current(&self) -> Vec2 {
        Vec2::new(self.axes[0].current(), self.axes[1].current())
    }

    /// Borrow a single axis (0 = x, 1 = y). `None` past the last axis.
    pub fn axis(&self, index: usize) -> Option<&DampedApproach> {
        self.axes.get(index)
    }

    pub fn is_settled(&self) -> bool {
        self.axes.iter().all(DampedApproach::is_settled)
    }

    pub fn snap_to(&mut self, value: Vec2) {
        self.axes[0].snap_to(value.x);
        self.axes[1].snap_to(value.y);
    }

    /// Advance each axis independently and return the new current vector.
    pub fn advance(&mut self, dt: f32) -> Vec2 {
        for axis in &mut self.axes {
            axis.advance(dt);
        }
        self.current()
    }
}

/// Three independent damped axes sharing one acceleration rate.
///
/// Axes do not couple: each closes its own gap at its own speed, so the
/// smoothed vector does not travel along a straight line toward the target.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DampedVector3 {
    axes: [DampedApproach; 3],
}

assert_impl_all!(DampedVector3: Copy, Send, Sync);

impl DampedVector3 {
    /// Create a zero-valued vector with the given acceleration rate.
    pub fn new(rate: f32) -> Self {
        Self {
            axes: [DampedApproach::new(rate); 3],
        }
    }

    /// Create a vector already resting at `value`.
    pub fn with_value(rate: f32, value: Vec3) -> Self {
        Self {
            axes: [
                DampedApproach::with_value(rate, value.x),
                DampedApproach::with_value(rate, value.y),
                DampedApproach::with_value(rate, value.z),
            ],
        }
    }

    /// Set the acceleration rate on all three axes.
    pub fn configure(&mut self, rate: f32) {
        for axis in &mut self.axes {
            axis.configure(rate);
        }
    }

    pub fn rate(&self) -> f32 {
        self.axes[0].rate()
    }

    pub fn set_target(&mut self, target: Vec3) {
        self.axes[0].set_target(target.x);
        self.axes[1].set_target(target.y);
        self.axes[2].set_target(target.z);
    }

    pub fn target(&self) -> Vec3 {
        Vec3::new(
            self.axes[0].target(),
            self.axes[1].target(),
            self.axes[2].target(),
        )
    }

    pub fn current(&self) -> Vec3 {
        Vec3::new(
            self.axes[0].current(),
            self.axes[1].current(),
            self.axes[2].current(),
        )
    }

    /// Borrow a single axis (0 = x, 1 = y, 2 = z). `None` past the last axis.
    pub fn axis(&self, index: usize) -> Option<&DampedApproach> {
        self.axes.get(index)
    }

    pub fn is_settled(&self) -> bool {
        self.axes.iter().all(DampedApproach::is_settled)
    }

    pub fn snap_to(&mut self, value: Vec3) {
        self.axes[0].snap_to(value.x);
        self.axes[1].snap_to(value.y);
        self.axes[2].snap_to(value.z);
    }

    /// Advance each axis independently and return the new current vector.
    pub fn advance(&mut self, dt: f32) -> Vec3 {
        for axis in &mut self.axes {
            axis.advance(dt);
        }
        self.current()
    }
}
