//! Animation Module
//!
//! Smoothing primitives shared by the foot IK, elevation, locomotion and camera
//! components.
//!
//! # Components
//!
//! - [`DampedApproach`] - Scalar distance-proportional approach with snap-to-target
//! - [`DampedVector2`] / [`DampedVector3`] - Per-axis composition of the scalar approach
//! - [`FixedStepClock`] - Frame-time to fixed-tick accumulator for the physics phase

pub mod damped;
pub mod schedule;

pub use damped::{DampedApproach, DampedVector2, DampedVector3, SETTLE_EPSILON};
pub use schedule::FixedStepClock;
