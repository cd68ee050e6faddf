//! Player Module
//!
//! Procedural layer on top of the character's animation.
//!
//! # Components
//!
//! - [`FootIkEngine`] - Two-foot IK driver: ground probing in the physics phase,
//!   goal and weight writes in the pose phase
//!   - [`FootPlacement`] - Per-foot `Airborne`/`Grounded` state machine with
//!     height correction, slope alignment and locomotion suppression
//! - [`ElevationController`] - Capsule height and center smoothing on stairs and slopes
//! - [`LocomotionController`] - Camera-relative walk parameters for the blend tree

pub mod elevation;
pub mod foot_ik;
pub mod foot_placement;
pub mod locomotion;

pub use elevation::{ElevationController, ElevationOutput};
pub use foot_ik::{FootBone, FootIkEngine, IkAnimator};
pub use foot_placement::{
    FootPhase, FootPlacement, FootSide, FootState, FootTickInput, align_up_to_normal,
};
pub use locomotion::{
    LocomotionController, LocomotionParams, MOVEMENT_EPSILON, facing_after_root_motion,
};
