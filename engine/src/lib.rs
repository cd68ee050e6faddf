//! Footfall Engine Library
//!
//! Procedural animation layer for a third-person character: foot IK that plants
//! feet on uneven ground, capsule elevation for stairs and slopes, camera-relative
//! locomotion parameters and a shoulder camera.
//!
//! The engine never owns a physics world or an animator. Hosts plug in through
//! two traits:
//!
//! - [`physics::Raycaster`] - downward ray queries against level geometry
//! - [`player::IkAnimator`] - animated foot goals in, corrected IK goals out
//!
//! # Modules
//!
//! - [`animation`] - Damped approach smoothing and the fixed-step clock
//! - [`physics`] - Ground probes, layer masks and a static collider world
//! - [`player`] - Foot IK, elevation and locomotion controllers
//! - [`camera`] - Over-the-shoulder follow camera
//! - [`input`] - Channel-based input dispatch
//! - [`config`] - JSON-loadable rig configuration
//!
//! # Example
//!
//! ```ignore
//! use footfall_engine::animation::FixedStepClock;
//! use footfall_engine::config::RigConfig;
//! use footfall_engine::player::FootIkEngine;
//!
//! let config = RigConfig::load("rig.json")?;
//! let mut feet = FootIkEngine::configure(animator, config.foot_ik.clone())?;
//! let mut clock = FixedStepClock::new(1.0 / 50.0, 5);
//!
//! // Every rendered frame:
//! for _ in 0..clock.advance(frame_dt) {
//!     feet.tick(&world, clock.step());
//! }
//! feet.apply_pose();
//! ```

pub mod animation;
pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod physics;
pub mod player;

// Re-export the types most hosts touch
pub use animation::{DampedApproach, DampedVector2, DampedVector3, FixedStepClock};
pub use config::RigConfig;
pub use error::{ConfigError, FootIkError};
pub use physics::{GroundProbe, LayerMask, RaycastHit, Raycaster, Transform};
pub use player::{FootIkEngine, FootPhase, FootSide, IkAnimator};
