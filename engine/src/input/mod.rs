//! Input Module
//!
//! Platform-agnostic input routing. The host translates its window or gamepad
//! events into [`InputEvent`]s and publishes them; rig components drain the
//! channels they subscribed to.
//!
//! # Example
//!
//! ```rust,ignore
//! use footfall_engine::input::{InputChannel, InputDispatcher, InputEvent};
//!
//! let mut input = InputDispatcher::new();
//! let walker = input.subscribe(&[InputChannel::Movement]);
//!
//! input.publish(InputEvent::Move(glam::Vec2::Y));
//! for event in input.drain(walker) {
//!     locomotion.handle(&event);
//! }
//! ```

pub mod dispatch;

pub use dispatch::{
    axes_from_keys, InputChannel, InputDispatcher, InputEvent, ListenerId, MAX_QUEUED_EVENTS,
};
