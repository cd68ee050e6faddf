//! Camera Module
//!
//! Third-person camera that frames the character over the shoulder.
//! Window-system agnostic: it only computes a transform from input and a target.

pub mod shoulder;

pub use shoulder::ShoulderCamera;
