//! Rig Configuration
//!
//! Tunables for every component of the character rig. `Default` returns the
//! values the rig was authored with; JSON files only need the fields they change.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::physics::LayerMask;

/// Foot IK placement settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FootIkConfig {
    /// Maximum length of each foot ray (meters)
    pub foot_raycast_max_distance: f32,
    /// Lift from the hit point to the IK goal, so the sole rests on the surface (meters)
    pub foot_height_correction: f32,
    /// Acceleration rate of the per-foot IK weight (1/s)
    pub correction_acceleration_rate: f32,
    /// Layers that count as walkable ground
    pub ground_layer_mask: LayerMask,
    /// While moving, corrections farther than this from the animated foot are skipped (meters)
    pub min_distance_to_suppress_correction: f32,
    /// Body-local offset added to each foot ray origin
    pub foot_raycast_displacement: Vec3,
    /// Upward lift of the foot ray origin before casting (meters)
    pub probe_vertical_offset: f32,
    /// Vertical gap between a hit and the body root that triggers a second probe (meters)
    pub reprobe_distance: f32,
    /// How far the second probe origin moves from the foot toward the body (0..1)
    pub reprobe_blend: f32,
    /// Acceleration rate of the smoothed body ground normal (1/s)
    pub body_normal_rate: f32,
    /// Share of the body ground normal in each foot's alignment normal (0..1)
    pub slope_normal_blend: f32,
}

impl Default for FootIkConfig {
    fn default() -> Self {
        Self {
            foot_raycast_max_distance: 1.0,
            foot_height_correction: 0.1,
            correction_acceleration_rate: 5.0,
            ground_layer_mask: LayerMask::ALL,
            min_distance_to_suppress_correction: 0.35,
            foot_raycast_displacement: Vec3::ZERO,
            probe_vertical_offset: 0.25,
            reprobe_distance: 0.6,
            reprobe_blend: 0.5,
            body_normal_rate: 4.0,
            slope_normal_blend: 0.5,
        }
    }
}

impl FootIkConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("foot_raycast_max_distance", self.foot_raycast_max_distance)?;
        finite("foot_height_correction", self.foot_height_correction)?;
        non_negative("correction_acceleration_rate", self.correction_acceleration_rate)?;
        non_negative(
            "min_distance_to_suppress_correction",
            self.min_distance_to_suppress_correction,
        )?;
        finite_vec("foot_raycast_displacement", self.foot_raycast_displacement)?;
        non_negative("probe_vertical_offset", self.probe_vertical_offset)?;
        non_negative("reprobe_distance", self.reprobe_distance)?;
        unit_interval("reprobe_blend", self.reprobe_blend)?;
        non_negative("body_normal_rate", self.body_normal_rate)?;
        unit_interval("slope_normal_blend", self.slope_normal_blend)?;
        if self.ground_layer_mask.is_empty() {
            return Err(ConfigError::Invalid {
                field: "ground_layer_mask",
                reason: "mask selects no layers, feet would never find ground".to_string(),
            });
        }
        Ok(())
    }
}

/// Capsule elevation settings (stairs and slopes).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElevationConfig {
    /// Trigger layers that mark stairs
    pub stairs_layer: LayerMask,
    /// Layers the two body rays can hit
    pub raycast_layer_mask: LayerMask,
    /// Maximum length of each body ray (meters)
    pub raycast_max_distance: f32,
    /// Body-local origin offset of the first (front) ray
    pub first_ray_displacement: Vec3,
    /// Body-local origin offset of the second (back) ray
    pub second_ray_displacement: Vec3,
    /// Capsule height on flat ground (meters)
    pub flat_ground_height: f32,
    /// Capsule center on flat ground, body-local
    pub flat_ground_center: Vec3,
    /// Acceleration rate of capsule height and center (1/s)
    pub capsule_adjustment_rate: f32,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            stairs_layer: LayerMask::NONE,
            raycast_layer_mask: LayerMask::ALL,
            raycast_max_distance: 1.0,
            first_ray_displacement: Vec3::new(0.0, 0.5, -0.3),
            second_ray_displacement: Vec3::new(0.0, 0.5, 0.3),
            flat_ground_height: 1.8,
            flat_ground_center: Vec3::new(0.0, 0.9, 0.0),
            capsule_adjustment_rate: 4.0,
        }
    }
}

impl ElevationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("raycast_max_distance", self.raycast_max_distance)?;
        finite_vec("first_ray_displacement", self.first_ray_displacement)?;
        finite_vec("second_ray_displacement", self.second_ray_displacement)?;
        non_negative("flat_ground_height", self.flat_ground_height)?;
        finite_vec("flat_ground_center", self.flat_ground_center)?;
        non_negative("capsule_adjustment_rate", self.capsule_adjustment_rate)
    }
}

/// Walk smoothing settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Acceleration rate of the input movement vector (1/s)
    pub movement_rate: f32,
    /// Acceleration rate of the facing direction (1/s)
    pub direction_rate: f32,
    /// Time constant of the damped `direction` parameter (seconds)
    pub direction_damp_time: f32,
    /// Speed multiplier while the run input is held
    pub run_multiplier: f32,
    /// Root-motion speed above which the facing is steered toward the input (m/s)
    pub steer_speed_threshold: f32,
    /// How strongly the facing is steered per unit of `direction`
    pub steer_strength: f32,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            movement_rate: 5.0,
            direction_rate: 2.5,
            direction_damp_time: 0.05,
            run_multiplier: 2.0,
            steer_speed_threshold: 0.5,
            steer_strength: 0.05,
        }
    }
}

impl LocomotionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("movement_rate", self.movement_rate)?;
        non_negative("direction_rate", self.direction_rate)?;
        non_negative("direction_damp_time", self.direction_damp_time)?;
        non_negative("run_multiplier", self.run_multiplier)?;
        non_negative("steer_speed_threshold", self.steer_speed_threshold)?;
        finite("steer_strength", self.steer_strength)
    }
}

/// Third-person shoulder camera settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Camera offset from the follow target, in orbit space (+Z is behind)
    pub position_displacement: Vec3,
    /// Look-at offset from the follow target, in orbit space
    pub look_at_displacement: Vec3,
    /// Degrees of rotation per unit of look input
    pub look_sensitivity: f32,
    /// Pitch limits in degrees (min, max)
    pub pitch_limits_deg: (f32, f32),
    /// Acceleration rate of the shoulder offset (1/s); 0 snaps
    pub offset_rate: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position_displacement: Vec3::new(0.45, 1.7, 2.6),
            look_at_displacement: Vec3::new(0.45, 1.5, 0.0),
            look_sensitivity: 1.0,
            pitch_limits_deg: (-70.0, 70.0),
            offset_rate: 10.0,
        }
    }
}

impl CameraConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite_vec("position_displacement", self.position_displacement)?;
        finite_vec("look_at_displacement", self.look_at_displacement)?;
        finite("look_sensitivity", self.look_sensitivity)?;
        non_negative("offset_rate", self.offset_rate)?;
        let (min, max) = self.pitch_limits_deg;
        finite("pitch_limits_deg", min)?;
        finite("pitch_limits_deg", max)?;
        if min > max || min < -90.0 || max > 90.0 {
            return Err(ConfigError::Invalid {
                field: "pitch_limits_deg",
                reason: format!("expected -90 <= min <= max <= 90, got ({min}, {max})"),
            });
        }
        Ok(())
    }
}

/// Complete rig configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    pub foot_ik: FootIkConfig,
    pub elevation: ElevationConfig,
    pub locomotion: LocomotionConfig,
    pub camera: CameraConfig,
}

impl RigConfig {
    /// Validate every section, reporting the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.foot_ik.validate()?;
        self.elevation.validate()?;
        self.locomotion.validate()?;
        self.camera.validate()
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn finite_vec(field: &'static str, value: Vec3) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be >= 0, got {value}"),
        });
    }
    Ok(())
}

fn unit_interval(field: &'static str, value: f32) -> Result<(), ConfigError> {
    finite(field, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be within [0, 1], got {value}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(RigConfig::default().validate().is_ok());
    }

    #[test]
    fn test_foot_ik_defaults() {
        let config = FootIkConfig::default();
        assert_eq!(config.foot_raycast_max_distance, 1.0);
        assert_eq!(config.foot_height_correction, 0.1);
        assert_eq!(config.correction_acceleration_rate, 5.0);
    }

    #[test]
    fn test_negative_distance_rejected() {
        let config = FootIkConfig {
            foot_raycast_max_distance: -1.0,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => {
                assert_eq!(field, "foot_raycast_max_distance")
            }
            other => panic!("expected Invalid, got {other:?}"),
        }
    }

    #[test]
    fn test_blend_out_of_range_rejected() {
        let config = FootIkConfig {
            slope_normal_blend: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_ground_mask_rejected() {
        let config = FootIkConfig {
            ground_layer_mask: LayerMask::NONE,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let config = ElevationConfig {
            flat_ground_center: Vec3::new(0.0, f32::NAN, 0.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_pitch_limits_rejected() {
        let config = CameraConfig {
            pitch_limits_deg: (30.0, -30.0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
