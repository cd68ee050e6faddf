//! Config Module
//!
//! Centralized configuration for the rig, loadable from JSON.
//!
//! ```rust,ignore
//! use footfall_engine::config::RigConfig;
//!
//! let config = RigConfig::load("rig.json")?;
//! ```

pub mod rig_config;

use std::path::Path;

use tracing::{info, warn};

use crate::error::ConfigError;

pub use rig_config::{CameraConfig, ElevationConfig, FootIkConfig, LocomotionConfig, RigConfig};

impl RigConfig {
    /// Parse and validate a config from JSON text. Missing fields keep their defaults.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: RigConfig = serde_json::from_str(text)?;
        if let Err(err) = config.validate() {
            warn!(%err, "rejected rig config");
            return Err(err);
        }
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&text)?;
        info!(path = %path.display(), "loaded rig config");
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RigConfig::from_json_str(r#"{ "foot_ik": { "foot_height_correction": 0.05 } }"#)
            .expect("partial config parses");
        assert_eq!(config.foot_ik.foot_height_correction, 0.05);
        assert_eq!(config.foot_ik.foot_raycast_max_distance, 1.0);
        assert_eq!(config.elevation, ElevationConfig::default());
    }

    #[test]
    fn test_layer_mask_is_plain_bits() {
        let config = RigConfig::from_json_str(r#"{ "foot_ik": { "ground_layer_mask": 5 } }"#)
            .expect("mask parses");
        assert!(config.foot_ik.ground_layer_mask.contains(0));
        assert!(!config.foot_ik.ground_layer_mask.contains(1));
        assert!(config.foot_ik.ground_layer_mask.contains(2));
    }

    #[test]
    fn test_invalid_value_rejected() {
        let result = RigConfig::from_json_str(r#"{ "locomotion": { "movement_rate": -2.0 } }"#);
        assert!(matches!(result, Err(ConfigError::Invalid { field: "movement_rate", .. })));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let result = RigConfig::from_json_str("{ foot_ik: ");
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = RigConfig::load("/definitely/not/here/rig.json");
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_json_round_trip_preserves_config() {
        let mut config = RigConfig::default();
        config.camera.offset_rate = 0.0;
        let text = config.to_json_string().expect("serializes");
        assert_eq!(RigConfig::from_json_str(&text).expect("parses"), config);
    }
}
