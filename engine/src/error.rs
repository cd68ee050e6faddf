//! Error types
//!
//! Only setup can fail. Once a rig is configured every per-tick outcome,
//! including "no ground under this foot", is a valid state rather than an error.

use std::path::PathBuf;

use thiserror::Error;

use crate::player::FootBone;

/// Errors from loading or validating a [`crate::config::RigConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field holds a value the rig cannot run with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// The JSON text did not match the config schema.
    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised when configuring a [`crate::player::FootIkEngine`].
#[derive(Debug, Error)]
pub enum FootIkError {
    /// The animator has no transform for a bone the engine requires.
    #[error("animator is missing required bone {0:?}")]
    MissingBone(FootBone),

    /// The foot IK settings failed validation.
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
}
