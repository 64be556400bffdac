//! Error types for the settings crate.

use crate::validator::ValidationFailure;
use std::io;
use thiserror::Error;

/// Errors that can occur while loading, saving or checking a job config.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML deserialization error.
    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    /// TOML serialization error.
    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    /// The file extension is neither `.json` nor `.toml`.
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),

    /// A setting outside the machine parameters is unusable.
    #[error("Invalid setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },

    /// A machine parameter failed range validation.
    #[error("Invalid parameter {0}")]
    Validation(#[from] ValidationFailure),
}

impl SettingsError {
    /// Name of the offending field, when the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidSetting { key, .. } => Some(key),
            Self::Validation(failure) => Some(&failure.field),
            _ => None,
        }
    }
}

/// Result type for settings operations.
pub type Result<T> = std::result::Result<T, SettingsError>;
