//! Punchkit Settings Crate
//!
//! Job configuration files (JSON/TOML) and machine parameter validation.

pub mod config;
pub mod error;
pub mod validator;

pub use config::{ConfigFormat, JobConfig};
pub use error::{Result, SettingsError};
pub use validator::{ParameterValidator, ValidationFailure, ValidationLimits};
