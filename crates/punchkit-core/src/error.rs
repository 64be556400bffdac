//! Error handling for punchkit
//!
//! Provides the error types shared by every layer of the toolpath pipeline:
//! - Configuration errors (invalid or inconsistent machine parameters)
//! - Command errors (malformed motion commands)
//! - Pattern errors (generation failures, including precondition violations)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Configuration error type
///
/// Raised before generation starts when a parameter makes the requested
/// toolpath impossible to compute. Every variant names the offending field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A parameter value is unusable (non-positive, NaN, out of order)
    #[error("Invalid parameter '{field}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// The volumetric density class has no divisor in the generation config
    #[error("Unknown volumetric density class {value} (known classes: {known})")]
    UnknownDensityClass {
        /// The density class that was requested.
        value: u32,
        /// Comma separated list of configured classes.
        known: String,
    },

    /// Parameters are individually valid but disagree with each other
    #[error("Inconsistent layout for '{field}': {reason}")]
    InconsistentLayout {
        /// The parameter that breaks the layout.
        field: String,
        /// The relation that does not hold.
        reason: String,
    },

    /// A layer resolves to zero circumference or zero steps
    #[error("Degenerate geometry at revolution {revolution}: {reason}")]
    DegenerateGeometry {
        /// Absolute revolution index of the layer.
        revolution: u32,
        /// What degenerated.
        reason: String,
    },
}

impl ConfigError {
    /// Create an invalid parameter error
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an inconsistent layout error
    pub fn inconsistent(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InconsistentLayout {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the parameter that caused the error
    pub fn field(&self) -> &str {
        match self {
            Self::InvalidParameter { field, .. } | Self::InconsistentLayout { field, .. } => field,
            Self::UnknownDensityClass { .. } => "volumetric_density",
            Self::DegenerateGeometry { .. } => "inner_diameter",
        }
    }
}

/// Motion command construction error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    /// A linear move must target at least one of X, Y, Z, A
    #[error("Linear move has no axis target")]
    NoAxisTarget,

    /// A linear move feed rate must be finite and non-negative
    #[error("Invalid feed rate: {feed_rate}")]
    InvalidFeedRate {
        /// The rejected feed rate.
        feed_rate: f64,
    },

    /// A timed pause must have a finite, non-negative duration
    #[error("Invalid pause duration: {seconds}s")]
    InvalidPause {
        /// The rejected duration in seconds.
        seconds: f64,
    },
}

/// Pattern generation error
///
/// `JitterExhausted` is a precondition violation: the geometry solver and the
/// pattern generator disagreed about the punch count. It is never retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PatternError {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Command error
    #[error(transparent)]
    Command(#[from] CommandError),

    /// More punches were generated than jitter offsets were precomputed
    #[error("Jitter sequence exhausted: punch #{requested} requested, {available} available")]
    JitterExhausted {
        /// Zero-based index of the punch that had no offset.
        requested: usize,
        /// Length of the precomputed sequence.
        available: usize,
    },
}

impl PatternError {
    /// Check if this error is a precondition violation rather than bad input
    pub fn is_precondition_violation(&self) -> bool {
        matches!(self, Self::JitterExhausted { .. } | Self::Command(_))
    }
}

/// Result type for configuration checks
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type for pattern generation
pub type PatternResult<T> = std::result::Result<T, PatternError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::invalid("fabric_thickness", "must be > 0 (got 0)");
        assert_eq!(
            err.to_string(),
            "Invalid parameter 'fabric_thickness': must be > 0 (got 0)"
        );
        assert_eq!(err.field(), "fabric_thickness");

        let err = ConfigError::UnknownDensityClass {
            value: 30,
            known: "15, 25, 45".to_string(),
        };
        assert_eq!(err.field(), "volumetric_density");
        assert!(err.to_string().contains("30"));
    }

    #[test]
    fn test_pattern_error_conversion() {
        let err: PatternError = ConfigError::inconsistent("substep_count", "odd").into();
        assert!(matches!(err, PatternError::Config(_)));
        assert!(!err.is_precondition_violation());

        let err = PatternError::JitterExhausted {
            requested: 10,
            available: 10,
        };
        assert!(err.is_precondition_violation());
        assert_eq!(
            err.to_string(),
            "Jitter sequence exhausted: punch #10 requested, 10 available"
        );
    }
}
