//! Job configuration
//!
//! A job config bundles everything one generation run needs: the machine
//! parameters, the generation constants, the kinematic model used for time
//! prediction and the validation limits. It is stored as JSON or TOML,
//! chosen by file extension, and validated on every load and save.

use crate::error::{Result, SettingsError};
use crate::validator::{ParameterValidator, ValidationLimits};
use punchkit_core::{GenerationConfig, KinematicLimits, MachineParameters};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Storage format of a job config file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        if path.extension().is_some_and(|ext| ext == "json") {
            Ok(Self::Json)
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            Ok(Self::Toml)
        } else {
            Err(SettingsError::UnsupportedFormat(format!(
                "{} (config file must be .json or .toml)",
                path.display()
            )))
        }
    }
}

/// Everything needed to generate and time one tube
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub machine: MachineParameters,
    pub generation: GenerationConfig,
    pub kinematics: KinematicLimits,
    pub limits: ValidationLimits,
}

impl JobConfig {
    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        info!("Loaded job config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)?;
        info!("Saved job config to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        ParameterValidator::new(self.limits.clone()).validate(&self.machine)?;

        let divisor = self
            .generation
            .density_divisor(self.machine.volumetric_density)
            .map_err(|e| SettingsError::InvalidSetting {
                key: "generation.density_classes".to_string(),
                reason: e.to_string(),
            })?;

        self.machine
            .check_layout(divisor)
            .map_err(|e| SettingsError::InvalidSetting {
                key: format!("machine.{}", e.field()),
                reason: e.to_string(),
            })?;

        // The predictor splits part 1 and part 2 at this pause
        if self.kinematics.cut_marker_code != self.generation.cut_pause_code {
            return Err(SettingsError::InvalidSetting {
                key: "kinematics.cut_marker_code".to_string(),
                reason: format!(
                    "must match generation.cut_pause_code {} (got {})",
                    self.generation.cut_pause_code, self.kinematics.cut_marker_code
                ),
            });
        }

        for (key, value) in [
            ("kinematics.linear_acceleration", self.kinematics.linear_acceleration),
            ("kinematics.angular_acceleration", self.kinematics.angular_acceleration),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(SettingsError::InvalidSetting {
                    key: key.to_string(),
                    reason: format!("must be > 0 (got {})", value),
                });
            }
        }

        if !self.generation.jitter_center.is_finite() {
            return Err(SettingsError::InvalidSetting {
                key: "generation.jitter_center".to_string(),
                reason: "must be a finite number".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(JobConfig::default().validate().is_ok());
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("job.json")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a/b/job.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert!(matches!(
            ConfigFormat::from_path(Path::new("job.yaml")),
            Err(SettingsError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_zero_acceleration_rejected() {
        let mut config = JobConfig::default();
        config.kinematics.linear_acceleration = 0.0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("kinematics.linear_acceleration"));
    }

    #[test]
    fn test_density_without_divisor_rejected() {
        let mut config = JobConfig::default();
        config.limits.allowed_densities.push(30);
        config.machine.volumetric_density = 30;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("generation.density_classes"));
    }

    #[test]
    fn test_cut_marker_must_match_cut_pause() {
        let mut config = JobConfig::default();
        config.generation.cut_pause_code = 0;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("kinematics.cut_marker_code"));

        config.kinematics.cut_marker_code = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_layout_mismatch_rejected() {
        let mut config = JobConfig::default();
        config.machine.volumetric_density = 45;
        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("machine.substep_count"));

        config.machine.substep_count = 8;
        config.machine.substeps_per_revolution = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: JobConfig = toml::from_str(
            r#"
            [machine]
            tube_length = 264.0
            needle_rows = 2

            [kinematics]
            linear_acceleration = 250.0
            "#,
        )
        .unwrap();
        assert_eq!(config.machine.tube_length, 264.0);
        assert_eq!(config.machine.needle_rows, 2);
        assert_eq!(config.machine.inner_diameter, 60.0);
        assert_eq!(config.kinematics.linear_acceleration, 250.0);
        assert_eq!(config.kinematics.angular_acceleration, 300.0);
        assert_eq!(config.generation.extra_revolutions, 20);
    }
}
