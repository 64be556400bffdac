//! Machine parameter range validation
//!
//! Runs before generation. Dimensional ranges are checked first, discrete
//! values (density class, punch step, needle spacing, counts) second; the
//! first failing check is reported with the field it concerns. Range
//! boundaries tolerate 0.001 of slack.

use punchkit_core::MachineParameters;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use thiserror::Error;

/// A failed validation check
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{field}: {message}")]
pub struct ValidationFailure {
    /// The parameter name.
    pub field: String,
    /// Human readable reason.
    pub message: String,
}

impl ValidationFailure {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Allowed parameter ranges of the machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationLimits {
    pub min_tube_length: f64,
    pub max_tube_length: f64,
    pub min_inner_diameter: f64,
    pub max_inner_diameter: f64,
    pub min_outer_diameter: f64,
    pub max_outer_diameter: f64,
    pub min_head_length: f64,
    pub max_punch_depth: f64,
    pub min_speed: f64,
    pub max_idling_speed: f64,
    pub max_move_speed: f64,
    pub max_rotate_speed: f64,
    pub max_jitter_bound: f64,
    pub allowed_densities: Vec<u32>,
    pub allowed_punch_steps: Vec<f64>,
    pub required_needle_step_x: f64,
    pub max_needle_rows: u32,
    /// Largest distance between needle rows (angular steps)
    pub max_needle_row_spacing: u32,
    /// Slack applied to every range boundary
    pub tolerance: f64,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_tube_length: 10.0,
            max_tube_length: 1200.0,
            min_inner_diameter: 10.0,
            max_inner_diameter: 300.0,
            min_outer_diameter: 10.0,
            max_outer_diameter: 320.0,
            min_head_length: 10.0,
            max_punch_depth: 15.0,
            min_speed: 100.0,
            max_idling_speed: 10000.0,
            max_move_speed: 2500.0,
            max_rotate_speed: 2000.0,
            max_jitter_bound: 0.5,
            allowed_densities: vec![15, 25, 45],
            allowed_punch_steps: vec![1.0, 2.0, 4.0],
            required_needle_step_x: 8.0,
            max_needle_rows: 16,
            max_needle_row_spacing: 64,
            tolerance: 0.001,
        }
    }
}

/// Validator for machine parameters
pub struct ParameterValidator {
    limits: ValidationLimits,
}

type Check = std::result::Result<(), ValidationFailure>;

impl ParameterValidator {
    pub fn new(limits: ValidationLimits) -> Self {
        Self { limits }
    }

    pub fn limits(&self) -> &ValidationLimits {
        &self.limits
    }

    /// Check every parameter, stopping at the first failure
    pub fn validate(&self, params: &MachineParameters) -> Check {
        self.check_dimensions(params)?;
        self.check_discrete_values(params)
    }

    fn check_range(&self, field: &str, value: f64, min: f64, max: f64, unit: &str) -> Check {
        let tol = self.limits.tolerance;
        if !value.is_finite() {
            return Err(ValidationFailure::new(
                field,
                format!("must be a number (got {})", value),
            ));
        }
        if value < min - tol || value > max + tol {
            return Err(ValidationFailure::new(
                field,
                format!(
                    "must be between {} and {} {} (got {})",
                    min, max, unit, value
                ),
            ));
        }
        Ok(())
    }

    fn check_dimensions(&self, p: &MachineParameters) -> Check {
        let l = &self.limits;

        self.check_range("tube_length", p.tube_length, l.min_tube_length, l.max_tube_length, "mm")?;
        self.check_range(
            "inner_diameter",
            p.inner_diameter,
            l.min_inner_diameter,
            l.max_inner_diameter,
            "mm",
        )?;
        self.check_range(
            "outer_diameter",
            p.outer_diameter,
            l.min_outer_diameter,
            l.max_outer_diameter,
            "mm",
        )?;
        if p.inner_diameter > p.outer_diameter + l.tolerance {
            return Err(ValidationFailure::new(
                "inner_diameter",
                format!(
                    "must not exceed the outer diameter {} mm (got {})",
                    p.outer_diameter, p.inner_diameter
                ),
            ));
        }

        if !(p.fabric_thickness.is_finite() && p.fabric_thickness > 0.0) {
            return Err(ValidationFailure::new(
                "fabric_thickness",
                format!("must be greater than 0 mm (got {})", p.fabric_thickness),
            ));
        }

        let max_step = PI * p.inner_diameter;
        if !p.punch_step.is_finite() || p.punch_step > max_step + l.tolerance {
            return Err(ValidationFailure::new(
                "punch_step",
                format!(
                    "must not exceed the mandrel circumference {:.3} mm (got {})",
                    max_step, p.punch_step
                ),
            ));
        }

        if !p.head_length.is_finite() || p.head_length < l.min_head_length - l.tolerance {
            return Err(ValidationFailure::new(
                "head_length",
                format!(
                    "must be at least {} mm (got {})",
                    l.min_head_length, p.head_length
                ),
            ));
        }

        self.check_range("punch_depth", p.punch_depth, 0.0, l.max_punch_depth, "mm")?;
        self.check_range("idling_speed", p.idling_speed, l.min_speed, l.max_idling_speed, "mm/min")?;
        self.check_range("move_speed", p.move_speed, l.min_speed, l.max_move_speed, "mm/min")?;
        self.check_range(
            "rotate_speed",
            p.rotate_speed,
            l.min_speed,
            l.max_rotate_speed,
            "deg/min",
        )?;
        self.check_range("jitter_bound", p.jitter_bound, 0.0, l.max_jitter_bound, "mm")
    }

    fn check_discrete_values(&self, p: &MachineParameters) -> Check {
        let l = &self.limits;

        if !l.allowed_densities.contains(&p.volumetric_density) {
            return Err(ValidationFailure::new(
                "volumetric_density",
                format!(
                    "must be one of {:?} (got {})",
                    l.allowed_densities, p.volumetric_density
                ),
            ));
        }

        if !l
            .allowed_punch_steps
            .iter()
            .any(|step| (step - p.punch_step).abs() <= l.tolerance)
        {
            return Err(ValidationFailure::new(
                "punch_step",
                format!(
                    "must be one of {:?} mm (got {})",
                    l.allowed_punch_steps, p.punch_step
                ),
            ));
        }

        if (p.needle_step_x - l.required_needle_step_x).abs() > l.tolerance {
            return Err(ValidationFailure::new(
                "needle_step_x",
                format!(
                    "must be {} mm for this head (got {})",
                    l.required_needle_step_x, p.needle_step_x
                ),
            ));
        }

        if p.needle_rows == 0 {
            return Err(ValidationFailure::new("needle_rows", "must be at least 1"));
        }
        if p.needle_rows > 1 && p.needle_row_spacing == 0 {
            return Err(ValidationFailure::new(
                "needle_row_spacing",
                "must be at least 1 with more than one needle row",
            ));
        }
        if p.needle_rows > l.max_needle_rows {
            return Err(ValidationFailure::new(
                "needle_rows",
                format!("must be at most {} (got {})", l.max_needle_rows, p.needle_rows),
            ));
        }
        if p.needle_row_spacing > l.max_needle_row_spacing {
            return Err(ValidationFailure::new(
                "needle_row_spacing",
                format!(
                    "must be at most {} steps (got {})",
                    l.max_needle_row_spacing, p.needle_row_spacing
                ),
            ));
        }
        if p.substep_count == 0 {
            return Err(ValidationFailure::new("substep_count", "must be at least 1"));
        }
        if p.substeps_per_revolution == 0 {
            return Err(ValidationFailure::new(
                "substeps_per_revolution",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

impl Default for ParameterValidator {
    fn default() -> Self {
        Self::new(ValidationLimits::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failing_field(params: &MachineParameters) -> String {
        ParameterValidator::default()
            .validate(params)
            .unwrap_err()
            .field
    }

    #[test]
    fn test_reference_parameters_pass() {
        assert!(ParameterValidator::default()
            .validate(&MachineParameters::default())
            .is_ok());
    }

    #[test]
    fn test_tube_length_bounds() {
        let mut params = MachineParameters::default();
        params.tube_length = 1200.0005;
        assert!(ParameterValidator::default().validate(&params).is_ok());

        params.tube_length = 1201.0;
        assert_eq!(failing_field(&params), "tube_length");

        params.tube_length = 5.0;
        assert_eq!(failing_field(&params), "tube_length");
    }

    #[test]
    fn test_diameter_order() {
        let params = MachineParameters {
            inner_diameter: 80.0,
            outer_diameter: 70.0,
            ..Default::default()
        };
        assert_eq!(failing_field(&params), "inner_diameter");
    }

    #[test]
    fn test_dimensional_checks_run_first() {
        // Both the tube length and the density are wrong
        let params = MachineParameters {
            tube_length: 2000.0,
            volumetric_density: 30,
            ..Default::default()
        };
        assert_eq!(failing_field(&params), "tube_length");
    }

    #[test]
    fn test_speed_limits() {
        let params = MachineParameters {
            move_speed: 3000.0,
            ..Default::default()
        };
        let failure = ParameterValidator::default().validate(&params).unwrap_err();
        assert_eq!(failure.field, "move_speed");
        assert!(failure.message.contains("2500"));
    }

    #[test]
    fn test_discrete_values() {
        let params = MachineParameters {
            volumetric_density: 30,
            ..Default::default()
        };
        assert_eq!(failing_field(&params), "volumetric_density");

        let params = MachineParameters {
            punch_step: 3.0,
            ..Default::default()
        };
        assert_eq!(failing_field(&params), "punch_step");

        let params = MachineParameters {
            needle_step_x: 6.0,
            ..Default::default()
        };
        assert_eq!(failing_field(&params), "needle_step_x");

        let params = MachineParameters {
            needle_rows: 0,
            ..Default::default()
        };
        assert_eq!(failing_field(&params), "needle_rows");
    }

    #[test]
    fn test_needle_head_bounds() {
        let params = MachineParameters {
            needle_rows: 65536,
            needle_row_spacing: 65536,
            ..Default::default()
        };
        assert_eq!(failing_field(&params), "needle_rows");

        let params = MachineParameters {
            needle_rows: 2,
            needle_row_spacing: 65,
            ..Default::default()
        };
        assert_eq!(failing_field(&params), "needle_row_spacing");

        let params = MachineParameters {
            needle_rows: 16,
            needle_row_spacing: 64,
            ..Default::default()
        };
        assert!(ParameterValidator::default().validate(&params).is_ok());
    }

    #[test]
    fn test_custom_limits() {
        let limits = ValidationLimits {
            allowed_densities: vec![25, 30],
            ..Default::default()
        };
        let params = MachineParameters {
            volumetric_density: 30,
            ..Default::default()
        };
        assert!(ParameterValidator::new(limits).validate(&params).is_ok());
    }
}
