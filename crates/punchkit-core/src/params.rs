//! Machine parameters and generation configuration
//!
//! [`MachineParameters`] describes one tube job on one machine and is
//! immutable for the duration of a generation run. [`GenerationConfig`] holds
//! the algorithm constants (stitching allowance, seed, jitter center, density
//! divisors) and [`KinematicLimits`] the acceleration model used for time
//! prediction. All three are plain values passed explicitly at call time.

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Coded pause that tells the operator to cut the fabric
pub const CUT_PAUSE_CODE: u32 = 110;

/// Machine and product parameters for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineParameters {
    /// Tube length along the mandrel axis (mm)
    pub tube_length: f64,
    /// Mandrel (inner) diameter (mm)
    pub inner_diameter: f64,
    /// Target outer diameter (mm)
    pub outer_diameter: f64,
    /// Fabric thickness added by one wrap (mm)
    pub fabric_thickness: f64,
    /// Target circumferential distance between punches (mm)
    pub punch_step: f64,
    /// Axial distance between needles in a row (mm)
    pub needle_step_x: f64,
    /// Distance between needle rows, in angular steps
    pub needle_row_spacing: u32,
    /// Number of needle rows on the punch head
    pub needle_rows: u32,
    /// Axial reach of the punch head (mm)
    pub head_length: f64,
    /// Needle penetration depth (mm)
    pub punch_depth: f64,
    /// Clearance between the needles and the fabric before a punch (mm)
    pub punch_offset: f64,
    /// Travel of the support shoe during a punch (mm)
    pub support_depth: f64,
    /// Machine zero of the punch (Y) axis (mm)
    pub zero_offset_y: f64,
    /// Machine zero of the support (Z) axis (mm)
    pub zero_offset_z: f64,
    /// Feed rate for approach moves (mm/min)
    pub idling_speed: f64,
    /// Feed rate for punch and retract moves (mm/min)
    pub move_speed: f64,
    /// Feed rate for mandrel rotation (deg/min)
    pub rotate_speed: f64,
    /// Upper bound of the axial jitter (mm)
    pub jitter_bound: f64,
    /// Volumetric density class (kg/m³), mapped to a divisor by the config
    pub volumetric_density: u32,
    /// Axial sub-steps covering one needle spacing
    pub substep_count: u32,
    /// Axial sub-steps punched during one revolution
    pub substeps_per_revolution: u32,
}

impl Default for MachineParameters {
    fn default() -> Self {
        Self {
            tube_length: 528.0,
            inner_diameter: 60.0,
            outer_diameter: 70.0,
            fabric_thickness: 1.0,
            punch_step: 1.0,
            needle_step_x: 8.0,
            needle_row_spacing: 8,
            needle_rows: 1,
            head_length: 264.0,
            punch_depth: 14.0,
            punch_offset: 10.0,
            support_depth: 5.0,
            zero_offset_y: 100.0,
            zero_offset_z: 100.0,
            idling_speed: 6000.0,
            move_speed: 1200.0,
            rotate_speed: 2000.0,
            jitter_bound: 0.25,
            volumetric_density: 25,
            substep_count: 8,
            substeps_per_revolution: 2,
        }
    }
}

impl MachineParameters {
    /// Whether the punch head carries more than one needle row
    pub fn is_multi_row(&self) -> bool {
        self.needle_rows > 1
    }

    /// Circumferential band covered by all needle rows, in angular steps
    ///
    /// Saturates at `u32::MAX`; [`Self::check_arithmetic`] rejects heads
    /// whose span does not fit.
    pub fn circumferential_head_span(&self) -> u32 {
        self.checked_head_span().unwrap_or(u32::MAX)
    }

    /// Circumferential head span, or `None` if it overflows
    pub fn checked_head_span(&self) -> Option<u32> {
        self.needle_rows.checked_mul(self.needle_row_spacing)
    }

    /// Granularity that every per-layer angular step count must be a multiple of
    ///
    /// A single-row head only needs an even count so the herringbone offset
    /// alternates cleanly around the circle.
    pub fn effective_head_offset(&self) -> u32 {
        if self.is_multi_row() {
            self.circumferential_head_span()
        } else {
            2
        }
    }

    /// Number of axial head placements needed to cover the tube
    pub fn zone_count(&self) -> u32 {
        (self.tube_length / self.head_length).ceil() as u32
    }

    /// Check the arithmetic preconditions of the geometry solver
    ///
    /// This is not range validation (see the settings crate for that); it
    /// only rejects values that would divide by zero or produce NaN/Inf.
    pub fn check_arithmetic(&self) -> ConfigResult<()> {
        let positive = [
            ("fabric_thickness", self.fabric_thickness),
            ("punch_step", self.punch_step),
            ("needle_step_x", self.needle_step_x),
            ("head_length", self.head_length),
            ("tube_length", self.tube_length),
            ("inner_diameter", self.inner_diameter),
            ("idling_speed", self.idling_speed),
            ("move_speed", self.move_speed),
            ("rotate_speed", self.rotate_speed),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invalid(
                    field,
                    format!("must be a positive number (got {})", value),
                ));
            }
        }

        if !self.outer_diameter.is_finite() || self.outer_diameter < self.inner_diameter {
            return Err(ConfigError::invalid(
                "outer_diameter",
                format!(
                    "must be >= inner diameter {} (got {})",
                    self.inner_diameter, self.outer_diameter
                ),
            ));
        }

        if self.needle_rows == 0 {
            return Err(ConfigError::invalid("needle_rows", "must be at least 1"));
        }
        if self.is_multi_row() && self.needle_row_spacing == 0 {
            return Err(ConfigError::invalid(
                "needle_row_spacing",
                "must be at least 1 with more than one needle row",
            ));
        }
        if self.checked_head_span().is_none() {
            return Err(ConfigError::invalid(
                "needle_row_spacing",
                format!(
                    "{} rows x {} steps overflows the angular step count",
                    self.needle_rows, self.needle_row_spacing
                ),
            ));
        }

        if !self.jitter_bound.is_finite() || self.jitter_bound < 0.0 {
            return Err(ConfigError::invalid(
                "jitter_bound",
                format!("must be >= 0 (got {})", self.jitter_bound),
            ));
        }

        Ok(())
    }

    /// Check that the sub-step settings agree with the density divisor
    ///
    /// The section count can be read from the divisor or from
    /// `substep_count / substeps_per_revolution`; both must agree, and the
    /// punches per zone used to size the jitter sequence must equal the
    /// sub-steps actually punched.
    pub fn check_layout(&self, density_divisor: u32) -> ConfigResult<()> {
        let per_revolution = self.substeps_per_revolution;
        if self.substep_count == 0 {
            return Err(ConfigError::inconsistent(
                "substep_count",
                "must be at least 1",
            ));
        }
        if per_revolution == 0 {
            return Err(ConfigError::inconsistent(
                "substeps_per_revolution",
                "must be at least 1",
            ));
        }
        if self.substep_count % per_revolution != 0 {
            return Err(ConfigError::inconsistent(
                "substeps_per_revolution",
                format!(
                    "{} does not divide substep_count {}",
                    per_revolution, self.substep_count
                ),
            ));
        }

        let section_count = self.substep_count / per_revolution;
        if section_count != density_divisor {
            return Err(ConfigError::inconsistent(
                "substep_count",
                format!(
                    "substep_count / substeps_per_revolution = {} but density {} needs {} sections",
                    section_count, self.volumetric_density, density_divisor
                ),
            ));
        }

        let punches_in_zone = (self.needle_step_x / density_divisor as f64).round() as u32;
        if punches_in_zone != per_revolution {
            return Err(ConfigError::inconsistent(
                "substeps_per_revolution",
                format!(
                    "needle spacing {} over {} sections gives {} punches per zone, not {}",
                    self.needle_step_x, density_divisor, punches_in_zone, per_revolution
                ),
            ));
        }

        Ok(())
    }
}

/// Mapping from a volumetric density class to its density divisor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DensityClass {
    /// Volumetric density (kg/m³)
    pub density: u32,
    /// Revolutions needed to cover one axial needle spacing
    pub divisor: u32,
}

/// Algorithm constants for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Revolutions appended after the build pass for virtual stitching
    pub extra_revolutions: u32,
    /// Seed of the jitter generator
    pub random_seed: u64,
    /// Center of the jitter interval
    pub jitter_center: f64,
    /// Code of the pause inserted between build and stitching passes
    pub cut_pause_code: u32,
    /// Known density classes
    pub density_classes: Vec<DensityClass>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            extra_revolutions: 20,
            random_seed: 5,
            jitter_center: 0.0,
            cut_pause_code: CUT_PAUSE_CODE,
            density_classes: vec![
                DensityClass {
                    density: 15,
                    divisor: 8,
                },
                DensityClass {
                    density: 25,
                    divisor: 4,
                },
                DensityClass {
                    density: 45,
                    divisor: 2,
                },
            ],
        }
    }
}

impl GenerationConfig {
    /// Look up the density divisor for a volumetric density class
    pub fn density_divisor(&self, density: u32) -> ConfigResult<u32> {
        match self.density_classes.iter().find(|c| c.density == density) {
            Some(class) if class.divisor > 0 => Ok(class.divisor),
            Some(_) => Err(ConfigError::invalid(
                "density_classes",
                format!("divisor for density {} must be > 0", density),
            )),
            None => Err(ConfigError::UnknownDensityClass {
                value: density,
                known: self
                    .density_classes
                    .iter()
                    .map(|c| c.density.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            }),
        }
    }
}

/// Acceleration model of the machine axes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicLimits {
    /// Acceleration of the linear axes (mm/s²)
    pub linear_acceleration: f64,
    /// Acceleration of the rotary axis (deg/s²)
    pub angular_acceleration: f64,
    /// Coded pause that splits a program into part 1 and part 2
    pub cut_marker_code: u32,
}

impl Default for KinematicLimits {
    fn default() -> Self {
        Self {
            linear_acceleration: 300.0,
            angular_acceleration: 300.0,
            cut_marker_code: CUT_PAUSE_CODE,
        }
    }
}
