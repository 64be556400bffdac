//! Geometry solver
//!
//! Pure functions turning the tube dimensions into revolution counts and
//! per-layer angular step counts. Nothing here keeps state.

use punchkit_core::{ConfigError, ConfigResult, GenerationConfig, MachineParameters};
use serde::Serialize;
use std::f64::consts::PI;
use tracing::warn;

/// Relative deviation from the target punch step that is logged as a warning
const STEP_DEVIATION_WARNING: f64 = 0.1;

/// Revolution counts needed to reach the target wall thickness
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RotationPlan {
    /// Unrounded wall buildup in layers, floored
    pub ideal_revolutions: u32,
    /// Build revolutions, rounded up to a multiple of the density divisor
    pub main_revolutions: u32,
    /// Stitching revolutions appended after the build pass
    pub extra_revolutions: u32,
    /// `main_revolutions + extra_revolutions`
    pub total_revolutions: u32,
    /// Outer diameter actually reached after rounding (mm)
    pub calculated_outer_diameter: f64,
    /// Density divisor the plan was rounded to
    pub density_divisor: u32,
}

/// Solve how many revolutions the job needs
pub fn solve_rotation_plan(
    params: &MachineParameters,
    config: &GenerationConfig,
) -> ConfigResult<RotationPlan> {
    params.check_arithmetic()?;
    let divisor = config.density_divisor(params.volumetric_density)?;

    let ideal = (params.outer_diameter - params.inner_diameter) / (2.0 * params.fabric_thickness);
    if !ideal.is_finite() || ideal > u32::MAX as f64 {
        return Err(ConfigError::invalid(
            "fabric_thickness",
            format!("wall buildup of {} layers is out of range", ideal),
        ));
    }
    let ideal_revolutions = ideal.floor() as u32;

    let remainder = ideal_revolutions % divisor;
    let main_revolutions = if remainder == 0 {
        ideal_revolutions
    } else {
        ideal_revolutions + divisor - remainder
    };

    Ok(RotationPlan {
        ideal_revolutions,
        main_revolutions,
        extra_revolutions: config.extra_revolutions,
        total_revolutions: main_revolutions + config.extra_revolutions,
        calculated_outer_diameter: params.inner_diameter
            + main_revolutions as f64 * params.fabric_thickness * 2.0,
        density_divisor: divisor,
    })
}

/// Geometry of one wound layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayerGeometry {
    /// Diameter the layer is wound on (mm)
    pub diameter: f64,
    /// Circumference of the layer (mm)
    pub circumference: f64,
    /// Angular positions punched on this layer
    pub angle_step_count: u32,
    /// Angle between positions (degrees)
    pub angle_step_size: f64,
    /// Circumferential distance between positions (mm)
    pub step_length: f64,
}

/// Geometry of the layer at absolute `revolution`
///
/// The step count is the multiple of the effective head offset whose step
/// length is closest to the target punch step. On a tie the larger count
/// wins.
pub fn layer_geometry(params: &MachineParameters, revolution: u32) -> ConfigResult<LayerGeometry> {
    params.check_arithmetic()?;
    let diameter = params.inner_diameter + 2.0 * params.fabric_thickness * revolution as f64;
    let circumference = PI * diameter;
    if !circumference.is_finite() || circumference <= 0.0 {
        return Err(ConfigError::DegenerateGeometry {
            revolution,
            reason: format!("circumference is {}", circumference),
        });
    }

    let offset = params.effective_head_offset();
    if offset == 0 {
        return Err(ConfigError::DegenerateGeometry {
            revolution,
            reason: "effective head offset is zero".to_string(),
        });
    }

    let ideal_steps = circumference / params.punch_step;
    if !ideal_steps.is_finite() || ideal_steps > u32::MAX as f64 {
        return Err(ConfigError::DegenerateGeometry {
            revolution,
            reason: format!("{} angular steps per revolution", ideal_steps),
        });
    }

    let step = offset as f64;
    let lower = ((ideal_steps / step).floor() * step).max(step) as u32;
    let upper = ((ideal_steps / step).ceil() * step).max(step) as u32;

    let deviation = |count: u32| (circumference / count as f64 - params.punch_step).abs();
    let angle_step_count = if deviation(upper) <= deviation(lower) {
        upper
    } else {
        lower
    };

    let step_length = circumference / angle_step_count as f64;
    if (step_length - params.punch_step).abs() > STEP_DEVIATION_WARNING * params.punch_step {
        warn!(
            "Revolution {}: step length {:.3} mm deviates from target {:.3} mm ({} steps)",
            revolution, step_length, params.punch_step, angle_step_count
        );
    }

    Ok(LayerGeometry {
        diameter,
        circumference,
        angle_step_count,
        angle_step_size: 360.0 / angle_step_count as f64,
        step_length,
    })
}

/// Punch count over a run of revolutions, used to size the jitter sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PunchEstimate {
    /// Angular positions summed over all revolutions
    pub total_cranks: u64,
    /// Fabric wound over all revolutions (mm)
    pub total_fabric_length: f64,
    /// Axial head placements per angular position
    pub zones_per_crank: u32,
    /// Punches per head placement
    pub punches_in_zone: u32,
    /// `zones_per_crank × punches_in_zone × total_cranks`
    pub total_punches: u64,
}

/// Estimate the punches made over the first `revolutions` layers
pub fn total_punch_estimate(
    params: &MachineParameters,
    config: &GenerationConfig,
    revolutions: u32,
) -> ConfigResult<PunchEstimate> {
    params.check_arithmetic()?;
    let divisor = config.density_divisor(params.volumetric_density)?;

    let mut total_cranks = 0u64;
    let mut total_fabric_length = 0.0;
    for revolution in 0..revolutions {
        let layer = layer_geometry(params, revolution)?;
        total_cranks += layer.angle_step_count as u64;
        total_fabric_length += layer.circumference;
    }

    let zones_per_crank = params.zone_count();
    let punches_in_zone = (params.needle_step_x / divisor as f64).round() as u32;

    Ok(PunchEstimate {
        total_cranks,
        total_fabric_length,
        zones_per_crank,
        punches_in_zone,
        total_punches: zones_per_crank as u64 * punches_in_zone as u64 * total_cranks,
    })
}
