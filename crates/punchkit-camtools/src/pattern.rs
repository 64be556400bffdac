//! Needle-punch pattern generation
//!
//! For every revolution the mandrel steps through the layer's angular
//! positions. At each position the head visits every axial zone and, inside a
//! zone, every sub-step punched on this revolution, emitting an
//! approach/punch/retract group per strike. Traversal reverses on every other
//! angular position so consecutive strikes stay adjacent, odd positions are
//! shifted by half a sub-step (herringbone), and the axial section punched
//! rotates with the revolution so the whole needle spacing is covered after
//! `section_count` revolutions.
//!
//! With several needle rows, positions inside a band already covered by the
//! head only rotate.
//!
//! A full pattern is a build pass, a cut pause, and a stitching pass punched
//! at the depth reached by the build pass.

use crate::geometry::{
    layer_geometry, solve_rotation_plan, total_punch_estimate, PunchEstimate, RotationPlan,
};
use crate::jitter::JitterSequence;
use crate::stats::GenerationStatistics;
use punchkit_core::units::round_coordinate;
use punchkit_core::{
    ConfigError, ConfigResult, GenerationConfig, MachineParameters, MotionCommand, PatternResult,
};
use serde::Serialize;
use tracing::{debug, info, trace};

/// Axial layout constants shared by every revolution of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatternLayout {
    /// Axial head placements along the tube
    pub zone_count: u32,
    /// Axial distance between placements (the head reach, mm)
    pub zone_size: f64,
    /// Sub-steps covering one needle spacing
    pub substep_count: u32,
    /// Sub-steps punched per revolution
    pub substeps_per_revolution: u32,
    /// Axial distance between sub-steps (mm)
    pub substep_size: f64,
    /// Revolutions needed to cover one needle spacing
    pub section_count: u32,
    /// Axial shift between consecutive sections (mm)
    pub section_size: f64,
}

impl PatternLayout {
    /// Derive the layout, rejecting sub-step settings that disagree with the
    /// density divisor (see [`MachineParameters::check_layout`])
    pub fn new(params: &MachineParameters, density_divisor: u32) -> ConfigResult<Self> {
        params.check_layout(density_divisor)?;
        let per_revolution = params.substeps_per_revolution;
        let section_count = params.substep_count / per_revolution;

        Ok(Self {
            zone_count: params.zone_count(),
            zone_size: params.head_length,
            substep_count: params.substep_count,
            substeps_per_revolution: per_revolution,
            substep_size: params.needle_step_x / params.substep_count as f64,
            section_count,
            section_size: params.needle_step_x / section_count as f64,
        })
    }

    /// Head placement offset, walked backwards when `forward` is false
    pub fn zone_offset(&self, zone: u32, forward: bool) -> f64 {
        let start = if forward {
            0.0
        } else {
            self.zone_size * (self.zone_count - 1) as f64
        };
        (self.zone_size * zone as f64 - start).abs()
    }

    /// Sub-step offset inside a zone, walked backwards when `forward` is false
    pub fn substep_offset(&self, substep: u32, forward: bool) -> f64 {
        let start = if forward {
            0.0
        } else {
            self.substep_size * (self.substeps_per_revolution - 1) as f64
        };
        (self.substep_size * substep as f64 - start).abs()
    }

    /// Section shift for an absolute revolution
    pub fn section_offset(&self, revolution: u32) -> f64 {
        (revolution % self.section_count) as f64 * self.section_size
    }

    /// Herringbone shift: half a sub-step on odd angular positions
    pub fn snake_offset(&self, angle_step: u32) -> f64 {
        (angle_step % 2) as f64 * self.substep_size / 2.0
    }

    /// Strikes at one angular position
    pub fn punches_per_step(&self) -> u32 {
        self.zone_count * self.substeps_per_revolution
    }
}

/// Progress through a multi-pass generation, owned by the caller
///
/// Each pass starts at `consumed_revolutions` (so the rotary angle keeps
/// increasing) and reads jitter from `jitter_cursor`. Both advance only when
/// a pass succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PassCursor {
    pub consumed_revolutions: u32,
    pub jitter_cursor: usize,
}

/// Generator for needle-punch toolpaths
#[derive(Debug, Clone)]
pub struct PatternGenerator {
    params: MachineParameters,
    config: GenerationConfig,
    plan: RotationPlan,
    layout: PatternLayout,
    estimate: PunchEstimate,
    jitter: JitterSequence,
}

impl PatternGenerator {
    /// Solve the job geometry and precompute the jitter sequence
    pub fn new(params: MachineParameters, config: GenerationConfig) -> PatternResult<Self> {
        if !config.jitter_center.is_finite() {
            return Err(ConfigError::invalid(
                "jitter_center",
                format!("must be finite (got {})", config.jitter_center),
            )
            .into());
        }

        let plan = solve_rotation_plan(&params, &config)?;
        let layout = PatternLayout::new(&params, plan.density_divisor)?;
        let estimate = total_punch_estimate(&params, &config, plan.total_revolutions)?;
        let punch_count = usize::try_from(estimate.total_punches).map_err(|_| {
            ConfigError::invalid(
                "tube_length",
                format!("{} punches do not fit in memory", estimate.total_punches),
            )
        })?;

        let jitter = JitterSequence::new(
            config.jitter_center,
            params.jitter_bound,
            punch_count,
            config.random_seed,
        );
        debug!(
            "Prepared {} jitter offsets for {} revolutions (seed {})",
            jitter.len(),
            plan.total_revolutions,
            config.random_seed
        );

        Ok(Self {
            params,
            config,
            plan,
            layout,
            estimate,
            jitter,
        })
    }

    pub fn params(&self) -> &MachineParameters {
        &self.params
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    pub fn plan(&self) -> &RotationPlan {
        &self.plan
    }

    pub fn layout(&self) -> &PatternLayout {
        &self.layout
    }

    pub fn jitter(&self) -> &JitterSequence {
        &self.jitter
    }

    /// Upper bound on the commands a full pattern produces
    pub fn estimated_command_count(&self) -> u64 {
        3 * self.estimate.total_punches + self.estimate.total_cranks + 1
    }

    /// Statistics for the listing header
    pub fn statistics(&self) -> GenerationStatistics {
        GenerationStatistics::new(&self.plan, &self.estimate, self.config.random_seed)
    }

    /// Generate `revolutions` layers starting at the cursor
    ///
    /// `fix_z_offset` freezes the support axis depth (used by the stitching
    /// pass); without it the depth follows the wall built so far.
    pub fn generate_pass(
        &self,
        cursor: &mut PassCursor,
        revolutions: u32,
        fix_z_offset: Option<f64>,
    ) -> PatternResult<Vec<MotionCommand>> {
        let p = &self.params;
        let layout = &self.layout;
        let start = cursor.consumed_revolutions;
        let finish = start.checked_add(revolutions).ok_or_else(|| {
            ConfigError::invalid("revolutions", format!("{} + {} overflows", start, revolutions))
        })?;
        let span = p.circumferential_head_span();

        let mut jitter_cursor = cursor.jitter_cursor;
        let mut commands = Vec::new();

        for revolution in start..finish {
            let layer = layer_geometry(p, revolution)?;
            debug!(
                "Revolution {}: {} steps of {:.4} deg ({:.3} mm)",
                revolution, layer.angle_step_count, layer.angle_step_size, layer.step_length
            );

            let wall = p.fabric_thickness * revolution as f64;
            let y = round_coordinate(p.zero_offset_y - p.punch_offset - wall);
            let z = round_coordinate(p.zero_offset_z - fix_z_offset.unwrap_or(wall));
            let y_punch = y + p.punch_depth + p.punch_offset;
            let z_punch = z + p.support_depth;
            let section_offset = layout.section_offset(revolution);

            for angle_step in 0..layer.angle_step_count {
                let angle = round_coordinate(
                    360.0 * revolution as f64 + layer.angle_step_size * angle_step as f64,
                );
                commands.push(MotionCommand::rotate(angle, p.rotate_speed));

                if p.is_multi_row() && (p.needle_row_spacing..span).contains(&(angle_step % span))
                {
                    trace!("Revolution {} step {}: band covered, rotate only", revolution, angle_step);
                    continue;
                }

                // The very first strike of a run walks forward
                let forward = (revolution as u64 * layer.angle_step_count as u64
                    + angle_step as u64)
                    % 2
                    == 0;
                let snake_offset = layout.snake_offset(angle_step);

                for zone in 0..layout.zone_count {
                    for substep in 0..layout.substeps_per_revolution {
                        let jitter = self.jitter.get(jitter_cursor)?;
                        jitter_cursor += 1;

                        let x = round_coordinate(
                            jitter
                                + snake_offset
                                + section_offset
                                + layout.substep_offset(substep, forward)
                                + layout.zone_offset(zone, forward),
                        );

                        commands.push(MotionCommand::approach(x, y, z, p.idling_speed));
                        commands.push(MotionCommand::punch(x, y_punch, z_punch, p.move_speed));
                        commands.push(MotionCommand::retract(x, y, z, p.move_speed));
                    }
                }
            }
        }

        cursor.consumed_revolutions = finish;
        cursor.jitter_cursor = jitter_cursor;
        Ok(commands)
    }

    /// Generate the full pattern: build pass, cut pause, stitching pass
    pub fn generate(&self) -> PatternResult<Vec<MotionCommand>> {
        let mut cursor = PassCursor::default();

        let mut commands = self.generate_pass(&mut cursor, self.plan.main_revolutions, None)?;
        info!(
            "Build pass: {} revolutions, {} commands",
            self.plan.main_revolutions,
            commands.len()
        );
        if !commands.is_empty() {
            commands.push(MotionCommand::cut_pause(self.config.cut_pause_code));
        }

        let fix_z_offset = self.params.fabric_thickness * self.plan.main_revolutions as f64;
        let stitching =
            self.generate_pass(&mut cursor, self.plan.extra_revolutions, Some(fix_z_offset))?;
        info!(
            "Stitching pass: {} revolutions at depth {:.3}, {} commands",
            self.plan.extra_revolutions,
            fix_z_offset,
            stitching.len()
        );
        commands.extend(stitching);

        Ok(commands)
    }
}

/// Generate the full pattern with the default generation constants
pub fn generate_pattern(params: &MachineParameters) -> PatternResult<Vec<MotionCommand>> {
    generate_pattern_with_config(params, &GenerationConfig::default())
}

/// Generate the full pattern with explicit generation constants
pub fn generate_pattern_with_config(
    params: &MachineParameters,
    config: &GenerationConfig,
) -> PatternResult<Vec<MotionCommand>> {
    PatternGenerator::new(params.clone(), config.clone())?.generate()
}
