//! Generation and command statistics

use crate::geometry::{PunchEstimate, RotationPlan};
use punchkit_core::{MotionCommand, MoveKind};
use serde::Serialize;

/// Derived figures reported alongside a generated pattern
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationStatistics {
    pub main_revolutions: u32,
    pub total_revolutions: u32,
    pub calculated_outer_diameter: f64,
    /// Jitter offsets precomputed for the run; multi-row heads punch fewer
    pub total_punches: u64,
    /// Fabric wound over all revolutions (mm)
    pub total_fabric_length: f64,
    pub zones_per_crank: u32,
    pub punches_in_zone: u32,
    pub random_seed: u64,
}

impl GenerationStatistics {
    pub fn new(plan: &RotationPlan, estimate: &PunchEstimate, random_seed: u64) -> Self {
        Self {
            main_revolutions: plan.main_revolutions,
            total_revolutions: plan.total_revolutions,
            calculated_outer_diameter: plan.calculated_outer_diameter,
            total_punches: estimate.total_punches,
            total_fabric_length: estimate.total_fabric_length,
            zones_per_crank: estimate.zones_per_crank,
            punches_in_zone: estimate.punches_in_zone,
            random_seed,
        }
    }
}

/// Counts by command type in a generated sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct CommandStatistics {
    pub total_commands: usize,
    pub linear_moves: usize,
    pub rotations: usize,
    /// Complete approach/punch/retract groups
    pub punch_sequences: usize,
    pub coded_pauses: usize,
    pub timed_pauses: usize,
}

impl CommandStatistics {
    pub fn collect(commands: &[MotionCommand]) -> Self {
        let mut stats = Self {
            total_commands: commands.len(),
            ..Default::default()
        };

        for command in commands {
            match command {
                MotionCommand::Linear(_) if command.is_rotation() => {
                    stats.linear_moves += 1;
                    stats.rotations += 1;
                }
                MotionCommand::Linear(_) => stats.linear_moves += 1,
                MotionCommand::CodedPause { .. } => stats.coded_pauses += 1,
                MotionCommand::TimedPause { .. } => stats.timed_pauses += 1,
            }
        }

        let kind = |c: &MotionCommand| c.as_linear().map(|m| m.kind());
        stats.punch_sequences = commands
            .windows(3)
            .filter(|w| {
                kind(&w[0]) == Some(MoveKind::Approach)
                    && kind(&w[1]) == Some(MoveKind::Punch)
                    && kind(&w[2]) == Some(MoveKind::Retract)
            })
            .count();

        stats
    }
}
