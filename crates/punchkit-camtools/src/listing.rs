//! Listing formatter
//!
//! Renders a command sequence as the text file loaded by the machine: a
//! `;`-commented header with timing, job parameters and derived statistics,
//! then one G-code line per command.

use crate::stats::{CommandStatistics, GenerationStatistics};
use chrono::{DateTime, Local};
use punchkit_core::{KinematicLimits, MachineParameters, MotionCommand};
use punchkit_timing::{predict_time, TimeReport};
use std::io::{self, Write};

const RULE_WIDTH: usize = 50;

/// Formatter for complete G-code listings
#[derive(Debug, Clone)]
pub struct ListingFormatter {
    params: MachineParameters,
    statistics: GenerationStatistics,
    limits: KinematicLimits,
    generated_at: DateTime<Local>,
}

impl ListingFormatter {
    pub fn new(
        params: MachineParameters,
        statistics: GenerationStatistics,
        limits: KinematicLimits,
    ) -> Self {
        Self {
            params,
            statistics,
            limits,
            generated_at: Local::now(),
        }
    }

    /// Stamp the header with a fixed time instead of now
    pub fn with_timestamp(mut self, generated_at: DateTime<Local>) -> Self {
        self.generated_at = generated_at;
        self
    }

    /// Header lines (each starting with `;`) for a sequence with `report`
    /// and `counts`
    pub fn header_lines(&self, report: &TimeReport, counts: &CommandStatistics) -> Vec<String> {
        let p = &self.params;
        let s = &self.statistics;
        let rule = "-".repeat(RULE_WIDTH);

        let lines = vec![
            format!("Generated by punchkit {}", env!("CARGO_PKG_VERSION")),
            format!("at {}", self.generated_at.format("%d/%m/%Y %H:%M:%S")),
            rule.clone(),
            format!("Part 1 => {} ({})", report.part1, report.part1.whole_seconds()),
            format!("Part 2 => {} ({})", report.part2, report.part2.whole_seconds()),
            format!("Total => {} ({})", report.total, report.total.whole_seconds()),
            rule.clone(),
            "Generation parameters:".to_string(),
            format!("Tube length => {}", p.tube_length),
            format!("Inner diameter => {}", p.inner_diameter),
            format!("Outer diameter => {}", p.outer_diameter),
            format!("Fabric thickness => {}", p.fabric_thickness),
            format!("Punch step => {}", p.punch_step),
            format!("Needle step X => {}", p.needle_step_x),
            format!("Needle row spacing => {}", p.needle_row_spacing),
            format!("Needle rows => {}", p.needle_rows),
            format!("Volumetric density => {}", p.volumetric_density),
            format!("Punch head length => {}", p.head_length),
            format!("Punch depth => {}", p.punch_depth),
            format!("Support depth => {}", p.support_depth),
            format!("Punch offset => {}", p.punch_offset),
            format!("Idling speed => {}", p.idling_speed),
            format!("Move speed => {}", p.move_speed),
            format!("Rotate speed => {}", p.rotate_speed),
            rule,
            "Calculated parameters:".to_string(),
            format!("Calculated diameter => {}", s.calculated_outer_diameter),
            format!("Main revolutions => {}", s.main_revolutions),
            format!("Total revolutions => {}", s.total_revolutions),
            format!("Fabric length => {}", s.total_fabric_length.round()),
            format!("Punches => {}", counts.punch_sequences),
            format!("Jitter offsets => {}", s.total_punches),
            format!("Random seed => {}", s.random_seed),
            "#".repeat(RULE_WIDTH),
        ];

        lines.into_iter().map(|line| format!(";{}", line)).collect()
    }

    /// Header followed by one line per command
    pub fn format_lines(&self, commands: &[MotionCommand]) -> Vec<String> {
        let report = predict_time(commands, &self.limits);
        let counts = CommandStatistics::collect(commands);
        let mut lines = self.header_lines(&report, &counts);
        lines.reserve(commands.len());
        lines.extend(commands.iter().map(MotionCommand::to_gcode_line));
        lines
    }

    /// Write the listing, one line per entry
    pub fn write_to<W: Write>(&self, commands: &[MotionCommand], writer: &mut W) -> io::Result<()> {
        for line in self.format_lines(commands) {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()
    }
}
