//! Run-time prediction for motion command sequences
//!
//! The sequence is split at the first coded pause carrying the cut marker
//! code: part 1 is everything before it, part 2 everything after it. The
//! tracked position carries across the marker, so part 2 starts where part 1
//! stopped. Operator pauses add no modeled time.

use crate::error::ListingResult;
use crate::kinematics::AxisPosition;
use crate::parser::parse_listing;
use punchkit_core::{KinematicLimits, MotionCommand};
use serde::Serialize;
use std::fmt;
use std::path::Path;
use tracing::debug;

const SECONDS_PER_DAY: u64 = 86_400;

/// A predicted duration
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize)]
pub struct TimeSpan {
    seconds: f64,
}

impl TimeSpan {
    pub fn from_seconds(seconds: f64) -> Self {
        Self { seconds }
    }

    /// Exact duration in seconds
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    /// Duration rounded to whole seconds
    pub fn whole_seconds(&self) -> u64 {
        self.seconds.max(0.0).round() as u64
    }

    /// `hh:mm:ss`, prefixed with `N d ` once the duration reaches a day
    pub fn formatted(&self) -> String {
        let total = self.whole_seconds();
        let days = total / SECONDS_PER_DAY;
        let rest = total % SECONDS_PER_DAY;
        let (h, m, s) = (rest / 3600, (rest % 3600) / 60, rest % 60);
        if days > 0 {
            format!("{} d {:02}:{:02}:{:02}", days, h, m, s)
        } else {
            format!("{:02}:{:02}:{:02}", h, m, s)
        }
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

/// Predicted durations of a program split around its cut marker
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct TimeReport {
    /// Up to the cut marker (the whole program when there is none)
    pub part1: TimeSpan,
    /// After the cut marker
    pub part2: TimeSpan,
    /// `part1 + part2`
    pub total: TimeSpan,
    /// Whether a cut marker was found
    pub has_cut_marker: bool,
}

/// Predict the execution time of a command sequence
pub fn predict_time(commands: &[MotionCommand], limits: &KinematicLimits) -> TimeReport {
    let mut position = AxisPosition::default();
    let mut parts = [0.0f64; 2];
    let mut part = 0;

    for command in commands {
        match command {
            MotionCommand::Linear(linear) => {
                parts[part] += position.advance(linear, limits);
            }
            MotionCommand::TimedPause { seconds } => parts[part] += seconds,
            MotionCommand::CodedPause { code, .. } => {
                if part == 0 && *code == limits.cut_marker_code {
                    part = 1;
                }
            }
        }
    }

    let report = TimeReport {
        part1: TimeSpan::from_seconds(parts[0]),
        part2: TimeSpan::from_seconds(parts[1]),
        total: TimeSpan::from_seconds(parts[0] + parts[1]),
        has_cut_marker: part == 1,
    };
    debug!(
        "Predicted {} commands: part 1 {}, part 2 {}, total {}",
        commands.len(),
        report.part1,
        report.part2,
        report.total
    );
    report
}

/// Read a G-code listing from disk and predict its execution time
pub fn predict_listing_file(
    path: impl AsRef<Path>,
    limits: &KinematicLimits,
) -> ListingResult<TimeReport> {
    let content = std::fs::read_to_string(path.as_ref())?;
    let commands = parse_listing(&content)?;
    Ok(predict_time(&commands, limits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatted_without_days() {
        assert_eq!(TimeSpan::from_seconds(0.0).formatted(), "00:00:00");
        assert_eq!(TimeSpan::from_seconds(3725.4).formatted(), "01:02:05");
        assert_eq!(TimeSpan::from_seconds(59.5).formatted(), "00:01:00");
    }

    #[test]
    fn test_formatted_with_days() {
        let span = TimeSpan::from_seconds(2.0 * 86_400.0 + 3.0 * 3600.0 + 4.0 * 60.0 + 5.0);
        assert_eq!(span.formatted(), "2 d 03:04:05");
        assert_eq!(span.whole_seconds(), 183_845);
    }

    #[test]
    fn test_timed_pause_counts() {
        let commands = vec![
            MotionCommand::timed_pause(1.5).unwrap(),
            MotionCommand::wait(),
            MotionCommand::timed_pause(2.25).unwrap(),
        ];
        let report = predict_time(&commands, &KinematicLimits::default());
        assert_eq!(report.part1.seconds(), 1.5);
        assert_eq!(report.part2.seconds(), 2.25);
        assert_eq!(report.total.seconds(), 3.75);
        assert!(report.has_cut_marker);
    }

    #[test]
    fn test_other_coded_pause_is_not_a_marker() {
        let commands = vec![
            MotionCommand::timed_pause(1.0).unwrap(),
            MotionCommand::coded_pause(3),
            MotionCommand::timed_pause(1.0).unwrap(),
        ];
        let report = predict_time(&commands, &KinematicLimits::default());
        assert_eq!(report.part1.seconds(), 2.0);
        assert_eq!(report.part2.seconds(), 0.0);
        assert!(!report.has_cut_marker);
    }
}
