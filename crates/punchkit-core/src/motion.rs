//! Structured motion commands
//!
//! A [`MotionCommand`] is one machine instruction: a linear/rotary move, a
//! coded pause or a timed pause. Commands are pure values; rendering to the
//! textual machine-code form goes through [`std::fmt::Display`], one line per
//! command with no embedded line breaks.
//!
//! The punch sub-sequence uses the named constructors
//! [`MotionCommand::approach`], [`MotionCommand::punch`],
//! [`MotionCommand::retract`], [`MotionCommand::rotate`] and
//! [`MotionCommand::wait`].

use crate::error::CommandError;
use crate::params::CUT_PAUSE_CODE;
use crate::units::{format_coordinate, format_feed};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a linear move inside the punch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
    /// Move to the punch position above the fabric
    Approach,
    /// Needle penetration with the support shoe raised
    Punch,
    /// Needle withdrawal back to the approach position
    Retract,
    /// Mandrel rotation to the next angular step
    Rotate,
    /// Any other move (e.g. parsed from a listing)
    Travel,
}

impl fmt::Display for MoveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Approach => write!(f, "approach"),
            Self::Punch => write!(f, "punch"),
            Self::Retract => write!(f, "retract"),
            Self::Rotate => write!(f, "rotate"),
            Self::Travel => write!(f, "travel"),
        }
    }
}

/// Axis targets of a linear move; `None` leaves the axis where it is
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisTargets {
    /// Axial position (mm)
    pub x: Option<f64>,
    /// Punch axis position (mm)
    pub y: Option<f64>,
    /// Support axis position (mm)
    pub z: Option<f64>,
    /// Mandrel angle (degrees, cumulative)
    pub a: Option<f64>,
}

impl AxisTargets {
    /// Targets for the three linear axes
    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            z: Some(z),
            a: None,
        }
    }

    /// Target for the rotary axis only
    pub fn angle(a: f64) -> Self {
        Self {
            a: Some(a),
            ..Default::default()
        }
    }

    /// Whether no axis is targeted
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none() && self.a.is_none()
    }

    /// Whether any linear axis is targeted
    pub fn has_linear(&self) -> bool {
        self.x.is_some() || self.y.is_some() || self.z.is_some()
    }
}

/// A linear (G01) move; always targets at least one axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearMove {
    target: AxisTargets,
    feed_rate: f64,
    kind: MoveKind,
    comment: Option<String>,
}

impl LinearMove {
    /// Axis targets of the move
    pub fn target(&self) -> &AxisTargets {
        &self.target
    }

    /// Feed rate (units/min)
    pub fn feed_rate(&self) -> f64 {
        self.feed_rate
    }

    /// Role of the move in the punch cycle
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Optional operator-facing comment
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }
}

/// One machine instruction
///
/// Deserialization goes through the same checks as the constructors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", try_from = "RawMotionCommand")]
pub enum MotionCommand {
    /// Linear or rotary move (G01)
    Linear(LinearMove),
    /// Coded pause waiting for the operator (M-code)
    CodedPause {
        /// M-code number
        code: u32,
        /// Optional operator-facing comment
        comment: Option<String>,
    },
    /// Dwell for a fixed time (G04)
    TimedPause {
        /// Duration in seconds
        seconds: f64,
    },
}

impl MotionCommand {
    /// Create a linear move, rejecting moves with no axis or an unusable feed
    pub fn linear_move(target: AxisTargets, feed_rate: f64) -> Result<Self, CommandError> {
        Self::linear_move_of_kind(target, feed_rate, MoveKind::Travel)
    }

    /// Create a linear move tagged with its role in the punch cycle
    pub fn linear_move_of_kind(
        target: AxisTargets,
        feed_rate: f64,
        kind: MoveKind,
    ) -> Result<Self, CommandError> {
        if target.is_empty() {
            return Err(CommandError::NoAxisTarget);
        }
        if !feed_rate.is_finite() || feed_rate < 0.0 {
            return Err(CommandError::InvalidFeedRate { feed_rate });
        }
        Ok(Self::Linear(LinearMove {
            target,
            feed_rate,
            kind,
            comment: None,
        }))
    }

    /// Create a coded pause
    pub fn coded_pause(code: u32) -> Self {
        Self::CodedPause {
            code,
            comment: None,
        }
    }

    /// Create a timed pause, rejecting negative or non-finite durations
    pub fn timed_pause(seconds: f64) -> Result<Self, CommandError> {
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(CommandError::InvalidPause { seconds });
        }
        Ok(Self::TimedPause { seconds })
    }

    /// Move to the punch position above the fabric
    pub fn approach(x: f64, y: f64, z: f64, feed_rate: f64) -> Self {
        Self::punch_cycle_move(AxisTargets::xyz(x, y, z), feed_rate, MoveKind::Approach)
            .with_comment("approach punch point")
    }

    /// Drive the needles into the fabric
    pub fn punch(x: f64, y: f64, z: f64, feed_rate: f64) -> Self {
        Self::punch_cycle_move(AxisTargets::xyz(x, y, z), feed_rate, MoveKind::Punch)
    }

    /// Withdraw the needles after a punch
    pub fn retract(x: f64, y: f64, z: f64, feed_rate: f64) -> Self {
        Self::punch_cycle_move(AxisTargets::xyz(x, y, z), feed_rate, MoveKind::Retract)
    }

    /// Rotate the mandrel to an absolute angle
    pub fn rotate(angle: f64, feed_rate: f64) -> Self {
        Self::punch_cycle_move(AxisTargets::angle(angle), feed_rate, MoveKind::Rotate)
    }

    /// Pause for the operator to cut the fabric
    pub fn wait() -> Self {
        Self::cut_pause(CUT_PAUSE_CODE)
    }

    /// Pause for the operator to cut the fabric, with a custom M-code
    pub fn cut_pause(code: u32) -> Self {
        Self::coded_pause(code).with_comment("cut fabric")
    }

    // Axis targets are always present here; only the feed can be unusable and
    // callers pass machine feeds that were checked up front.
    fn punch_cycle_move(target: AxisTargets, feed_rate: f64, kind: MoveKind) -> Self {
        Self::Linear(LinearMove {
            target,
            feed_rate,
            kind,
            comment: None,
        })
    }

    /// Attach an operator-facing comment (ignored by timed pauses)
    pub fn with_comment(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            Self::Linear(m) => m.comment = Some(text.into()),
            Self::CodedPause { comment, .. } => *comment = Some(text.into()),
            Self::TimedPause { .. } => {}
        }
        self
    }

    /// Linear move payload, if this is a move
    pub fn as_linear(&self) -> Option<&LinearMove> {
        match self {
            Self::Linear(m) => Some(m),
            _ => None,
        }
    }

    /// Whether this is a rotation-only move
    pub fn is_rotation(&self) -> bool {
        self.as_linear()
            .map(|m| m.target.a.is_some() && !m.target.has_linear())
            .unwrap_or(false)
    }

    /// Whether this is a coded pause with the given code
    pub fn is_coded_pause(&self, code: u32) -> bool {
        matches!(self, Self::CodedPause { code: c, .. } if *c == code)
    }

    /// Render the textual machine-code line
    pub fn to_gcode_line(&self) -> String {
        self.to_string()
    }
}

/// Unchecked wire form of [`MotionCommand`]
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum RawMotionCommand {
    Linear(RawLinearMove),
    CodedPause {
        code: u32,
        #[serde(default)]
        comment: Option<String>,
    },
    TimedPause {
        seconds: f64,
    },
}

#[derive(Deserialize)]
struct RawLinearMove {
    #[serde(default)]
    target: AxisTargets,
    feed_rate: f64,
    kind: MoveKind,
    #[serde(default)]
    comment: Option<String>,
}

impl TryFrom<RawMotionCommand> for MotionCommand {
    type Error = CommandError;

    fn try_from(raw: RawMotionCommand) -> Result<Self, Self::Error> {
        match raw {
            RawMotionCommand::Linear(m) => {
                let command = Self::linear_move_of_kind(m.target, m.feed_rate, m.kind)?;
                Ok(match m.comment {
                    Some(text) => command.with_comment(text),
                    None => command,
                })
            }
            RawMotionCommand::CodedPause { code, comment } => Ok(Self::CodedPause { code, comment }),
            RawMotionCommand::TimedPause { seconds } => Self::timed_pause(seconds),
        }
    }
}

impl fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear(m) => {
                write!(f, "G01")?;
                let axes = [
                    ('X', m.target.x),
                    ('Y', m.target.y),
                    ('Z', m.target.z),
                    ('A', m.target.a),
                ];
                for (letter, value) in axes {
                    if let Some(v) = value {
                        write!(f, " {}{}", letter, format_coordinate(v))?;
                    }
                }
                write!(f, " F{}", format_feed(m.feed_rate))
            }
            Self::CodedPause { code, .. } => write!(f, "M{}", code),
            Self::TimedPause { seconds } => write!(f, "G04 P{}", format_coordinate(*seconds)),
        }
    }
}
