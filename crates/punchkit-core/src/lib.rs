//! # Punchkit Core
//!
//! Core types shared by the punchkit crates: machine parameters and
//! generation constants, the structured motion command model, numeric
//! helpers for the command stream, and the error types used across the
//! toolpath pipeline.

pub mod error;
pub mod motion;
pub mod params;
pub mod units;

pub use error::{CommandError, ConfigError, ConfigResult, PatternError, PatternResult};
pub use motion::{AxisTargets, LinearMove, MotionCommand, MoveKind};
pub use params::{
    DensityClass, GenerationConfig, KinematicLimits, MachineParameters, CUT_PAUSE_CODE,
};
