//! # Punchkit
//!
//! Toolpath generator and run-time estimator for rotary needle-punch felting
//! machines that build tube-shaped nonwovens layer by layer on a mandrel.
//!
//! ## Architecture
//!
//! Punchkit is organized as a workspace with multiple crates:
//!
//! 1. **punchkit-core** - Machine parameters, motion commands, errors
//! 2. **punchkit-camtools** - Geometry solver, jitter, pattern generator, listing output
//! 3. **punchkit-timing** - Kinematic time prediction and listing parser
//! 4. **punchkit-settings** - Job config files and parameter validation
//! 5. **punchkit** - Command line binary that integrates all crates

pub use punchkit_camtools as camtools;
pub use punchkit_settings as settings;
pub use punchkit_timing as timing;

pub use punchkit_core::{
    AxisTargets, CommandError, ConfigError, DensityClass, GenerationConfig, KinematicLimits,
    LinearMove, MachineParameters, MotionCommand, MoveKind, PatternError, CUT_PAUSE_CODE,
};

pub use punchkit_camtools::{
    generate_pattern, generate_pattern_with_config, layer_geometry, solve_rotation_plan,
    CommandStatistics, GenerationStatistics, LayerGeometry, ListingFormatter, PassCursor,
    PatternGenerator, RotationPlan,
};

pub use punchkit_settings::{JobConfig, ParameterValidator, SettingsError, ValidationLimits};

pub use punchkit_timing::{parse_listing, predict_time, time_for_move, TimeReport, TimeSpan};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Logs go to stderr so a listing written to stdout stays clean. `RUST_LOG`
/// is honored; `verbosity` raises the default level from INFO to DEBUG (1)
/// or TRACE (2 and above).
pub fn init_logging(verbosity: u8) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = match verbosity {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
