//! # Punchkit CAM Tools
//!
//! Toolpath generation for rotary needle-punch felting machines.
//!
//! ## Modules
//!
//! - **Geometry**: revolution counts, per-layer step counts, punch estimates
//! - **Jitter**: seeded, reproducible axial offsets
//! - **Pattern**: build and stitching passes as motion commands
//! - **Stats**: generation and command statistics
//! - **Listing**: commented G-code listing output

pub mod geometry;
pub mod jitter;
pub mod listing;
pub mod pattern;
pub mod stats;

pub use geometry::{
    layer_geometry, solve_rotation_plan, total_punch_estimate, LayerGeometry, PunchEstimate,
    RotationPlan,
};
pub use jitter::JitterSequence;
pub use listing::ListingFormatter;
pub use pattern::{
    generate_pattern, generate_pattern_with_config, PassCursor, PatternGenerator, PatternLayout,
};
pub use stats::{CommandStatistics, GenerationStatistics};
