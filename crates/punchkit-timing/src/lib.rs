//! # Punchkit Timing
//!
//! Estimates how long a needle-punch program runs on the machine.
//!
//! - **Kinematics**: bounded-acceleration move times (trapezoid/triangle profile)
//! - **Predictor**: per-command durations summed around the cut marker
//! - **Parser**: reads a textual G-code listing back into motion commands

pub mod error;
pub mod kinematics;
pub mod parser;
pub mod predictor;

pub use error::{ListingError, ListingResult};
pub use kinematics::{time_for_move, AxisPosition};
pub use parser::parse_listing;
pub use predictor::{predict_listing_file, predict_time, TimeReport, TimeSpan};
