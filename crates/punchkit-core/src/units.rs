//! Numeric helpers shared by the generator, the listing and the predictor
//!
//! Coordinates are millimeters, angles are degrees and feed rates are
//! units per minute, matching what the felting machine controller expects.

/// Decimal places kept for axis targets and pause durations
pub const COORDINATE_DECIMALS: u32 = 3;

/// Round `value` to `places` decimal places (half away from zero)
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Round a coordinate to the precision used in the command stream
pub fn round_coordinate(value: f64) -> f64 {
    round_to(value, COORDINATE_DECIMALS)
}

/// Format a coordinate for a G-code token
///
/// The value is rounded to three decimals and printed in its shortest exact
/// form, always keeping at least one fractional digit (`100.0`, `12.5`,
/// `-0.125`).
pub fn format_coordinate(value: f64) -> String {
    let rounded = round_coordinate(value);
    if rounded.fract() == 0.0 {
        format!("{:.1}", rounded)
    } else {
        format!("{}", rounded)
    }
}

/// Format a feed rate token value (integer part only)
pub fn format_feed(feed_per_minute: f64) -> String {
    format!("{}", feed_per_minute.trunc() as i64)
}

/// Convert a feed rate from units/minute to units/second
pub fn feed_per_second(feed_per_minute: f64) -> f64 {
    feed_per_minute / 60.0
}
