//! Bounded-acceleration move timing
//!
//! Every axis accelerates at a constant rate up to the programmed feed and
//! decelerates symmetrically. Moves long enough to reach the feed follow a
//! trapezoidal velocity profile; shorter ones a triangular profile.

use punchkit_core::units::feed_per_second;
use punchkit_core::{KinematicLimits, LinearMove};

/// Time to travel `distance` at cruise `speed` with acceleration `accel`
///
/// Returns 0 when any input is zero or negative.
pub fn time_for_move(distance: f64, speed: f64, accel: f64) -> f64 {
    if distance <= 0.0 || speed <= 0.0 || accel <= 0.0 {
        return 0.0;
    }

    // Distance consumed by a full acceleration and deceleration
    let ramp_distance = speed * speed / accel;
    if distance >= ramp_distance {
        2.0 * (speed / accel) + (distance - ramp_distance) / speed
    } else {
        2.0 * (distance / accel).sqrt()
    }
}

/// Tracked machine position while walking a command sequence
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AxisPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub a: f64,
}

impl AxisPosition {
    /// Duration of `linear` from this position, then move to its target
    ///
    /// Linear axes share one Euclidean path; the rotary axis is timed on its
    /// own. Both run concurrently, so the slower one sets the duration.
    pub fn advance(&mut self, linear: &LinearMove, limits: &KinematicLimits) -> f64 {
        let target = linear.target();
        let next = AxisPosition {
            x: target.x.unwrap_or(self.x),
            y: target.y.unwrap_or(self.y),
            z: target.z.unwrap_or(self.z),
            a: target.a.unwrap_or(self.a),
        };

        let speed = feed_per_second(linear.feed_rate());
        let (dx, dy, dz) = (next.x - self.x, next.y - self.y, next.z - self.z);
        let linear_distance = (dx * dx + dy * dy + dz * dz).sqrt();
        let angular_distance = (next.a - self.a).abs();

        let linear_time = time_for_move(linear_distance, speed, limits.linear_acceleration);
        let angular_time = time_for_move(angular_distance, speed, limits.angular_acceleration);

        *self = next;
        linear_time.max(angular_time)
    }
}
