//! Reproducible axial jitter
//!
//! Offsets are drawn once up front from a seeded ChaCha stream and consumed
//! one per punch in generation order. The same seed and count always give the
//! same sequence.

use punchkit_core::{PatternError, PatternResult};
use rand::distributions::{Distribution, Uniform};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Draw `count` offsets uniformly from `[2·center − bound, bound)`
///
/// An empty interval (bound at or below the center) yields the lower end for
/// every punch.
pub fn generate(center: f64, bound: f64, count: usize, seed: u64) -> Vec<f64> {
    let low = 2.0 * center - bound;
    let high = bound;
    if low >= high || low.is_nan() || high.is_nan() {
        return vec![low; count];
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    Uniform::new(low, high)
        .sample_iter(&mut rng)
        .take(count)
        .collect()
}

/// Precomputed jitter offsets with bounds-checked access
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JitterSequence {
    offsets: Vec<f64>,
}

impl JitterSequence {
    pub fn new(center: f64, bound: f64, count: usize, seed: u64) -> Self {
        Self {
            offsets: generate(center, bound, count, seed),
        }
    }

    /// Offset for the punch at `cursor`
    ///
    /// Running past the end means the punch estimate and the generator
    /// disagree, which is reported as [`PatternError::JitterExhausted`].
    pub fn get(&self, cursor: usize) -> PatternResult<f64> {
        self.offsets
            .get(cursor)
            .copied()
            .ok_or(PatternError::JitterExhausted {
                requested: cursor,
                available: self.offsets.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.offsets
    }
}
