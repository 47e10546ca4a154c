//! # Noise Module
//!
//! Explicit sources for the unmodeled-variance term of the rejection rate.
//!
//! The calculator never reaches for a global random generator. Every caller
//! passes a [`NoiseSource`], so two runs with the same source produce the
//! same scores.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A supplier of unit noise samples.
///
/// Implementations return values in `[0, 1)`. The calculator scales them to
/// the rejection noise band.
pub trait NoiseSource {
    /// Draw the next unit sample.
    fn next_unit(&mut self) -> f64;
}

/// No noise: every sample is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroNoise;

impl NoiseSource for ZeroNoise {
    fn next_unit(&mut self) -> f64 {
        0.0
    }
}

/// The same unit sample every time.
#[derive(Debug, Clone, Copy)]
pub struct FixedNoise(f64);

impl FixedNoise {
    /// Largest unit sample representable below 1.0.
    const MAX_UNIT: f64 = 1.0 - f64::EPSILON;

    /// Create a fixed source. The value is clamped into `[0, 1)`; NaN becomes 0.
    #[must_use]
    pub fn new(unit: f64) -> Self {
        if unit.is_nan() {
            return Self(0.0);
        }
        Self(unit.clamp(0.0, Self::MAX_UNIT))
    }

    /// Get the unit value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl NoiseSource for FixedNoise {
    fn next_unit(&mut self) -> f64 {
        self.0
    }
}

/// Reproducible pseudo-random noise from a 64-bit seed.
#[derive(Debug, Clone)]
pub struct SeededNoise {
    seed: u64,
    rng: StdRng,
}

impl SeededNoise {
    /// Create a source seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The seed this source was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl NoiseSource for SeededNoise {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_noise_is_zero() {
        let mut noise = ZeroNoise;
        for _ in 0..5 {
            assert!(noise.next_unit().abs() < f64::EPSILON);
        }
    }

    #[test]
    fn fixed_noise_is_clamped() {
        assert!((FixedNoise::new(0.25).value() - 0.25).abs() < f64::EPSILON);
        assert!(FixedNoise::new(-3.0).value().abs() < f64::EPSILON);
        assert!(FixedNoise::new(7.0).value() < 1.0);
        assert!(FixedNoise::new(f64::NAN).value().abs() < f64::EPSILON);
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let mut a = SeededNoise::new(42);
        let mut b = SeededNoise::new(42);

        let first: Vec<f64> = (0..16).map(|_| a.next_unit()).collect();
        let second: Vec<f64> = (0..16).map(|_| b.next_unit()).collect();

        assert_eq!(first, second);
        assert_eq!(a.seed(), 42);
    }

    #[test]
    fn seeded_noise_stays_in_unit_interval() {
        let mut noise = SeededNoise::new(7);
        for _ in 0..1000 {
            let sample = noise.next_unit();
            assert!((0.0..1.0).contains(&sample));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = SeededNoise::new(1);
        let mut b = SeededNoise::new(2);

        let first: Vec<f64> = (0..8).map(|_| a.next_unit()).collect();
        let second: Vec<f64> = (0..8).map(|_| b.next_unit()).collect();

        assert_ne!(first, second);
    }
}
