//! # Weights Module
//!
//! The versioned blend that turns four sub-scores into one composite score.
//!
//! A weight set is part of a score's meaning. Two scores are only comparable
//! when they were produced under the same `version`, so editing a weight
//! requires a new version label rather than a silent change.

use serde::{Deserialize, Serialize};

use crate::primitives::WEIGHT_SUM_TOLERANCE;
use crate::{AsisiError, StressComponents};

/// Version label of the canonical weight set.
pub const CANONICAL_VERSION: &str = "asisi-v1";

/// Weights of the four stress components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StressWeights {
    pub version: String,
    /// Immediate volume pressure.
    pub load: f64,
    /// Data-quality pressure (rejection rate).
    pub quality: f64,
    /// Backlog trend (recovery slope).
    pub resilience: f64,
    /// Structural capacity (center density, inverted).
    pub saturation: f64,
}

impl Default for StressWeights {
    fn default() -> Self {
        Self::canonical()
    }
}

impl StressWeights {
    /// The canonical `asisi-v1` blend: 35 / 25 / 25 / 15.
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            version: CANONICAL_VERSION.to_string(),
            load: 0.35,
            quality: 0.25,
            resilience: 0.25,
            saturation: 0.15,
        }
    }

    /// Create and validate a custom weight set.
    pub fn new(
        version: impl Into<String>,
        load: f64,
        quality: f64,
        resilience: f64,
        saturation: f64,
    ) -> Result<Self, AsisiError> {
        let weights = Self {
            version: version.into(),
            load,
            quality,
            resilience,
            saturation,
        };
        weights.validate()?;
        Ok(weights)
    }

    /// Sum of the four weights.
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.load + self.quality + self.resilience + self.saturation
    }

    /// Check that the set is a convex blend with a version label.
    ///
    /// Every weight must be finite and non-negative, and the four must sum to
    /// 1.0. Together with sub-scores in `[0, 1]` this keeps the composite
    /// score in `[0, 1]`.
    pub fn validate(&self) -> Result<(), AsisiError> {
        if self.version.trim().is_empty() {
            return Err(AsisiError::InvalidWeights(
                "version label must not be empty".to_string(),
            ));
        }

        let named = [
            ("load", self.load),
            ("quality", self.quality),
            ("resilience", self.resilience),
            ("saturation", self.saturation),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(AsisiError::InvalidWeights(format!(
                    "{} weight must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(AsisiError::InvalidWeights(format!(
                "weights of '{}' sum to {}, expected 1.0",
                self.version, sum
            )));
        }

        Ok(())
    }

    /// Blend components into a composite score.
    #[must_use]
    pub fn blend(&self, components: &StressComponents) -> f64 {
        self.load * components.load
            + self.quality * components.quality
            + self.resilience * components.resilience
            + self.saturation * components.saturation
    }
}

// =============================================================================
// TESTS
// =============================================================================
