//! # Configuration
//!
//! TOML configuration for the ASISI binary.
//!
//! ```toml
//! [weights]
//! version = "asisi-v1"
//! load = 0.35
//! quality = 0.25
//! resilience = 0.25
//! saturation = 0.15
//!
//! [rejection]
//! seed = 42                  # omit for zero noise
//! default_rural_ratio = 0.5  # omit to exclude regions with no households
//!
//! [capacity]
//! people_per_center = 20000.0
//! ```
//!
//! Resolution order: `--config <path>`, then `./asisi.toml` if present, then
//! built-in defaults.

use asisi_core::primitives::DEFAULT_PEOPLE_PER_CENTER;
use asisi_core::{AsisiError, NoiseSource, SeededNoise, StressCalculator, StressWeights, ZeroNoise};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "asisi.toml";

/// Noise and fallback policy for the rejection rate.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RejectionConfig {
    /// Seed for the rejection noise. No seed means no noise.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Rural share to assume for regions reporting no households.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_rural_ratio: Option<f64>,
}

/// Supply-side assumptions for census-only inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CapacityConfig {
    pub people_per_center: f64,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            people_per_center: DEFAULT_PEOPLE_PER_CENTER,
        }
    }
}

/// Full application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AsisiConfig {
    pub weights: StressWeights,
    pub rejection: RejectionConfig,
    pub capacity: CapacityConfig,
}

impl AsisiConfig {
    /// Load configuration following the resolution order.
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, AsisiError> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_PATH);
                    Ok(Self::default())
                }
            }
        }
    }

    /// Read and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, AsisiError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AsisiError::Io(format!("Cannot read config '{}': {}", path.display(), e))
        })?;

        let config = Self::from_toml_str(&text)?;
        tracing::info!(
            "Loaded config from {:?} (weights {})",
            path,
            config.weights.version
        );
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(text: &str) -> Result<Self, AsisiError> {
        let config: Self =
            toml::from_str(text).map_err(|e| AsisiError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml_string(&self) -> Result<String, AsisiError> {
        toml::to_string_pretty(self).map_err(|e| AsisiError::Config(e.to_string()))
    }

    /// Check cross-field consistency.
    pub fn validate(&self) -> Result<(), AsisiError> {
        self.weights.validate()?;

        let ppc = self.capacity.people_per_center;
        if !ppc.is_finite() || ppc <= 0.0 {
            return Err(AsisiError::Config(format!(
                "capacity.people_per_center must be positive, got {}",
                ppc
            )));
        }

        if let Some(ratio) = self.rejection.default_rural_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(AsisiError::Config(format!(
                    "rejection.default_rural_ratio must lie in [0, 1], got {}",
                    ratio
                )));
            }
        }

        Ok(())
    }

    /// Build the calculator this configuration describes.
    pub fn calculator(&self) -> Result<StressCalculator, AsisiError> {
        let calculator = StressCalculator::new().with_weights(self.weights.clone())?;

        match self.rejection.default_rural_ratio {
            Some(ratio) => calculator.with_fallback_rural_ratio(ratio),
            None => Ok(calculator),
        }
    }

    /// Noise source for one run. A seed given on the command line wins over
    /// the configured one.
    #[must_use]
    pub fn noise(&self, seed_override: Option<u64>) -> Box<dyn NoiseSource> {
        match seed_override.or(self.rejection.seed) {
            Some(seed) => {
                tracing::debug!("Rejection noise seeded with {}", seed);
                Box::new(SeededNoise::new(seed))
            }
            None => Box::new(ZeroNoise),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
