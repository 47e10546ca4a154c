//! # Core Type Definitions
//!
//! This module contains all core types for the ASISI stress index:
//! - Region identity (`RegionKey`)
//! - Raw input (`RegionRecord`)
//! - Derived values (`DerivedMetrics`, `StressComponents`)
//! - Output structures (`Status`, `ScoredRegion`, `Exclusion`)
//! - Error types (`AsisiError`)

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::primitives::{CRITICAL_THRESHOLD, WARNING_THRESHOLD};

// =============================================================================
// REGION IDENTITY
// =============================================================================

/// Normalized match key for a district.
///
/// Heterogeneous sources spell district names differently ("Mumbai Suburban",
/// " mumbai suburban "). The key is the trimmed, lowercased name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionKey(String);

impl RegionKey {
    /// Build a key from any display name.
    #[must_use]
    pub fn normalize(name: &str) -> Self {
        Self(name.trim().to_lowercase())
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// REGION RECORD
// =============================================================================

/// Raw per-district input, already merged and unit-consistent.
///
/// Counters are carried as `f64` so that malformed values (negative,
/// non-finite) survive loading and can be rejected per record by the
/// [`Intake`](crate::intake::Intake) checks instead of failing a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RegionRecord {
    /// Display name of the district.
    pub name: String,
    /// Explicit match key. Derived from `name` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<RegionKey>,
    /// State the district belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    pub enrollment_volume: f64,
    pub demo_update_volume: f64,
    pub bio_update_volume: f64,
    pub auth_volume: f64,

    pub rural_households: f64,
    pub urban_households: f64,

    /// Projected 2025 population.
    pub population_2025: f64,
    /// Enrollment centers serving the district. A whole, positive count.
    pub estimated_centers: f64,

    /// Daily load samples, oldest first.
    pub history_7_days: Vec<f64>,
}

impl RegionRecord {
    /// Create an empty record with the given name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// The key this record joins and deduplicates on.
    #[must_use]
    pub fn match_key(&self) -> RegionKey {
        self.key
            .clone()
            .unwrap_or_else(|| RegionKey::normalize(&self.name))
    }
}

// =============================================================================
// DERIVED VALUES
// =============================================================================

/// The four raw metrics derived from one region, before normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub region: String,
    pub weighted_load: f64,
    pub rejection_rate: f64,
    pub recovery_slope: f64,
    pub centers_per_10k: f64,
}

/// Batch-normalized sub-scores, each in `[0, 1]`.
///
/// Higher is always worse: saturation is already inverted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StressComponents {
    pub load: f64,
    pub quality: f64,
    pub resilience: f64,
    pub saturation: f64,
}

// =============================================================================
// STATUS
// =============================================================================

/// Three-tier classification of a composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Status {
    Stable,
    Warning,
    Critical,
}

impl Status {
    /// Classify a composite score.
    ///
    /// Comparisons are strict, so a score exactly on a threshold falls into
    /// the lower-severity bucket.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > CRITICAL_THRESHOLD {
            Status::Critical
        } else if score > WARNING_THRESHOLD {
            Status::Warning
        } else {
            Status::Stable
        }
    }

    /// Get the status label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Status::Stable => "Stable",
            Status::Warning => "Warning",
            Status::Critical => "Critical",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// OUTPUT
// =============================================================================

/// One region after composite scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredRegion {
    pub metrics: DerivedMetrics,
    pub components: StressComponents,
    /// Composite score in `[0, 1]`.
    pub score: f64,
    pub status: Status,
}

impl ScoredRegion {
    /// Region display name.
    #[must_use]
    pub fn region(&self) -> &str {
        &self.metrics.region
    }
}

/// A record left out of a batch because it violated a precondition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exclusion {
    pub region: String,
    pub reason: String,
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the ASISI system.
///
/// - Per-record precondition failures carry the region name
/// - The batch driver turns them into [`Exclusion`]s; they never abort a batch
/// - The CORE should never panic; all errors must be recoverable
#[derive(Debug, Error, PartialEq)]
pub enum AsisiError {
    /// A ratio denominator is zero or negative and no default applies.
    #[error("Invalid denominator for region '{region}': {field}")]
    InvalidDenominator { region: String, field: &'static str },

    /// The recovery history is not exactly seven non-negative samples.
    #[error("Malformed history for region '{region}': {reason}")]
    MalformedHistory { region: String, reason: String },

    /// A raw counter is negative, non-finite or otherwise unusable.
    #[error("Invalid input for region '{region}': {field} {reason}")]
    InvalidInput {
        region: String,
        field: &'static str,
        reason: String,
    },

    /// A weight set does not form a valid blend.
    #[error("Invalid weight set: {0}")]
    InvalidWeights(String),

    /// Configuration could not be read or is inconsistent.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input data could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),
}

impl AsisiError {
    /// Region the error refers to, for per-record errors.
    #[must_use]
    pub fn region(&self) -> Option<&str> {
        match self {
            AsisiError::InvalidDenominator { region, .. }
            | AsisiError::MalformedHistory { region, .. }
            | AsisiError::InvalidInput { region, .. } => Some(region),
            _ => None,
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
