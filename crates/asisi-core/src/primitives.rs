//! # Innate Primitives
//!
//! Hardcoded constants of the stress index.
//!
//! These values define what a score *means*. Changing any of them changes the
//! semantics of every score produced, so the blend weights live in a
//! versioned [`StressWeights`](crate::weights::StressWeights) set while the
//! remaining values are compiled in and immutable at runtime.

// =============================================================================
// WEIGHTED LOAD
// =============================================================================

/// Processing cost of a new enrollment, relative to itself.
pub const ENROLLMENT_COST: f64 = 1.0;

/// Processing cost of a demographic update.
pub const DEMO_UPDATE_COST: f64 = 0.8;

/// Processing cost of a biometric update.
pub const BIO_UPDATE_COST: f64 = 0.8;

/// Processing cost of an authentication check.
pub const AUTH_COST: f64 = 0.1;

// =============================================================================
// REJECTION RATE
// =============================================================================

/// Baseline rejection rate every region carries.
pub const BASE_REJECTION_RATE: f64 = 0.03;

/// Extra rejection rate for a fully rural region (rural ratio = 1).
pub const RURAL_REJECTION_PENALTY: f64 = 0.05;

/// Width of the unmodeled-variance band added to the rejection rate.
///
/// The noise term always lies in `[0, REJECTION_NOISE_SPAN)`.
pub const REJECTION_NOISE_SPAN: f64 = 0.02;

/// Conventional rural ratio to substitute when a region reports no households.
///
/// Only applied when the calculator is explicitly configured with it.
pub const FALLBACK_RURAL_RATIO: f64 = 0.5;

// =============================================================================
// RESILIENCE & SATURATION
// =============================================================================

/// Number of daily load samples in a recovery history.
pub const HISTORY_DAYS: usize = 7;

/// Population unit for center density.
pub const PER_POPULATION: f64 = 10_000.0;

// =============================================================================
// STATUS THRESHOLDS (fixed, not configurable)
// =============================================================================

/// Scores strictly above this are Critical.
pub const CRITICAL_THRESHOLD: f64 = 0.70;

/// Scores strictly above this (and not Critical) are Warning.
pub const WARNING_THRESHOLD: f64 = 0.45;

// =============================================================================
// INSIGHT THRESHOLDS
// =============================================================================

/// Rejection rates strictly above this trigger a device-audit finding.
pub const HIGH_REJECTION_RATE: f64 = 0.08;

// =============================================================================
// CAPACITY PROJECTION
// =============================================================================

/// Annual population growth factor used for census projection.
pub const ANNUAL_GROWTH_FACTOR: f64 = 1.012;

/// Years between the 2011 census and the 2025 projection.
pub const PROJECTION_YEARS: i32 = 14;

/// Default number of residents served by one enrollment center.
pub const DEFAULT_PEOPLE_PER_CENTER: f64 = 20_000.0;

// =============================================================================
// WEIGHT VALIDATION
// =============================================================================

/// Allowed deviation of a weight set's sum from exactly 1.0.
///
/// Absorbs binary rounding of decimal weights such as 0.35 + 0.15.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;
