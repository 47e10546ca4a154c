//! # asisi-core
//!
//! The deterministic Stress Index Calculator for ASISI - THE LOGIC.
//!
//! For a batch of districts, this crate derives four raw metrics per region
//! (weighted load, rejection rate, recovery slope, center density),
//! normalizes each across the batch, blends them with a versioned weight set
//! and maps the composite score to a three-tier [`Status`].
//!
//! ## Architectural Constraints
//!
//! - Pure computation: no I/O, no logging, no async
//! - Deterministic: randomness only enters through an injected [`NoiseSource`]
//! - Batch-relative: scores are only comparable within one batch
//! - Per-record failures exclude the record; they never abort a batch

// =============================================================================
// MODULES
// =============================================================================

pub mod insights;
pub mod intake;
pub mod metrics;
pub mod noise;
pub mod normalize;
pub mod primitives;
pub mod projection;
pub mod scoring;
pub mod types;
pub mod weights;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AsisiError, DerivedMetrics, Exclusion, RegionKey, RegionRecord, ScoredRegion, Status,
    StressComponents,
};

// =============================================================================
// RE-EXPORTS: Calculator
// =============================================================================

pub use insights::{Finding, Insight, derive_insights};
pub use intake::Intake;
pub use metrics::{
    compute_centers_per_10k, compute_recovery_slope, compute_rejection_rate,
    compute_weighted_load,
};
pub use noise::{FixedNoise, NoiseSource, SeededNoise, ZeroNoise};
pub use normalize::normalize_batch;
pub use projection::{estimate_centers, project_population};
pub use scoring::{ScoredBatch, StressCalculator, compute_composite_score};
pub use weights::{CANONICAL_VERSION, StressWeights};
