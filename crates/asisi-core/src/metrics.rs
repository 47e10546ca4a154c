//! # Metrics Module
//!
//! Per-region derivations feeding the stress index.
//!
//! Each function looks at a single record and has no cross-region
//! dependency, so the four metrics of a batch can be derived in any order.
//! Normalization happens later, over the whole batch.

use crate::intake::Intake;
use crate::noise::NoiseSource;
use crate::primitives::{
    AUTH_COST, BASE_REJECTION_RATE, BIO_UPDATE_COST, DEMO_UPDATE_COST, ENROLLMENT_COST,
    PER_POPULATION, REJECTION_NOISE_SPAN, RURAL_REJECTION_PENALTY,
};
use crate::{AsisiError, RegionRecord};

/// Volume pressure, weighting each transaction kind by its processing cost.
///
/// `1.0*enrollment + 0.8*demo + 0.8*bio + 0.1*auth`
#[must_use]
pub fn compute_weighted_load(region: &RegionRecord) -> f64 {
    ENROLLMENT_COST * region.enrollment_volume
        + DEMO_UPDATE_COST * region.demo_update_volume
        + BIO_UPDATE_COST * region.bio_update_volume
        + AUTH_COST * region.auth_volume
}

/// Share of rural households.
///
/// When the region reports no households at all, `fallback` is used if
/// given; otherwise the ratio is undefined.
pub fn rural_ratio(region: &RegionRecord, fallback: Option<f64>) -> Result<f64, AsisiError> {
    let total = region.rural_households + region.urban_households;

    if total > 0.0 {
        return Ok(region.rural_households / total);
    }

    fallback.ok_or_else(|| AsisiError::InvalidDenominator {
        region: region.name.clone(),
        field: "rural_households + urban_households",
    })
}

/// Estimated biometric rejection rate.
///
/// `0.03 + 0.05 * rural_ratio + noise`, where `noise` is one unit sample
/// from `noise` scaled into `[0, 0.02)`. Exactly one sample is drawn per
/// successful call.
pub fn compute_rejection_rate(
    region: &RegionRecord,
    noise: &mut dyn NoiseSource,
    fallback_ratio: Option<f64>,
) -> Result<f64, AsisiError> {
    let ratio = rural_ratio(region, fallback_ratio)?;
    let perturbation = REJECTION_NOISE_SPAN * noise.next_unit();

    Ok(BASE_REJECTION_RATE + RURAL_REJECTION_PENALTY * ratio + perturbation)
}

/// Slope of the ordinary least-squares line through `(day, load)`.
///
/// Positive means the backlog is growing, negative means it is clearing.
/// The history must hold exactly seven non-negative samples.
pub fn compute_recovery_slope(region: &str, history: &[f64]) -> Result<f64, AsisiError> {
    Intake::validate_history(region, history)?;
    Ok(least_squares_slope(history))
}

/// OLS slope of `samples` against their index.
///
/// Uses the centered form, so a constant series yields exactly 0 and a
/// perfectly linear integer series yields its exact step.
pub(crate) fn least_squares_slope(samples: &[f64]) -> f64 {
    let n = samples.len() as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = samples.iter().sum::<f64>() / n;

    let (covariance, variance) = samples.iter().enumerate().fold(
        (0.0_f64, 0.0_f64),
        |(cov, var), (day, load)| {
            let dx = day as f64 - mean_x;
            (cov + dx * (load - mean_y), var + dx * dx)
        },
    );

    if variance > 0.0 {
        covariance / variance
    } else {
        0.0
    }
}

/// Enrollment centers per 10 000 residents.
pub fn compute_centers_per_10k(region: &RegionRecord) -> Result<f64, AsisiError> {
    if region.population_2025.is_nan() || region.population_2025 <= 0.0 {
        return Err(AsisiError::InvalidDenominator {
            region: region.name.clone(),
            field: "population_2025",
        });
    }

    Ok(region.estimated_centers / region.population_2025 * PER_POPULATION)
}

// =============================================================================
// TESTS
// =============================================================================
