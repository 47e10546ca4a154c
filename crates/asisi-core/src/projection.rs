//! # Capacity Projection
//!
//! Supply-side estimates for districts that only report census figures.
//!
//! - Population is projected from the 2011 census at a fixed annual growth
//! - Enrollment centers are estimated from a people-per-center ratio
//!
//! Both results are truncated to whole numbers.

use crate::AsisiError;
use crate::primitives::{ANNUAL_GROWTH_FACTOR, PROJECTION_YEARS};

/// Project a 2011 census population to 2025.
///
/// `trunc(pop_2011 * 1.012^14)`
#[must_use]
pub fn project_population(population_2011: f64) -> f64 {
    (population_2011 * ANNUAL_GROWTH_FACTOR.powi(PROJECTION_YEARS)).trunc()
}

/// Estimate the number of enrollment centers serving `population`.
///
/// Fails with `InvalidInput` when `people_per_center` is not positive.
/// Saturates at `u32::MAX`.
pub fn estimate_centers(
    region: &str,
    population: f64,
    people_per_center: f64,
) -> Result<u32, AsisiError> {
    if !people_per_center.is_finite() || people_per_center <= 0.0 {
        return Err(AsisiError::InvalidInput {
            region: region.to_string(),
            field: "people_per_center",
            reason: format!("must be positive, got {}", people_per_center),
        });
    }

    if !population.is_finite() || population < 0.0 {
        return Err(AsisiError::InvalidInput {
            region: region.to_string(),
            field: "population",
            reason: format!("must be a non-negative number, got {}", population),
        });
    }

    // `as` saturates for out-of-range floats.
    Ok((population / people_per_center).trunc() as u32)
}

// =============================================================================
// TESTS
// =============================================================================
