//! # Normalization Module
//!
//! Batch-relative min-max scaling.
//!
//! A normalized value only has meaning relative to the batch it was computed
//! in. Adding or removing a region changes the normalized value of every
//! other region.

/// Scale `values` into `[0, 1]` with `(v - min) / (max - min)`.
///
/// If every value is equal there is no variance to scale, and every element
/// maps to 0. An empty batch yields an empty result. Output never holds NaN:
/// a value that cannot be placed (non-finite input) maps to 0.
#[must_use]
pub fn normalize_batch(values: &[f64]) -> Vec<f64> {
    let Some((min, max)) = bounds(values) else {
        return Vec::new();
    };

    let range = max - min;
    if range.is_infinite() && min.is_finite() && max.is_finite() {
        // The span exceeds f64. Halving is exact and leaves the ratios intact.
        let halved: Vec<f64> = values.iter().map(|v| v * 0.5).collect();
        return normalize_batch(&halved);
    }

    if range > 0.0 {
        values.iter().map(|v| unit((v - min) / range)).collect()
    } else {
        vec![0.0; values.len()]
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

/// Normalize, then flip so that the smallest input scores highest.
#[must_use]
pub fn normalize_inverted(values: &[f64]) -> Vec<f64> {
    normalize_batch(values).into_iter().map(|v| 1.0 - v).collect()
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

// =============================================================================
// TESTS
// =============================================================================
