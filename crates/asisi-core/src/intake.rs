//! # Intake Module
//!
//! Precondition checks for region records entering a batch.
//!
//! - Validate records before any metric is derived
//! - Reject malformed input with the field that caused it
//! - No repair or inference: a bad record is excluded, never patched

use crate::primitives::HISTORY_DAYS;
use crate::{AsisiError, RegionRecord};

/// The Intake checks that a record is fit for scoring.
pub struct Intake;

impl Intake {
    /// Validate a record.
    ///
    /// A record is valid if:
    /// - All volume and household counters are finite and non-negative
    /// - `estimated_centers` is a positive whole number
    /// - `history_7_days` holds exactly seven finite, non-negative samples
    ///
    /// Denominator checks (`rural + urban`, `population_2025`) are left to the
    /// metric functions, since a configured fallback may legitimately cover
    /// them.
    pub fn validate(record: &RegionRecord) -> Result<(), AsisiError> {
        let counters: [(&'static str, f64); 6] = [
            ("enrollment_volume", record.enrollment_volume),
            ("demo_update_volume", record.demo_update_volume),
            ("bio_update_volume", record.bio_update_volume),
            ("auth_volume", record.auth_volume),
            ("rural_households", record.rural_households),
            ("urban_households", record.urban_households),
        ];

        for (field, value) in counters {
            Self::check_count(&record.name, field, value)?;
        }

        if !record.population_2025.is_finite() {
            return Err(AsisiError::InvalidInput {
                region: record.name.clone(),
                field: "population_2025",
                reason: "is not a finite number".to_string(),
            });
        }

        Self::check_count(&record.name, "estimated_centers", record.estimated_centers)?;
        if record.estimated_centers <= 0.0 {
            return Err(AsisiError::InvalidInput {
                region: record.name.clone(),
                field: "estimated_centers",
                reason: "must be positive".to_string(),
            });
        }
        if record.estimated_centers.fract() != 0.0 {
            return Err(AsisiError::InvalidInput {
                region: record.name.clone(),
                field: "estimated_centers",
                reason: format!("must be a whole number, got {}", record.estimated_centers),
            });
        }

        Self::validate_history(&record.name, &record.history_7_days)
    }

    /// Validate a recovery history on its own.
    pub fn validate_history(region: &str, history: &[f64]) -> Result<(), AsisiError> {
        if history.len() != HISTORY_DAYS {
            return Err(AsisiError::MalformedHistory {
                region: region.to_string(),
                reason: format!(
                    "expected {} samples, found {}",
                    HISTORY_DAYS,
                    history.len()
                ),
            });
        }

        if let Some((day, sample)) = history
            .iter()
            .enumerate()
            .find(|(_, s)| !s.is_finite() || **s < 0.0)
        {
            return Err(AsisiError::MalformedHistory {
                region: region.to_string(),
                reason: format!("sample {} on day {} is not a non-negative number", sample, day),
            });
        }

        Ok(())
    }

    fn check_count(region: &str, field: &'static str, value: f64) -> Result<(), AsisiError> {
        if !value.is_finite() {
            return Err(AsisiError::InvalidInput {
                region: region.to_string(),
                field,
                reason: "is not a finite number".to_string(),
            });
        }

        if value < 0.0 {
            return Err(AsisiError::InvalidInput {
                region: region.to_string(),
                field,
                reason: format!("is negative ({})", value),
            });
        }

        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
