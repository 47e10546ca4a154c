//! # Scoring Module
//!
//! The batch driver of the stress index.
//!
//! Pipeline for one batch:
//!
//! ```text
//! records ──► Intake ──► derive (load, rejection, slope, density) ──┐
//!                │                                                  │
//!                └──► Exclusion (per-record error)                  ▼
//!                                             normalize (whole batch)
//!                                                                   │
//!                                          blend (weights) ──► Status
//! ```
//!
//! Normalization is a whole-batch reduction, so every region is derived
//! before any region is scored. Excluded records never take part in
//! normalization.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::intake::Intake;
use crate::metrics::{
    compute_centers_per_10k, compute_rejection_rate, compute_weighted_load, least_squares_slope,
};
use crate::noise::{NoiseSource, ZeroNoise};
use crate::normalize::{normalize_batch, normalize_inverted};
use crate::weights::StressWeights;
use crate::{
    AsisiError, DerivedMetrics, Exclusion, RegionRecord, ScoredRegion, Status, StressComponents,
};

// =============================================================================
// SCORED BATCH
// =============================================================================

/// Result of scoring one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredBatch {
    /// Version of the weight set the scores were blended with.
    pub weights_version: String,
    /// Scored regions, in input order.
    pub regions: Vec<ScoredRegion>,
    /// Records left out, in input order.
    pub excluded: Vec<Exclusion>,
}

impl ScoredBatch {
    /// Regions sorted by descending score.
    ///
    /// Ties keep input order.
    #[must_use]
    pub fn ranked(&self) -> Vec<&ScoredRegion> {
        let mut ranked: Vec<&ScoredRegion> = self.regions.iter().collect();
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked
    }

    /// Number of scored regions with the given status.
    #[must_use]
    pub fn count(&self, status: Status) -> usize {
        self.regions.iter().filter(|r| r.status == status).count()
    }

    /// Look up a scored region by display name.
    #[must_use]
    pub fn get(&self, region: &str) -> Option<&ScoredRegion> {
        self.regions.iter().find(|r| r.region() == region)
    }
}

// =============================================================================
// STRESS CALCULATOR
// =============================================================================

/// Stress Calculator: derives, normalizes and blends a batch of regions.
#[derive(Debug, Clone, Default)]
pub struct StressCalculator {
    weights: StressWeights,
    fallback_rural_ratio: Option<f64>,
}

impl StressCalculator {
    /// Create a calculator with the canonical weights and no rural fallback.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom weight set. The set is validated first.
    pub fn with_weights(mut self, weights: StressWeights) -> Result<Self, AsisiError> {
        weights.validate()?;
        self.weights = weights;
        Ok(self)
    }

    /// Substitute `ratio` as the rural share of regions with no households.
    ///
    /// Without a fallback such regions are excluded.
    pub fn with_fallback_rural_ratio(mut self, ratio: f64) -> Result<Self, AsisiError> {
        if !(0.0..=1.0).contains(&ratio) {
            return Err(AsisiError::Config(format!(
                "fallback rural ratio must lie in [0, 1], got {}",
                ratio
            )));
        }
        self.fallback_rural_ratio = Some(ratio);
        Ok(self)
    }

    /// The active weight set.
    #[must_use]
    pub fn weights(&self) -> &StressWeights {
        &self.weights
    }

    /// The configured rural fallback, if any.
    #[must_use]
    pub fn fallback_rural_ratio(&self) -> Option<f64> {
        self.fallback_rural_ratio
    }

    /// Derive the four raw metrics of one record.
    ///
    /// The noise sample is drawn last, so a record that fails any check
    /// consumes no noise. Finite counters can still overflow a metric; such a
    /// record is rejected rather than poisoning the batch normalization.
    pub fn derive(
        &self,
        record: &RegionRecord,
        noise: &mut dyn NoiseSource,
    ) -> Result<DerivedMetrics, AsisiError> {
        Intake::validate(record)?;

        let recovery_slope = least_squares_slope(&record.history_7_days);
        let centers_per_10k = compute_centers_per_10k(record)?;
        let weighted_load = compute_weighted_load(record);

        let derived = [
            ("weighted_load", weighted_load),
            ("recovery_slope", recovery_slope),
            ("centers_per_10k", centers_per_10k),
        ];
        for (field, value) in derived {
            if !value.is_finite() {
                return Err(AsisiError::InvalidInput {
                    region: record.name.clone(),
                    field,
                    reason: "overflows to a non-finite value".to_string(),
                });
            }
        }

        let rejection_rate = compute_rejection_rate(record, noise, self.fallback_rural_ratio)?;

        Ok(DerivedMetrics {
            region: record.name.clone(),
            weighted_load,
            rejection_rate,
            recovery_slope,
            centers_per_10k,
        })
    }

    /// Score a batch of raw records.
    ///
    /// Records that violate a precondition, or repeat the match key of an
    /// earlier scorable record, are excluded and reported; the rest are
    /// scored relative to each other.
    pub fn score_batch(
        &self,
        records: &[RegionRecord],
        noise: &mut dyn NoiseSource,
    ) -> ScoredBatch {
        let (derived, excluded) = self.derive_batch(records, noise);

        ScoredBatch {
            weights_version: self.weights.version.clone(),
            regions: self.score_metrics(derived),
            excluded,
        }
    }

    /// Apply the exclusion rules of [`score_batch`](Self::score_batch)
    /// without scoring. Returns the records that would be excluded.
    #[must_use]
    pub fn check_batch(&self, records: &[RegionRecord]) -> Vec<Exclusion> {
        self.derive_batch(records, &mut ZeroNoise).1
    }

    /// Derive every record, splitting the batch into metrics and exclusions.
    ///
    /// A key is only claimed once its record derives, so an invalid record
    /// never shadows a later valid one.
    fn derive_batch(
        &self,
        records: &[RegionRecord],
        noise: &mut dyn NoiseSource,
    ) -> (Vec<DerivedMetrics>, Vec<Exclusion>) {
        let mut seen = BTreeSet::new();
        let mut derived = Vec::with_capacity(records.len());
        let mut excluded = Vec::new();

        for record in records {
            let key = record.match_key();
            if seen.contains(&key) {
                excluded.push(Exclusion {
                    region: record.name.clone(),
                    reason: format!("duplicate region key '{}'", key),
                });
                continue;
            }

            match self.derive(record, noise) {
                Ok(metrics) => {
                    seen.insert(key);
                    derived.push(metrics);
                }
                Err(e) => excluded.push(Exclusion {
                    region: record.name.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        (derived, excluded)
    }

    /// Normalize and blend already-derived metrics.
    #[must_use]
    pub fn score_metrics(&self, metrics: Vec<DerivedMetrics>) -> Vec<ScoredRegion> {
        let series = |f: fn(&DerivedMetrics) -> f64| metrics.iter().map(f).collect::<Vec<_>>();

        let load = normalize_batch(&series(|m| m.weighted_load));
        let quality = normalize_batch(&series(|m| m.rejection_rate));
        let resilience = normalize_batch(&series(|m| m.recovery_slope));
        let saturation = normalize_inverted(&series(|m| m.centers_per_10k));

        metrics
            .into_iter()
            .enumerate()
            .map(|(i, metrics)| {
                let components = StressComponents {
                    load: load[i],
                    quality: quality[i],
                    resilience: resilience[i],
                    saturation: saturation[i],
                };
                let score = self.weights.blend(&components).clamp(0.0, 1.0);

                ScoredRegion {
                    metrics,
                    components,
                    score,
                    status: Status::from_score(score),
                }
            })
            .collect()
    }
}

/// Score a batch with the canonical weights and no rural fallback.
pub fn compute_composite_score(
    records: &[RegionRecord],
    noise: &mut dyn NoiseSource,
) -> ScoredBatch {
    StressCalculator::new().score_batch(records, noise)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{SeededNoise, ZeroNoise};

    fn record(name: &str, load: f64, rural: f64, history_step: f64, centers: u32) -> RegionRecord {
        RegionRecord {
            enrollment_volume: load,
            rural_households: rural,
            urban_households: 100.0 - rural,
            population_2025: 100_000.0,
            estimated_centers: f64::from(centers),
            history_7_days: (0..7).map(|d| 500.0 + history_step * d as f64).collect(),
            ..RegionRecord::named(name)
        }
    }

    fn metrics(name: &str, load: f64, rate: f64, slope: f64, density: f64) -> DerivedMetrics {
        DerivedMetrics {
            region: name.to_string(),
            weighted_load: load,
            rejection_rate: rate,
            recovery_slope: slope,
            centers_per_10k: density,
        }
    }

    #[test]
    fn two_region_extremes() {
        let calculator = StressCalculator::new();
        let scored = calculator.score_metrics(vec![
            metrics("A", 1000.0, 0.03, -5.0, 5.0),
            metrics("B", 9000.0, 0.09, 20.0, 1.0),
        ]);

        assert!(scored[0].score.abs() < 1e-12);
        assert_eq!(scored[0].status, Status::Stable);
        assert_eq!(scored[0].components, StressComponents::default());

        assert!((scored[1].score - 1.0).abs() < 1e-12);
        assert_eq!(scored[1].status, Status::Critical);
    }

    #[test]
    fn derive_computes_all_metrics() {
        let calculator = StressCalculator::new();
        let derived = calculator
            .derive(&record("A", 100.0, 50.0, 10.0, 20), &mut ZeroNoise)
            .expect("derive");

        assert!((derived.weighted_load - 100.0).abs() < 1e-12);
        assert!((derived.rejection_rate - 0.055).abs() < 1e-12);
        assert!((derived.recovery_slope - 10.0).abs() < 1e-9);
        assert!((derived.centers_per_10k - 2.0).abs() < 1e-12);
    }

    #[test]
    fn invalid_record_is_excluded_not_fatal() {
        let mut broken = record("Broken", 100.0, 50.0, 0.0, 10);
        broken.history_7_days.pop();

        let batch = StressCalculator::new().score_batch(
            &[
                record("A", 100.0, 10.0, -3.0, 30),
                broken,
                record("B", 900.0, 90.0, 8.0, 5),
            ],
            &mut ZeroNoise,
        );

        assert_eq!(batch.regions.len(), 2);
        assert_eq!(batch.excluded.len(), 1);
        assert_eq!(batch.excluded[0].region, "Broken");
        assert!(batch.excluded[0].reason.contains("Malformed history"));
    }

    #[test]
    fn duplicate_keys_are_excluded() {
        let batch = StressCalculator::new().score_batch(
            &[
                record("Patna", 100.0, 10.0, 0.0, 10),
                record(" PATNA ", 200.0, 10.0, 0.0, 10),
            ],
            &mut ZeroNoise,
        );

        assert_eq!(batch.regions.len(), 1);
        assert_eq!(batch.excluded.len(), 1);
        assert!(batch.excluded[0].reason.contains("duplicate"));
    }

    #[test]
    fn invalid_record_does_not_claim_its_key() {
        let mut broken = record("Patna", 100.0, 10.0, 0.0, 10);
        broken.history_7_days.pop();

        let batch = StressCalculator::new().score_batch(
            &[
                broken,
                record("patna", 200.0, 10.0, 0.0, 10),
                record("Gaya", 300.0, 20.0, 1.0, 10),
            ],
            &mut ZeroNoise,
        );

        assert!(batch.get("patna").is_some());
        assert!(batch.get("Gaya").is_some());
        assert_eq!(batch.excluded.len(), 1);
        assert_eq!(batch.excluded[0].region, "Patna");
        assert!(batch.excluded[0].reason.contains("Malformed history"));
    }

    #[test]
    fn duplicate_of_scored_record_consumes_no_noise() {
        let records = [
            record("A", 100.0, 10.0, 0.0, 10),
            record("a", 100.0, 10.0, 0.0, 10),
            record("B", 900.0, 90.0, 5.0, 3),
        ];

        let with_duplicate =
            StressCalculator::new().score_batch(&records, &mut SeededNoise::new(9));
        let without_duplicate = StressCalculator::new()
            .score_batch(&[records[0].clone(), records[2].clone()], &mut SeededNoise::new(9));

        assert_eq!(with_duplicate.regions, without_duplicate.regions);
    }

    #[test]
    fn overflowing_metrics_are_excluded() {
        let huge = RegionRecord {
            enrollment_volume: 1e308,
            ..record("Huge", 0.0, 10.0, 0.0, 10)
        };
        let huge2 = RegionRecord {
            enrollment_volume: 1e308,
            demo_update_volume: 1e308,
            ..record("Huge2", 0.0, 10.0, 0.0, 10)
        };
        let tiny_population = RegionRecord {
            population_2025: 1e-320,
            ..record("Tiny", 100.0, 10.0, 0.0, 10)
        };

        let batch = StressCalculator::new().score_batch(
            &[huge, huge2, tiny_population, record("Small", 10.0, 10.0, 0.0, 10)],
            &mut ZeroNoise,
        );

        assert_eq!(batch.regions.len(), 2);
        let excluded: Vec<&str> = batch.excluded.iter().map(|e| e.region.as_str()).collect();
        assert_eq!(excluded, vec!["Huge2", "Tiny"]);

        let huge = batch.get("Huge").expect("scored");
        assert!((huge.components.load - 1.0).abs() < 1e-12);
        for scored in &batch.regions {
            assert!((0.0..=1.0).contains(&scored.score));
        }
    }

    #[test]
    fn derive_reports_malformed_history_once() {
        let mut broken = record("Short", 100.0, 10.0, 0.0, 10);
        broken.history_7_days.truncate(3);

        let err = StressCalculator::new()
            .derive(&broken, &mut ZeroNoise)
            .expect_err("short history");
        assert!(matches!(err, AsisiError::MalformedHistory { .. }));
    }

    #[test]
    fn check_batch_matches_score_batch_exclusions() {
        let mut broken = record("Broken", 100.0, 10.0, 0.0, 10);
        broken.history_7_days.clear();
        let records = [
            record("Patna", 100.0, 10.0, 0.0, 10),
            record(" PATNA ", 200.0, 10.0, 0.0, 10),
            broken,
        ];

        let calculator = StressCalculator::new();
        let checked = calculator.check_batch(&records);
        let scored = calculator.score_batch(&records, &mut SeededNoise::new(3));

        assert_eq!(checked.len(), 2);
        assert_eq!(checked, scored.excluded);
        assert!(checked[0].reason.contains("duplicate"));
    }

    #[test]
    fn fallback_ratio_admits_empty_households() {
        let mut empty = record("Empty", 100.0, 0.0, 0.0, 10);
        empty.urban_households = 0.0;

        let strict = StressCalculator::new().score_batch(std::slice::from_ref(&empty), &mut ZeroNoise);
        assert_eq!(strict.excluded.len(), 1);

        let lenient = StressCalculator::new()
            .with_fallback_rural_ratio(0.5)
            .expect("ratio")
            .score_batch(&[empty], &mut ZeroNoise);
        assert_eq!(lenient.regions.len(), 1);
        assert!((lenient.regions[0].metrics.rejection_rate - 0.055).abs() < 1e-12);
    }

    #[test]
    fn fallback_ratio_must_be_a_share() {
        assert!(StressCalculator::new().with_fallback_rural_ratio(1.5).is_err());
        assert!(StressCalculator::new().with_fallback_rural_ratio(-0.1).is_err());
    }

    #[test]
    fn rejects_invalid_weights() {
        let weights = StressWeights {
            load: 0.9,
            ..StressWeights::canonical()
        };
        assert!(StressCalculator::new().with_weights(weights).is_err());
    }

    #[test]
    fn batch_carries_weight_version() {
        let weights = StressWeights::new("flat-v2", 0.25, 0.25, 0.25, 0.25).expect("weights");
        let batch = StressCalculator::new()
            .with_weights(weights)
            .expect("calculator")
            .score_batch(&[record("A", 1.0, 1.0, 0.0, 1)], &mut ZeroNoise);
        assert_eq!(batch.weights_version, "flat-v2");
    }

    #[test]
    fn seeded_runs_are_identical() {
        let records = vec![
            record("A", 100.0, 10.0, -3.0, 30),
            record("B", 900.0, 90.0, 8.0, 5),
            record("C", 400.0, 40.0, 1.0, 12),
        ];

        let first = compute_composite_score(&records, &mut SeededNoise::new(42));
        let second = compute_composite_score(&records, &mut SeededNoise::new(42));
        assert_eq!(first, second);
    }

    #[test]
    fn ranked_is_descending() {
        let batch = StressCalculator::new().score_batch(
            &[
                record("Low", 100.0, 10.0, -3.0, 30),
                record("High", 900.0, 90.0, 8.0, 5),
                record("Mid", 400.0, 40.0, 1.0, 12),
            ],
            &mut ZeroNoise,
        );

        let names: Vec<&str> = batch.ranked().iter().map(|r| r.region()).collect();
        assert_eq!(names, vec!["High", "Mid", "Low"]);
        assert_eq!(batch.count(Status::Critical), 1);
        assert!(batch.get("Mid").is_some());
    }

    #[test]
    fn single_region_batch_is_saturated_only() {
        let batch = StressCalculator::new()
            .score_batch(&[record("Solo", 100.0, 10.0, 0.0, 10)], &mut ZeroNoise);

        let solo = &batch.regions[0];
        assert!(solo.components.load.abs() < 1e-12);
        assert!((solo.components.saturation - 1.0).abs() < 1e-12);
        assert!((solo.score - 0.15).abs() < 1e-12);
        assert_eq!(solo.status, Status::Stable);
    }

    #[test]
    fn empty_batch_scores_nothing() {
        let batch = StressCalculator::new().score_batch(&[], &mut ZeroNoise);
        assert!(batch.regions.is_empty());
        assert!(batch.excluded.is_empty());
    }
}
