//! # Property-Based Tests
//!
//! Range, invariance and determinism properties of the stress index.

use asisi_core::{
    DerivedMetrics, RegionRecord, SeededNoise, StressCalculator, StressWeights,
    compute_recovery_slope, normalize_batch,
};
use proptest::collection::vec;
use proptest::prelude::*;

fn region(
    name: String,
    volumes: [f64; 4],
    households: (f64, f64),
    centers: u32,
    history: Vec<f64>,
) -> RegionRecord {
    RegionRecord {
        enrollment_volume: volumes[0],
        demo_update_volume: volumes[1],
        bio_update_volume: volumes[2],
        auth_volume: volumes[3],
        rural_households: households.0,
        urban_households: households.1,
        population_2025: 250_000.0,
        estimated_centers: f64::from(centers),
        history_7_days: history,
        ..RegionRecord::named(name)
    }
}

fn arb_region() -> impl Strategy<Value = RegionRecord> {
    (
        "[a-z]{3,12}",
        (0.0f64..10_000.0, 0.0f64..10_000.0, 0.0f64..10_000.0, 0.0f64..50_000.0),
        (1.0f64..500_000.0, 0.0f64..500_000.0),
        1u32..200,
        vec(0.0f64..20_000.0, 7),
    )
        .prop_map(|(name, (enroll, demo, bio, auth), households, centers, history)| {
            region(name, [enroll, demo, bio, auth], households, centers, history)
        })
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Normalized values always lie in [0, 1] and never NaN.
    #[test]
    fn normalize_stays_in_unit_interval(values in vec(-1e6f64..1e6, 0..64)) {
        let normalized = normalize_batch(&values);

        prop_assert_eq!(normalized.len(), values.len());
        for v in normalized {
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }

    /// Positive affine rescaling does not change normalized values.
    #[test]
    fn normalize_is_affine_invariant(
        values in vec(-1000.0f64..1000.0, 2..32),
        scale in 0.5f64..100.0,
        shift in -500.0f64..500.0
    ) {
        let rescaled: Vec<f64> = values.iter().map(|v| v * scale + shift).collect();

        let a = normalize_batch(&values);
        let b = normalize_batch(&rescaled);

        for (x, y) in a.iter().zip(&b) {
            prop_assert!((x - y).abs() < 1e-6);
        }
    }

    /// A constant series never normalizes to anything but zero.
    #[test]
    fn constant_series_normalizes_to_zero(value in -1e6f64..1e6, len in 1usize..32) {
        let normalized = normalize_batch(&vec![value; len]);
        prop_assert!(normalized.iter().all(|v| *v == 0.0));
    }

    /// A perfectly linear history recovers its step as the slope.
    #[test]
    fn linear_history_slope_is_its_step(start in 0.0f64..10_000.0, step in -100.0f64..100.0) {
        // Keep the last sample positive.
        let expected = step.max(-start / 7.0);
        let history: Vec<f64> = (0..7).map(|d| start + expected * d as f64).collect();

        let slope = compute_recovery_slope("P", &history).expect("slope");
        prop_assert!((slope - expected).abs() < 1e-6);
    }

    /// Composite scores lie in [0, 1] for any valid batch.
    #[test]
    fn composite_score_is_bounded(records in vec(arb_region(), 1..24), seed in any::<u64>()) {
        let batch = StressCalculator::new().score_batch(&records, &mut SeededNoise::new(seed));

        prop_assert_eq!(batch.regions.len() + batch.excluded.len(), records.len());
        for scored in &batch.regions {
            prop_assert!((0.0..=1.0).contains(&scored.score));
            prop_assert!(scored.metrics.rejection_rate >= 0.03);
            prop_assert!(scored.metrics.rejection_rate < 0.10);
        }
    }

    /// The same seed over the same batch yields identical output.
    #[test]
    fn scoring_is_deterministic(records in vec(arb_region(), 1..16), seed in any::<u64>()) {
        let calculator = StressCalculator::new();

        let first = calculator.score_batch(&records, &mut SeededNoise::new(seed));
        let second = calculator.score_batch(&records, &mut SeededNoise::new(seed));

        prop_assert_eq!(first, second);
    }

    /// Any valid convex weight set keeps scores in [0, 1].
    #[test]
    fn custom_weights_keep_scores_bounded(
        raw in (0.0f64..1.0, 0.0f64..1.0, 0.0f64..1.0, 0.01f64..1.0),
        metrics in vec((0.0f64..1e5, 0.03f64..0.1, -500.0f64..500.0, 0.01f64..20.0), 1..16)
    ) {
        let (a, b, c, d) = raw;
        let total = a + b + c + d;
        let weights = StressWeights {
            version: "prop".to_string(),
            load: a / total,
            quality: b / total,
            resilience: c / total,
            saturation: 1.0 - (a + b + c) / total,
        };
        prop_assume!(weights.validate().is_ok());

        let calculator = StressCalculator::new().with_weights(weights).expect("weights");
        let derived: Vec<DerivedMetrics> = metrics
            .into_iter()
            .enumerate()
            .map(|(i, (load, rate, slope, density))| DerivedMetrics {
                region: format!("r{}", i),
                weighted_load: load,
                rejection_rate: rate,
                recovery_slope: slope,
                centers_per_10k: density,
            })
            .collect();

        for scored in calculator.score_metrics(derived) {
            prop_assert!((0.0..=1.0).contains(&scored.score));
        }
    }
}
