//! # Insights Module
//!
//! Actionable findings for Critical regions.
//!
//! A Critical score says a region is under stress, not why. The findings
//! point at the two causes an operator can act on:
//! - a growing backlog (positive recovery slope): open emergency capacity
//! - a high rejection rate: audit registrar devices

use serde::{Deserialize, Serialize};

use crate::primitives::HIGH_REJECTION_RATE;
use crate::{ScoredRegion, Status};

/// One finding on a Critical region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// The backlog grew over the last week.
    BacklogGrowing { slope: f64 },
    /// The rejection rate is above the audit threshold.
    HighRejection { rate: f64 },
}

impl Finding {
    /// Human-readable recommendation.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Finding::BacklogGrowing { slope } => format!(
                "Backlog is growing (slope: {:.2}). Open emergency centers.",
                slope
            ),
            Finding::HighRejection { rate } => format!(
                "High rejection rate ({:.1}%). Audit registrar devices.",
                rate * 100.0
            ),
        }
    }
}

/// Findings for one Critical region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub region: String,
    pub score: f64,
    pub findings: Vec<Finding>,
}

/// Collect insights for every Critical region, highest score first.
///
/// A Critical region with neither finding still gets an entry with an empty
/// finding list.
#[must_use]
pub fn derive_insights(regions: &[ScoredRegion]) -> Vec<Insight> {
    let mut insights: Vec<Insight> = regions
        .iter()
        .filter(|r| r.status == Status::Critical)
        .map(|r| {
            let mut findings = Vec::new();
            if r.metrics.recovery_slope > 0.0 {
                findings.push(Finding::BacklogGrowing {
                    slope: r.metrics.recovery_slope,
                });
            }
            if r.metrics.rejection_rate > HIGH_REJECTION_RATE {
                findings.push(Finding::HighRejection {
                    rate: r.metrics.rejection_rate,
                });
            }
            Insight {
                region: r.region().to_string(),
                score: r.score,
                findings,
            }
        })
        .collect();

    insights.sort_by(|a, b| b.score.total_cmp(&a.score));
    insights
}

// =============================================================================
// TESTS
// =============================================================================
