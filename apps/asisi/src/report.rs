//! # Report Rendering
//!
//! Turns a scored batch into the text or JSON report printed by `asisi score`.

use asisi_core::{AsisiError, Exclusion, Insight, ScoredBatch, Status, derive_insights};
use serde::{Deserialize, Serialize};

/// One ranked row of the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub rank: usize,
    pub region: String,
    pub weighted_load: f64,
    pub rejection_rate: f64,
    pub recovery_slope: f64,
    pub centers_per_10k: f64,
    pub score: f64,
    pub status: Status,
}

/// Status counts over the whole batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub critical: usize,
    pub warning: usize,
    pub stable: usize,
    pub excluded: usize,
}

/// The full report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub weights_version: String,
    pub summary: StatusSummary,
    pub regions: Vec<ReportRow>,
    pub insights: Vec<Insight>,
    pub excluded: Vec<Exclusion>,
}

impl Report {
    /// Build a report, keeping at most `top` rows when given.
    ///
    /// The summary and insights always cover the whole batch.
    #[must_use]
    pub fn from_batch(batch: &ScoredBatch, top: Option<usize>) -> Self {
        let regions = batch
            .ranked()
            .into_iter()
            .take(top.unwrap_or(usize::MAX))
            .enumerate()
            .map(|(i, r)| ReportRow {
                rank: i + 1,
                region: r.region().to_string(),
                weighted_load: r.metrics.weighted_load,
                rejection_rate: r.metrics.rejection_rate,
                recovery_slope: r.metrics.recovery_slope,
                centers_per_10k: r.metrics.centers_per_10k,
                score: r.score,
                status: r.status,
            })
            .collect();

        Self {
            weights_version: batch.weights_version.clone(),
            summary: StatusSummary {
                critical: batch.count(Status::Critical),
                warning: batch.count(Status::Warning),
                stable: batch.count(Status::Stable),
                excluded: batch.excluded.len(),
            },
            regions,
            insights: derive_insights(&batch.regions),
            excluded: batch.excluded.clone(),
        }
    }

    /// Render as pretty JSON.
    pub fn to_json(&self) -> Result<String, AsisiError> {
        serde_json::to_string_pretty(self).map_err(|e| AsisiError::Parse(e.to_string()))
    }

    /// Render as a plain-text report.
    #[must_use]
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        out.push_str("ASISI Stress Report\n");
        out.push_str("===================\n");
        out.push_str(&format!("Weights: {}\n", self.weights_version));
        out.push_str(&format!(
            "Critical: {}  Warning: {}  Stable: {}  Excluded: {}\n\n",
            self.summary.critical, self.summary.warning, self.summary.stable, self.summary.excluded
        ));

        out.push_str(&format!(
            "{:>4}  {:<24} {:>12} {:>9} {:>10} {:>9} {:>7}  {}\n",
            "#", "Region", "Load", "Reject%", "Slope", "Ctr/10k", "Score", "Status"
        ));
        for row in &self.regions {
            out.push_str(&format!(
                "{:>4}  {:<24} {:>12.1} {:>9.2} {:>10.2} {:>9.3} {:>7.3}  {}\n",
                row.rank,
                truncate(&row.region, 24),
                row.weighted_load,
                row.rejection_rate * 100.0,
                row.recovery_slope,
                row.centers_per_10k,
                row.score,
                row.status
            ));
        }

        out.push_str("\nActionable Insights\n");
        out.push_str("-------------------\n");
        if self.insights.is_empty() {
            out.push_str("No districts are currently in Critical state.\n");
        }
        for insight in &self.insights {
            out.push_str(&format!(
                "ALERT: {} is CRITICAL (score {:.3})\n",
                insight.region, insight.score
            ));
            for finding in &insight.findings {
                out.push_str(&format!("  -> {}\n", finding.describe()));
            }
        }

        if !self.excluded.is_empty() {
            out.push_str("\nExcluded\n");
            out.push_str("--------\n");
            for exclusion in &self.excluded {
                out.push_str(&format!("  {}: {}\n", exclusion.region, exclusion.reason));
            }
        }

        out
    }
}

fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut cut: String = s.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

// =============================================================================
// TESTS
// =============================================================================
