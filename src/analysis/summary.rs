//! Batch-level statistics.

use serde::{Deserialize, Serialize};

use crate::record::{AnalysisResult, Side};

/// Aggregate view of one scored batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatistics {
    /// Subjects scored.
    pub total_subjects: usize,
    /// Subjects whose best side has positive EV.
    pub profitable_opportunities: usize,
    /// profitable / total, 0 for an empty batch.
    pub profitability_rate: f64,
    /// Highest `best_ev`.
    pub best_ev: f64,
    /// Lowest `best_ev`.
    pub worst_ev: f64,
    /// Mean `best_ev`.
    pub mean_ev: f64,
    /// Recommendations for the over side.
    pub above_count: usize,
    /// Recommendations for the under side.
    pub at_or_below_count: usize,
    /// Mean historical rate.
    pub mean_rate: f64,
    /// Mean line.
    pub mean_line: f64,
}

/// Summarize scored results. An empty slice yields zeroed statistics.
pub fn summarize(results: &[AnalysisResult]) -> BatchStatistics {
    if results.is_empty() {
        return BatchStatistics::default();
    }

    let total = results.len();
    let count = total as f64;
    let profitable = results.iter().filter(|r| r.is_profitable).count();
    let above = results.iter().filter(|r| r.best_side == Side::Above).count();

    let best_ev = results
        .iter()
        .map(|r| r.best_ev)
        .fold(f64::NEG_INFINITY, f64::max);
    let worst_ev = results
        .iter()
        .map(|r| r.best_ev)
        .fold(f64::INFINITY, f64::min);

    BatchStatistics {
        total_subjects: total,
        profitable_opportunities: profitable,
        profitability_rate: profitable as f64 / count,
        best_ev,
        worst_ev,
        mean_ev: results.iter().map(|r| r.best_ev).sum::<f64>() / count,
        above_count: above,
        at_or_below_count: total - above,
        mean_rate: results.iter().map(|r| r.rate).sum::<f64>() / count,
        mean_line: results.iter().map(|r| r.line).sum::<f64>() / count,
    }
}
