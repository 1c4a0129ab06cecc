//! Narrowing a ranked result list.

use crate::record::{AnalysisResult, Side};

/// Criteria for picking results out of a ranked list. Rank order is kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultFilter {
    /// Keep only positive-EV results.
    pub only_profitable: bool,
    /// Keep results with `best_ev >= min_ev`.
    pub min_ev: Option<f64>,
    /// Keep results recommending this side.
    pub side: Option<Side>,
    /// Keep at most this many results.
    pub limit: Option<usize>,
}

impl ResultFilter {
    /// Check a single result against every criterion except `limit`.
    pub fn matches(&self, result: &AnalysisResult) -> bool {
        if self.only_profitable && !result.is_profitable {
            return false;
        }
        if let Some(min_ev) = self.min_ev {
            if result.best_ev < min_ev {
                return false;
            }
        }
        if let Some(side) = self.side {
            if result.best_side != side {
                return false;
            }
        }
        true
    }

    /// Apply the filter to ranked results.
    pub fn apply<'a>(&self, results: &'a [AnalysisResult]) -> Vec<&'a AnalysisResult> {
        results
            .iter()
            .filter(|r| self.matches(r))
            .take(self.limit.unwrap_or(usize::MAX))
            .collect()
    }
}
