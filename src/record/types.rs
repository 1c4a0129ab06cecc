//! Value types for over/under count lines.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Side of a count line.
///
/// `Above` wins when the observed count is strictly greater than the line,
/// `AtOrBelow` wins otherwise. Bookmakers call these "Over" and "Under".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Side {
    /// Count exceeds the line ("Over").
    #[strum(to_string = "Above", serialize = "over")]
    Above,
    /// Count is at or below the line ("Under").
    #[strum(to_string = "AtOrBelow", serialize = "under", serialize = "at_or_below")]
    AtOrBelow,
}

impl Side {
    /// Bookmaker label for this side.
    pub fn market_label(&self) -> &'static str {
        match self {
            Side::Above => "Over",
            Side::AtOrBelow => "Under",
        }
    }
}

/// One validated input row: a subject, its historical rate and the offered line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingRecord {
    /// Subject identifier (player, team, ...).
    pub subject: String,
    /// Historical mean count, used as the Poisson λ.
    pub rate: f64,
    /// Threshold quoted for the over side.
    pub line_over: f64,
    /// Decimal odds for the over side.
    pub odds_over: f64,
    /// Threshold quoted for the under side.
    pub line_under: f64,
    /// Decimal odds for the under side.
    pub odds_under: f64,
}

impl BettingRecord {
    /// Create a record with a single shared line.
    pub fn new(
        subject: impl Into<String>,
        rate: f64,
        line: f64,
        odds_over: f64,
        odds_under: f64,
    ) -> Self {
        Self {
            subject: subject.into(),
            rate,
            line_over: line,
            odds_over,
            line_under: line,
            odds_under,
        }
    }

    /// The shared line. Validation guarantees both quotes agree.
    pub fn line(&self) -> f64 {
        self.line_over
    }
}

/// Scored opportunity for one subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Subject identifier.
    pub subject: String,
    /// Historical mean count.
    pub rate: f64,
    /// Shared line.
    pub line: f64,
    /// Modeled probability the count exceeds the line.
    pub prob_above: f64,
    /// Modeled probability the count is at or below the line.
    pub prob_at_or_below: f64,
    /// Expected value of backing the over side, per unit stake.
    pub ev_over: f64,
    /// Expected value of backing the under side, per unit stake.
    pub ev_under: f64,
    /// Side with the higher expected value (ties go to `AtOrBelow`).
    pub best_side: Side,
    /// Expected value of `best_side`.
    pub best_ev: f64,
    /// Whether `best_ev` is strictly positive.
    pub is_profitable: bool,
    /// 1 / odds_over.
    pub implied_prob_over: f64,
    /// 1 / odds_under.
    pub implied_prob_under: f64,
    /// prob_above - implied_prob_over.
    pub edge_over: f64,
    /// prob_at_or_below - implied_prob_under.
    pub edge_under: f64,
}

impl AnalysisResult {
    /// Bookmaker margin implied by the two quotes.
    pub fn overround(&self) -> f64 {
        self.implied_prob_over + self.implied_prob_under - 1.0
    }

    /// Edge of the recommended side.
    pub fn best_edge(&self) -> f64 {
        match self.best_side {
            Side::Above => self.edge_over,
            Side::AtOrBelow => self.edge_under,
        }
    }
}
