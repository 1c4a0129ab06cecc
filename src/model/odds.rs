//! Decimal odds conversion and expected value.

/// Implied probability of decimal `odds` (1 / odds).
///
/// For odds above 1.0 the result lies strictly between 0 and 1.
pub fn implied_probability(odds: f64) -> f64 {
    1.0 / odds
}

/// Modeled probability minus the probability implied by `odds`.
///
/// Positive edge means the model rates the side more likely than the price does.
pub fn edge(model_probability: f64, odds: f64) -> f64 {
    model_probability - implied_probability(odds)
}

/// Expected profit per unit stake when backing a side at `odds`.
///
/// EV = probability * odds - 1. Positive is favorable under the model.
pub fn expected_value(probability: f64, odds: f64) -> f64 {
    probability * odds - 1.0
}

/// Bookmaker margin over a two-way market (sum of implied probabilities - 1).
pub fn overround(odds_over: f64, odds_under: f64) -> f64 {
    implied_probability(odds_over) + implied_probability(odds_under) - 1.0
}
