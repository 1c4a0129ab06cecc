//! Per-record scoring and batch ranking.

use crate::error::ProcessingError;
use crate::model::{edge, expected_value, implied_probability, poisson_split};
use crate::record::{AnalysisResult, BettingRecord, Side};

/// Pick the side with the higher expected value.
///
/// Over wins only when strictly better; an exact tie goes to `AtOrBelow`.
pub fn choose_side(ev_over: f64, ev_under: f64) -> (Side, f64) {
    if ev_over > ev_under {
        (Side::Above, ev_over)
    } else {
        (Side::AtOrBelow, ev_under)
    }
}

/// Score one validated record.
pub fn score_record(record: &BettingRecord) -> Result<AnalysisResult, ProcessingError> {
    let line = record.line();
    let split = poisson_split(record.rate, line);

    let ev_over = expected_value(split.prob_above, record.odds_over);
    let ev_under = expected_value(split.prob_at_or_below, record.odds_under);
    let (best_side, best_ev) = choose_side(ev_over, ev_under);

    let result = AnalysisResult {
        subject: record.subject.trim().to_string(),
        rate: record.rate,
        line,
        prob_above: split.prob_above,
        prob_at_or_below: split.prob_at_or_below,
        ev_over,
        ev_under,
        best_side,
        best_ev,
        is_profitable: best_ev > 0.0,
        implied_prob_over: implied_probability(record.odds_over),
        implied_prob_under: implied_probability(record.odds_under),
        edge_over: edge(split.prob_above, record.odds_over),
        edge_under: edge(split.prob_at_or_below, record.odds_under),
    };

    ensure_finite(&result)?;
    Ok(result)
}

fn ensure_finite(result: &AnalysisResult) -> Result<(), ProcessingError> {
    let quantities = [
        ("probAbove", result.prob_above),
        ("probAtOrBelow", result.prob_at_or_below),
        ("evOver", result.ev_over),
        ("evUnder", result.ev_under),
        ("edgeOver", result.edge_over),
        ("edgeUnder", result.edge_under),
    ];

    match quantities.iter().find(|(_, v)| !v.is_finite()) {
        Some((quantity, _)) => Err(ProcessingError::NonFinite {
            subject: result.subject.clone(),
            quantity: *quantity,
        }),
        None => Ok(()),
    }
}

/// Sort results by `best_ev`, best first. Equal EVs keep their input order.
pub fn rank(results: &mut [AnalysisResult]) {
    results.sort_by(|a, b| b.best_ev.total_cmp(&a.best_ev));
}
