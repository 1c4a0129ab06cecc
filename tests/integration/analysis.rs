use pretty_assertions::assert_eq;

use prop_ev::analysis::{analyze, analyze_records, summarize, AnalysisOptions, ResultFilter};
use prop_ev::record::{AnalysisResult, BettingRecord, Side};
use prop_ev::sheet::{parse_table, sample_table};

fn close(actual: f64, expected: f64, tolerance: f64) -> bool {
    (actual - expected).abs() < tolerance
}

#[test]
fn reference_row_is_priced_end_to_end() {
    let table = parse_table(
        "subject,rate,lineOver,oddsOver,lineUnder,oddsUnder\nA,3.8,3.5,1.85,3.5,1.95\n",
    )
    .unwrap();

    let report = analyze(&table, &AnalysisOptions::default()).unwrap();
    let r = &report.results[0];

    assert!(close(r.prob_at_or_below, 0.4733, 1e-3), "{}", r.prob_at_or_below);
    assert!(close(r.prob_above, 0.5267, 1e-3), "{}", r.prob_above);
    assert!(close(r.ev_over, -0.0256, 1e-3), "{}", r.ev_over);
    assert!(close(r.ev_under, -0.0771, 1e-3), "{}", r.ev_under);
    assert_eq!(r.best_side, Side::Above);
    assert!(!r.is_profitable);
    assert!(close(r.prob_above + r.prob_at_or_below, 1.0, 1e-12));
}

#[test]
fn sample_batch_ranks_by_best_ev() {
    let report = analyze(&sample_table(), &AnalysisOptions::default()).unwrap();

    let order: Vec<(&str, Side)> = report
        .results
        .iter()
        .map(|r| (r.subject.as_str(), r.best_side))
        .collect();
    assert_eq!(
        order,
        vec![
            ("Jankos", Side::Above),
            ("Hans Sama", Side::Above),
            ("Caps", Side::Above),
            ("Rekkles", Side::AtOrBelow),
            ("Humanoid", Side::Above),
            ("Razork", Side::AtOrBelow),
            ("Upset", Side::Above),
            ("Carzzy", Side::Above),
        ]
    );
    assert_eq!(report.statistics.total_subjects, 8);
    assert_eq!(report.statistics.profitable_opportunities, 6);
    assert!(close(report.statistics.best_ev, 0.3264, 1e-3));
    assert!(report.warnings.is_empty());
}

#[test]
fn ranking_is_sorted_and_flags_match_sign() {
    let report = analyze(&sample_table(), &AnalysisOptions::default()).unwrap();

    for pair in report.results.windows(2) {
        assert!(pair[0].best_ev >= pair[1].best_ev);
    }
    for r in &report.results {
        assert_eq!(r.is_profitable, r.best_ev > 0.0);
        assert_eq!(r.best_ev, r.ev_over.max(r.ev_under));
    }
}

#[test]
fn summary_of_five_results() {
    let results: Vec<AnalysisResult> = [0.10, -0.05, 0.00, 0.20, -0.10]
        .iter()
        .enumerate()
        .map(|(i, &ev)| AnalysisResult {
            subject: format!("s{i}"),
            rate: 3.0,
            line: 2.5,
            prob_above: 0.5,
            prob_at_or_below: 0.5,
            ev_over: ev,
            ev_under: ev - 0.5,
            best_side: Side::Above,
            best_ev: ev,
            is_profitable: ev > 0.0,
            implied_prob_over: 0.5,
            implied_prob_under: 0.5,
            edge_over: 0.0,
            edge_under: 0.0,
        })
        .collect();

    let stats = summarize(&results);

    assert_eq!(stats.total_subjects, 5);
    assert_eq!(stats.profitable_opportunities, 2);
    assert_eq!(stats.profitability_rate, 0.4);
    assert_eq!(stats.best_ev, 0.20);
    assert_eq!(stats.worst_ev, -0.10);
}

#[test]
fn filter_keeps_rank_order() {
    let report = analyze(&sample_table(), &AnalysisOptions::default()).unwrap();

    let unders = ResultFilter {
        side: Some(Side::AtOrBelow),
        ..Default::default()
    }
    .apply(&report.results);
    let names: Vec<&str> = unders.iter().map(|r| r.subject.as_str()).collect();
    assert_eq!(names, vec!["Rekkles", "Razork"]);

    let top = ResultFilter {
        only_profitable: true,
        min_ev: Some(0.03),
        limit: Some(2),
        ..Default::default()
    }
    .apply(&report.results);
    let names: Vec<&str> = top.iter().map(|r| r.subject.as_str()).collect();
    assert_eq!(names, vec!["Jankos", "Hans Sama"]);
}

#[test]
fn legacy_headers_are_accepted() {
    let table = parse_table(
        "player,avg_kills,line_over,odds_over,line_under,odds_under,team\n\
         Caps,5.2,4.5,1.75,4.5,2.05,G2\n",
    )
    .unwrap();

    let report = analyze(&table, &AnalysisOptions::default()).unwrap();

    assert_eq!(report.results[0].subject, "Caps");
    assert_eq!(report.warnings, vec!["ignoring extra columns: team".to_string()]);
}

#[test]
fn large_batches_keep_input_order_for_ties() {
    let records: Vec<BettingRecord> = (0..600)
        .map(|i| BettingRecord::new(format!("p{i:03}"), 4.0, 3.5, 1.9, 1.9))
        .collect();

    let report = analyze_records(&records, &AnalysisOptions::default()).unwrap();

    assert_eq!(report.results.len(), 600);
    assert_eq!(report.results[0].subject, "p000");
    assert_eq!(report.results[599].subject, "p599");
}
