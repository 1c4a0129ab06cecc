use pretty_assertions::assert_eq;
use tempfile::tempdir;

use prop_ev::analysis::{analyze, AnalysisOptions};
use prop_ev::error::SheetError;
use prop_ev::sheet::{
    join, load_odds_sheet, load_rate_sheet, read_results, read_table, sample_table, write_results,
    write_table, OddsLimits,
};

#[test]
fn input_sheet_round_trips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("sample.csv");

    write_table(&path, &sample_table()).unwrap();
    let table = read_table(&path).unwrap();

    assert_eq!(table, sample_table());
}

#[test]
fn results_round_trip_without_losing_precision() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("results.csv");
    let report = analyze(&sample_table(), &AnalysisOptions::default()).unwrap();

    write_results(&path, &report.results).unwrap();
    let back = read_results(&path).unwrap();

    assert_eq!(back, report.results);
    for (a, b) in back.iter().zip(&report.results) {
        assert_eq!(a.best_ev > 0.0, b.best_ev > 0.0);
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();

    let err = read_table(dir.path().join("nope.csv")).unwrap_err();

    assert!(matches!(err, SheetError::Io { .. }));
}

#[test]
fn rate_and_odds_sheets_join_into_an_analyzable_batch() {
    let dir = tempdir().unwrap();
    let rates_path = dir.path().join("rates.csv");
    let odds_path = dir.path().join("odds.csv");
    std::fs::write(&rates_path, "player,avg_kills\nCaps,5.2\nJankos,2.8\nRazork,3.2\n").unwrap();
    std::fs::write(
        &odds_path,
        "partido,jugador,linea,cuota_over,cuota_under\n\
         G2 vs FNC,Jankos,2.5,2.50,1.50\n\
         G2 vs FNC,Caps,4.5,1.75,2.05\n\
         MAD vs BDS,Nisqy,3.5,1.90,1.90\n",
    )
    .unwrap();

    let rates = load_rate_sheet(&read_table(&rates_path).unwrap()).unwrap();
    let odds = load_odds_sheet(&read_table(&odds_path).unwrap(), &OddsLimits::default()).unwrap();
    let joined = join(&rates, &odds);

    assert_eq!(joined.missing_rates, vec!["Nisqy".to_string()]);
    assert_eq!(joined.missing_odds, vec!["Razork".to_string()]);

    let report = analyze(&joined.table, &AnalysisOptions::default()).unwrap();
    let names: Vec<&str> = report.results.iter().map(|r| r.subject.as_str()).collect();
    assert_eq!(names, vec!["Jankos", "Caps"]);
}
