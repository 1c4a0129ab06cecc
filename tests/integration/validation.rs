use prop_ev::analysis::{analyze, AnalysisOptions};
use prop_ev::error::AnalysisError;
use prop_ev::sheet::parse_table;
use prop_ev::validation::{validate, validate_with, DiagnosticKind, ValidationRules};

const HEADER: &str = "subject,rate,lineOver,oddsOver,lineUnder,oddsUnder";

fn batch(rows: &[&str]) -> prop_ev::record::RawTable {
    let mut text = format!("{HEADER}\n");
    for row in rows {
        text.push_str(row);
        text.push('\n');
    }
    parse_table(&text).unwrap()
}

#[test]
fn mismatched_lines_name_the_row() {
    let table = batch(&["Caps,5.2,4.5,1.75,4.5,2.05", "Rekkles,4.1,3.5,2.10,4.0,1.70"]);

    let err = analyze(&table, &AnalysisOptions::default()).unwrap_err();

    match err {
        AnalysisError::Rejected { diagnostics } => {
            assert_eq!(diagnostics.len(), 1);
            assert!(diagnostics[0].starts_with("row 1 (Rekkles)"), "{}", diagnostics[0]);
            assert!(diagnostics[0].contains("must be equal"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn empty_batch_is_not_a_schema_error() {
    let outcome = validate(&parse_table("team\n").unwrap());

    assert!(!outcome.valid);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::Empty);
    assert!(outcome.diagnostics[0].message.contains("empty"));
}

#[test]
fn missing_columns_fail_fast() {
    let table = parse_table("subject,rate\nCaps,-1\n").unwrap();

    let outcome = validate(&table);

    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::Schema);
    assert!(outcome.diagnostics[0].message.contains("lineOver"));
}

#[test]
fn every_problem_is_reported_in_one_pass() {
    let table = batch(&[
        "Caps,abc,4.5,1.75,4.5,2.05",
        "Rekkles,0,4.5,1.0,4.5,1.70",
        " ,3.0,-1,1.9,-1,1.9",
        "Upset,4.7,4.5,NaN,4.5,1.80",
    ]);

    let outcome = validate(&table);
    let messages = outcome.messages();

    assert!(!outcome.valid);
    let has = |text: &str| messages.iter().any(|m| m == text);
    let has_prefix = |prefix: &str| messages.iter().any(|m| m.starts_with(prefix));
    assert!(has("non-numeric values in column 'rate' (rows: [0])"));
    assert!(has("non-numeric values in column 'oddsOver' (rows: [3])"));
    assert!(has_prefix("row 1 (Rekkles): rate must be greater than 0"));
    assert!(has_prefix("row 1 (Rekkles): oddsOver must be greater than 1.0"));
    assert!(has("row 2: subject must not be blank"));
    assert!(has_prefix("row 2: lineOver must be non-negative"));
    assert!(has_prefix("row 2: lineUnder must be non-negative"));
    assert!(outcome.flags_row(0));
    assert!(outcome.flags_row(3));
}

#[test]
fn tolerance_is_configurable() {
    let table = batch(&["Caps,5.2,4.5,1.75,4.55,2.05"]);

    assert!(!validate(&table).valid);
    let loose = ValidationRules {
        line_tolerance: 0.1,
        ..Default::default()
    };
    assert!(validate_with(&table, &loose).valid);
}
