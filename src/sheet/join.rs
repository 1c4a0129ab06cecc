//! Joining a rate sheet with an odds sheet into an analysis batch.
//!
//! The rate sheet carries `{subject, rate}` per subject, as produced by a
//! stats scraper. The odds sheet carries one line and two prices per
//! subject, optionally grouped by match. Rows are matched by subject,
//! trimmed and case-insensitive.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{info, warn};

use crate::config::Config;
use crate::error::SheetError;
use crate::record::{normalize_header, Column, RawTable};
use crate::validation::parse_number;

/// Sanity limits for odds sheets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OddsLimits {
    /// Highest believable line.
    pub max_line: f64,
    /// Highest believable decimal price.
    pub max_price: f64,
}

impl Default for OddsLimits {
    fn default() -> Self {
        Self {
            max_line: 50.0,
            max_price: 10.0,
        }
    }
}

impl From<&Config> for OddsLimits {
    fn from(config: &Config) -> Self {
        Self {
            max_line: config.max_odds_line,
            max_price: config.max_odds_price,
        }
    }
}

/// Historical rate for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct RateEntry {
    /// Subject identifier.
    pub subject: String,
    /// Historical mean count.
    pub rate: f64,
}

/// Offered line and prices for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsEntry {
    /// Match label, if the sheet has one.
    pub match_label: Option<String>,
    /// Subject identifier.
    pub subject: String,
    /// Shared line.
    pub line: f64,
    /// Decimal odds for the over side.
    pub odds_over: f64,
    /// Decimal odds for the under side.
    pub odds_under: f64,
}

/// Batch built from the two sheets plus whatever did not match.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedBatch {
    /// Engine input in the canonical schema, odds-sheet order.
    pub table: RawTable,
    /// Odds-sheet subjects with no rate.
    pub missing_rates: Vec<String>,
    /// Rate-sheet subjects with no odds.
    pub missing_odds: Vec<String>,
    /// Joined subjects per match label, sorted by label.
    pub matches: Vec<(String, usize)>,
}

impl JoinedBatch {
    /// Human-readable notes about unmatched subjects.
    pub fn warnings(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if !self.missing_rates.is_empty() {
            notes.push(format!("no rate for: {}", self.missing_rates.join(", ")));
        }
        if !self.missing_odds.is_empty() {
            notes.push(format!("no odds for: {}", self.missing_odds.join(", ")));
        }
        notes
    }
}

fn find_column(table: &RawTable, names: &[&str]) -> Option<usize> {
    table
        .headers
        .iter()
        .position(|h| names.contains(&normalize_header(h).as_str()))
}

fn require_column(table: &RawTable, names: &[&str]) -> Result<usize, SheetError> {
    find_column(table, names).ok_or_else(|| SheetError::MissingColumn(names[0].to_string()))
}

fn subject_key(subject: &str) -> String {
    subject.trim().to_lowercase()
}

/// Read a rate sheet. Every problem is collected before failing.
pub fn load_rate_sheet(table: &RawTable) -> Result<Vec<RateEntry>, SheetError> {
    let subject_col = require_column(table, &["subject", "player"])?;
    let rate_col = require_column(table, &["rate", "avgkills"])?;

    let mut problems = Vec::new();
    let mut entries = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let subject = table.cell(row, subject_col).unwrap_or_default().trim();
        if subject.is_empty() {
            problems.push(format!("row {}: subject must not be blank", row));
            continue;
        }
        let Some(cell) = table.cell(row, rate_col) else {
            problems.push(format!("row {} ({}): missing value for 'rate'", row, subject));
            continue;
        };
        match parse_number(cell) {
            Some(rate) if rate > 0.0 => entries.push(RateEntry {
                subject: subject.to_string(),
                rate,
            }),
            Some(rate) => problems.push(format!(
                "row {} ({}): rate must be greater than 0, got {}",
                row, subject, rate
            )),
            None => problems.push(format!(
                "row {} ({}): rate '{}' is not a number",
                row, subject, cell
            )),
        }
    }

    if problems.is_empty() {
        Ok(entries)
    } else {
        Err(SheetError::InvalidValues { problems })
    }
}

/// Read and sanity-check an odds sheet. Every problem is collected before failing.
pub fn load_odds_sheet(
    table: &RawTable,
    limits: &OddsLimits,
) -> Result<Vec<OddsEntry>, SheetError> {
    let match_col = find_column(table, &["match", "partido"]);
    let subject_col = require_column(table, &["subject", "player", "jugador"])?;
    let line_col = require_column(table, &["line", "linea"])?;
    let over_col = require_column(table, &["oddsover", "cuotaover"])?;
    let under_col = require_column(table, &["oddsunder", "cuotaunder"])?;

    let extra: Vec<&str> = table
        .headers
        .iter()
        .enumerate()
        .filter(|(i, _)| {
            match_col != Some(*i) && ![subject_col, line_col, over_col, under_col].contains(i)
        })
        .map(|(_, h)| h.as_str())
        .collect();
    if !extra.is_empty() {
        warn!(columns = %extra.join(","), "Ignoring extra odds sheet columns");
    }

    let mut problems = Vec::new();
    let mut entries = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let subject = table.cell(row, subject_col).unwrap_or_default().trim();
        if subject.is_empty() {
            problems.push(format!("row {}: subject must not be blank", row));
            continue;
        }
        let label = format!("row {} ({})", row, subject);

        let mut number = |col: usize, name: &str| match table.cell(row, col) {
            Some(cell) => {
                let value = parse_number(cell);
                if value.is_none() {
                    problems.push(format!("{}: {} '{}' is not a number", label, name, cell));
                }
                value
            }
            None => {
                problems.push(format!("{}: missing value for '{}'", label, name));
                None
            }
        };
        let line = number(line_col, "line");
        let odds_over = number(over_col, "odds_over");
        let odds_under = number(under_col, "odds_under");

        if let Some(line) = line {
            if line < 0.0 {
                problems.push(format!("{}: line must be non-negative, got {}", label, line));
            } else if line > limits.max_line {
                problems.push(format!("{}: line {} is above {}", label, line, limits.max_line));
            }
        }
        for (name, odds) in [("odds_over", odds_over), ("odds_under", odds_under)] {
            if let Some(odds) = odds {
                if odds <= 1.0 {
                    problems.push(format!(
                        "{}: {} must be greater than 1.0, got {}",
                        label, name, odds
                    ));
                } else if odds > limits.max_price {
                    problems.push(format!(
                        "{}: {} {} is above {}",
                        label, name, odds, limits.max_price
                    ));
                }
            }
        }

        if let (Some(line), Some(odds_over), Some(odds_under)) = (line, odds_over, odds_under) {
            entries.push(OddsEntry {
                match_label: match_col
                    .and_then(|col| table.cell(row, col))
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty()),
                subject: subject.to_string(),
                line,
                odds_over,
                odds_under,
            });
        }
    }

    if !problems.is_empty() {
        return Err(SheetError::InvalidValues { problems });
    }

    let match_count = entries
        .iter()
        .filter_map(|e| e.match_label.as_deref())
        .collect::<HashSet<_>>()
        .len();
    info!(lines = entries.len(), matches = match_count, "Odds sheet loaded");
    Ok(entries)
}

/// Attach rates to odds rows, producing an engine batch.
///
/// When a subject appears more than once on the rate sheet the first rate wins.
pub fn join(rates: &[RateEntry], odds: &[OddsEntry]) -> JoinedBatch {
    let mut by_subject: HashMap<String, f64> = HashMap::with_capacity(rates.len());
    for entry in rates {
        by_subject.entry(subject_key(&entry.subject)).or_insert(entry.rate);
    }

    let headers = Column::required().map(|c| c.to_string()).collect();
    let mut rows = Vec::with_capacity(odds.len());
    let mut missing_rates = Vec::new();
    let mut matched = HashSet::new();
    let mut per_match: BTreeMap<String, usize> = BTreeMap::new();

    for entry in odds {
        let key = subject_key(&entry.subject);
        match by_subject.get(&key) {
            Some(rate) => {
                matched.insert(key);
                if let Some(label) = &entry.match_label {
                    *per_match.entry(label.clone()).or_default() += 1;
                }
                rows.push(vec![
                    entry.subject.clone(),
                    rate.to_string(),
                    entry.line.to_string(),
                    entry.odds_over.to_string(),
                    entry.line.to_string(),
                    entry.odds_under.to_string(),
                ]);
            }
            None => missing_rates.push(entry.subject.clone()),
        }
    }

    let missing_odds: Vec<String> = rates
        .iter()
        .filter(|r| !matched.contains(&subject_key(&r.subject)))
        .map(|r| r.subject.clone())
        .collect();

    if !missing_rates.is_empty() || !missing_odds.is_empty() {
        warn!(
            missing_rates = missing_rates.len(),
            missing_odds = missing_odds.len(),
            "Unmatched subjects in join"
        );
    }
    info!(
        rows = rows.len(),
        matches = per_match.len(),
        "Joined rate and odds sheets"
    );

    JoinedBatch {
        table: RawTable::new(headers, rows),
        missing_rates,
        missing_odds,
        matches: per_match.into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::parse_table;
    use crate::validation::validate;

    fn rates() -> Vec<RateEntry> {
        parse_table("player,avg_kills\nCaps,5.2\nRekkles,4.1\nUpset,4.7\n")
            .map(|t| load_rate_sheet(&t).unwrap())
            .unwrap()
    }

    #[test]
    fn loads_odds_sheet_with_spanish_headers() {
        let table = parse_table(
            "partido,jugador,linea,cuota_over,cuota_under\nG2 vs FNC,Caps,5.5,1.85,1.85\n",
        )
        .unwrap();

        let odds = load_odds_sheet(&table, &OddsLimits::default()).unwrap();

        assert_eq!(odds.len(), 1);
        assert_eq!(odds[0].match_label.as_deref(), Some("G2 vs FNC"));
        assert_eq!(odds[0].line, 5.5);
    }

    #[test]
    fn odds_sheet_collects_every_problem() {
        let table = parse_table(
            "subject,line,odds_over,odds_under\nA,60,1.85,1.85\nB,3.5,0.9,12\nC,abc,1.9,1.9\n",
        )
        .unwrap();

        let err = load_odds_sheet(&table, &OddsLimits::default()).unwrap_err();

        match err {
            SheetError::InvalidValues { problems } => {
                assert_eq!(problems.len(), 4, "{problems:?}");
                assert!(problems[0].contains("row 0 (A): line 60 is above 50"));
                assert!(problems[1].contains("odds_over must be greater than 1.0"));
                assert!(problems[2].contains("odds_under 12 is above 10"));
                assert!(problems[3].contains("row 2 (C): line 'abc'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rate_sheet_rejects_bad_rates() {
        let table = parse_table("subject,rate\nA,0\nB,x\n,3\n").unwrap();

        let err = load_rate_sheet(&table).unwrap_err();

        assert!(matches!(err, SheetError::InvalidValues { ref problems } if problems.len() == 3));
    }

    #[test]
    fn join_matches_case_insensitively_and_reports_gaps() {
        let odds = vec![
            OddsEntry {
                match_label: None,
                subject: "caps ".to_string(),
                line: 4.5,
                odds_over: 1.75,
                odds_under: 2.05,
            },
            OddsEntry {
                match_label: None,
                subject: "Jankos".to_string(),
                line: 2.5,
                odds_over: 2.5,
                odds_under: 1.5,
            },
            OddsEntry {
                match_label: None,
                subject: "Rekkles".to_string(),
                line: 4.5,
                odds_over: 2.10,
                odds_under: 1.70,
            },
        ];

        let joined = join(&rates(), &odds);

        assert_eq!(joined.table.len(), 2);
        assert_eq!(joined.table.cell(0, 1), Some("5.2"));
        assert_eq!(joined.table.cell(1, 0), Some("Rekkles"));
        assert_eq!(joined.missing_rates, vec!["Jankos".to_string()]);
        assert_eq!(joined.missing_odds, vec!["Upset".to_string()]);
        assert_eq!(joined.warnings().len(), 2);
        assert!(validate(&joined.table).valid);
    }

    #[test]
    fn short_rows_are_collected_not_fatal() {
        let rates = RawTable::new(
            vec!["subject".to_string(), "rate".to_string()],
            vec![vec!["Caps".to_string()], vec![]],
        );
        let err = load_rate_sheet(&rates).unwrap_err();
        match err {
            SheetError::InvalidValues { problems } => assert_eq!(
                problems,
                vec![
                    "row 0 (Caps): missing value for 'rate'".to_string(),
                    "row 1: subject must not be blank".to_string(),
                ]
            ),
            other => panic!("unexpected error: {other:?}"),
        }

        let odds = RawTable::new(
            ["match", "subject", "line", "odds_over", "odds_under"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            vec![vec!["G2 vs FNC".to_string(), "Caps".to_string(), "4.5".to_string()]],
        );
        let err = load_odds_sheet(&odds, &OddsLimits::default()).unwrap_err();
        match err {
            SheetError::InvalidValues { problems } => {
                assert_eq!(problems.len(), 2, "{problems:?}");
                assert!(problems[0].ends_with("missing value for 'odds_over'"));
                assert!(problems[1].ends_with("missing value for 'odds_under'"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn join_counts_subjects_per_match() {
        let table = parse_table(
            "partido,jugador,linea,cuota_over,cuota_under\n\
             G2 vs FNC,Caps,4.5,1.75,2.05\n\
             MAD vs BDS,Upset,4.5,1.95,1.80\n\
             G2 vs FNC,Rekkles,4.5,2.10,1.70\n\
             G2 vs FNC,Hans Sama,5.5,1.90,1.85\n",
        )
        .unwrap();
        let odds = load_odds_sheet(&table, &OddsLimits::default()).unwrap();

        let joined = join(&rates(), &odds);

        assert_eq!(
            joined.matches,
            vec![("G2 vs FNC".to_string(), 2), ("MAD vs BDS".to_string(), 1)]
        );
        assert_eq!(joined.missing_rates, vec!["Hans Sama".to_string()]);
    }
}
