//! Output formatting for analysis results.
//!
//! Supports two modes: human-readable tables (default) and JSON (--json).
//! Tables are rounded to the configured precision; JSON keeps full precision.

use serde::Serialize;
use tabled::{Table, Tabled};

use crate::analysis::{AnalysisReport, BatchStatistics, SkippedRecord};
use crate::error::Result;
use crate::model::DistributionPoint;
use crate::record::AnalysisResult;

/// Output mode for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Table,
    Json,
}

impl OutputMode {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputMode::Json
        } else {
            OutputMode::Table
        }
    }
}

/// Format a number with a fixed number of decimals.
pub fn format_number(value: f64, precision: u32) -> String {
    format!("{:.*}", precision as usize, value)
}

/// One ranked result as a table row.
#[derive(Debug, Tabled)]
pub struct ResultRow {
    #[tabled(rename = "#")]
    pub rank: usize,
    #[tabled(rename = "Subject")]
    pub subject: String,
    #[tabled(rename = "Rate")]
    pub rate: String,
    #[tabled(rename = "Line")]
    pub line: String,
    #[tabled(rename = "P(Over)")]
    pub prob_above: String,
    #[tabled(rename = "P(Under)")]
    pub prob_at_or_below: String,
    #[tabled(rename = "EV Over")]
    pub ev_over: String,
    #[tabled(rename = "EV Under")]
    pub ev_under: String,
    #[tabled(rename = "Best")]
    pub best_side: String,
    #[tabled(rename = "Best EV")]
    pub best_ev: String,
    #[tabled(rename = "Edge")]
    pub edge: String,
    #[tabled(rename = "+EV")]
    pub profitable: String,
}

impl ResultRow {
    pub fn new(rank: usize, result: &AnalysisResult, precision: u32) -> Self {
        let num = |v: f64| format_number(v, precision);
        Self {
            rank,
            subject: result.subject.clone(),
            rate: num(result.rate),
            line: num(result.line),
            prob_above: num(result.prob_above),
            prob_at_or_below: num(result.prob_at_or_below),
            ev_over: num(result.ev_over),
            ev_under: num(result.ev_under),
            best_side: result.best_side.market_label().to_string(),
            best_ev: num(result.best_ev),
            edge: num(result.best_edge()),
            profitable: if result.is_profitable { "yes" } else { "no" }.to_string(),
        }
    }
}

#[derive(Debug, Tabled)]
struct StatRow {
    #[tabled(rename = "Statistic")]
    name: &'static str,
    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Debug, Tabled)]
struct DistributionRow {
    #[tabled(rename = "Count")]
    count: u64,
    #[tabled(rename = "P(X = k)")]
    probability: String,
    #[tabled(rename = "Side")]
    side: &'static str,
    #[tabled(rename = "")]
    bar: String,
}

#[derive(Debug, Tabled)]
struct SkippedRow {
    #[tabled(rename = "Row")]
    row: usize,
    #[tabled(rename = "Subject")]
    subject: String,
    #[tabled(rename = "Reason")]
    reason: String,
}

/// A result with its bookmaker margin, as written in JSON mode.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultJson<'a> {
    #[serde(flatten)]
    result: &'a AnalysisResult,
    overround: f64,
}

impl<'a> From<&'a AnalysisResult> for ResultJson<'a> {
    fn from(result: &'a AnalysisResult) -> Self {
        Self {
            result,
            overround: result.overround(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportJson<'a> {
    results: Vec<ResultJson<'a>>,
    statistics: &'a BatchStatistics,
    skipped: &'a [SkippedRecord],
    warnings: &'a [String],
}

fn table_or_placeholder<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        "(no results)".to_string()
    } else {
        Table::new(rows).to_string()
    }
}

/// Render ranked results. Rank numbers start at 1 in the order given.
pub fn render_results(
    results: &[&AnalysisResult],
    mode: OutputMode,
    precision: u32,
) -> Result<String> {
    match mode {
        OutputMode::Table => Ok(table_or_placeholder(
            results
                .iter()
                .enumerate()
                .map(|(i, r)| ResultRow::new(i + 1, r, precision))
                .collect(),
        )),
        OutputMode::Json => {
            let rows: Vec<ResultJson<'_>> =
                results.iter().map(|r| ResultJson::from(*r)).collect();
            Ok(serde_json::to_string_pretty(&rows)?)
        }
    }
}

/// Render batch statistics.
pub fn render_statistics(
    stats: &BatchStatistics,
    mode: OutputMode,
    precision: u32,
) -> Result<String> {
    if mode == OutputMode::Json {
        return Ok(serde_json::to_string_pretty(stats)?);
    }

    let num = |v: f64| format_number(v, precision);
    let rows = vec![
        StatRow {
            name: "Subjects",
            value: stats.total_subjects.to_string(),
        },
        StatRow {
            name: "Profitable",
            value: stats.profitable_opportunities.to_string(),
        },
        StatRow {
            name: "Profitability rate",
            value: format!("{:.1}%", stats.profitability_rate * 100.0),
        },
        StatRow {
            name: "Best EV",
            value: num(stats.best_ev),
        },
        StatRow {
            name: "Worst EV",
            value: num(stats.worst_ev),
        },
        StatRow {
            name: "Mean EV",
            value: num(stats.mean_ev),
        },
        StatRow {
            name: "Over picks",
            value: stats.above_count.to_string(),
        },
        StatRow {
            name: "Under picks",
            value: stats.at_or_below_count.to_string(),
        },
        StatRow {
            name: "Mean rate",
            value: num(stats.mean_rate),
        },
        StatRow {
            name: "Mean line",
            value: num(stats.mean_line),
        },
    ];
    Ok(Table::new(rows).to_string())
}

/// Render records dropped while scoring.
pub fn render_skipped(skipped: &[SkippedRecord]) -> String {
    table_or_placeholder(
        skipped
            .iter()
            .map(|s| SkippedRow {
                row: s.row,
                subject: s.subject.clone().unwrap_or_default(),
                reason: s.reason.clone(),
            })
            .collect(),
    )
}

/// Render a full report. `results` is the (possibly filtered) view of
/// `report.results` to show.
pub fn render_report(
    report: &AnalysisReport,
    results: &[&AnalysisResult],
    mode: OutputMode,
    precision: u32,
) -> Result<String> {
    match mode {
        OutputMode::Json => {
            let json = ReportJson {
                results: results.iter().map(|r| ResultJson::from(*r)).collect(),
                statistics: &report.statistics,
                skipped: &report.skipped,
                warnings: &report.warnings,
            };
            Ok(serde_json::to_string_pretty(&json)?)
        }
        OutputMode::Table => {
            let mut out = render_results(results, mode, precision)?;
            out.push_str("\n\n");
            out.push_str(&render_statistics(&report.statistics, mode, precision)?);
            if !report.skipped.is_empty() {
                out.push_str("\n\nSkipped records:\n");
                out.push_str(&render_skipped(&report.skipped));
            }
            Ok(out)
        }
    }
}

/// Render a probability distribution with a text bar per count.
pub fn render_distribution(
    points: &[DistributionPoint],
    mode: OutputMode,
    precision: u32,
) -> Result<String> {
    if mode == OutputMode::Json {
        return Ok(serde_json::to_string_pretty(points)?);
    }

    let peak = points.iter().map(|p| p.probability).fold(0.0, f64::max);
    let rows = points
        .iter()
        .map(|p| DistributionRow {
            count: p.count,
            probability: format_number(p.probability, precision),
            side: p.side.market_label(),
            bar: bar(p.probability, peak),
        })
        .collect();
    Ok(table_or_placeholder(rows))
}

fn bar(value: f64, peak: f64) -> String {
    const WIDTH: f64 = 40.0;
    if peak <= 0.0 {
        return String::new();
    }
    "#".repeat((value / peak * WIDTH).round() as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{analyze_records, score_record, AnalysisOptions};
    use crate::model::distribution;
    use crate::record::BettingRecord;

    fn carzzy() -> AnalysisResult {
        score_record(&BettingRecord::new("Carzzy", 3.8, 3.5, 1.85, 1.95)).unwrap()
    }

    #[test]
    fn numbers_are_rounded_for_display() {
        assert_eq!(format_number(0.526515, 4), "0.5265");
        assert_eq!(format_number(-0.025946, 4), "-0.0259");
        assert_eq!(format_number(1.5, 2), "1.50");
    }

    #[test]
    fn table_shows_rounded_values_and_market_label() {
        let result = carzzy();
        let table = render_results(&[&result], OutputMode::Table, 4).unwrap();

        assert!(table.contains("Carzzy"));
        assert!(table.contains("0.5265"));
        assert!(table.contains("Over"));
        assert!(!table.contains("0.526515"));
    }

    #[test]
    fn json_keeps_precision_and_overround() {
        let result = carzzy();
        let json = render_results(&[&result], OutputMode::Json, 4).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value[0]["subject"], "Carzzy");
        let best_ev = value[0]["bestEv"].as_f64().unwrap();
        assert!((best_ev - result.best_ev).abs() < 1e-15);
        assert!(json.contains("0.52651"));
        let overround = value[0]["overround"].as_f64().unwrap();
        assert!((overround - (1.0 / 1.85 + 1.0 / 1.95 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn empty_results_render_placeholder() {
        assert_eq!(render_results(&[], OutputMode::Table, 4).unwrap(), "(no results)");
    }

    #[test]
    fn report_json_has_all_sections() {
        let report = analyze_records(
            &[BettingRecord::new("Caps", 5.2, 4.5, 1.75, 2.05)],
            &AnalysisOptions::default(),
        )
        .unwrap();
        let view: Vec<&AnalysisResult> = report.results.iter().collect();

        let json = render_report(&report, &view, OutputMode::Json, 4).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["statistics"]["totalSubjects"], 1);
        assert!(value["skipped"].as_array().unwrap().is_empty());
        assert_eq!(value["results"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn distribution_marks_sides() {
        let points = distribution(3.8, 3.5, 6);
        let table = render_distribution(&points, OutputMode::Table, 4).unwrap();

        assert!(table.contains("Under"));
        assert!(table.contains("Over"));
        assert!(table.contains('#'));
    }
}
