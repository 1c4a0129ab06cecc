//! Batch analysis pipeline.
//!
//! raw batch → validation gate → per-record scoring → partition into
//! scored/skipped → stable rank by best EV → statistics.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use super::ranker::{rank, score_record};
use super::summary::{summarize, BatchStatistics};
use crate::config::Config;
use crate::error::{AnalysisError, ProcessingError};
use crate::metrics;
use crate::record::{AnalysisResult, BettingRecord, Column, RawTable};
use crate::validation::validator::ColumnPositions;
use crate::validation::{parse_number, validate_with, ValidationRules};

/// Engine knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    /// Validation rules for the gate.
    pub rules: ValidationRules,
    /// Score across worker threads when the batch has at least this many rows. 0 disables.
    pub parallel_threshold: usize,
}

impl AnalysisOptions {
    /// Default batch size from which scoring runs in parallel.
    pub const DEFAULT_PARALLEL_THRESHOLD: usize = 256;

    fn use_parallel(&self, rows: usize) -> bool {
        self.parallel_threshold > 0 && rows >= self.parallel_threshold
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            rules: ValidationRules::default(),
            parallel_threshold: Self::DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

impl From<&Config> for AnalysisOptions {
    fn from(config: &Config) -> Self {
        Self {
            rules: ValidationRules::from(config),
            parallel_threshold: config.parallel_threshold,
        }
    }
}

/// A record dropped while scoring.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRecord {
    /// Row index in the input batch.
    pub row: usize,
    /// Subject, when it could be read.
    pub subject: Option<String>,
    /// Why the record was dropped.
    pub reason: String,
}

/// Output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Scored results, best EV first.
    pub results: Vec<AnalysisResult>,
    /// Aggregate statistics over `results`.
    pub statistics: BatchStatistics,
    /// Records dropped while scoring.
    pub skipped: Vec<SkippedRecord>,
    /// Non-fatal validation notes.
    pub warnings: Vec<String>,
}

/// Validate, score, rank and summarize a batch.
///
/// Fails when the validation gate rejects the batch, or when no record
/// survives scoring. Individual scoring failures are recorded in
/// [`AnalysisReport::skipped`] and do not stop the batch.
#[instrument(skip_all, fields(rows = table.len()))]
pub fn analyze(
    table: &RawTable,
    options: &AnalysisOptions,
) -> Result<AnalysisReport, AnalysisError> {
    let _timer = metrics::timer_analysis();
    info!("Starting batch analysis");

    let outcome = validate_with(table, &options.rules);
    let warnings = match outcome.into_result() {
        Ok(warnings) => warnings,
        Err(err) => {
            metrics::inc_batches_rejected();
            if let AnalysisError::Rejected { diagnostics } = &err {
                for diagnostic in diagnostics {
                    error!(%diagnostic, "Invalid input batch");
                }
            }
            return Err(err);
        }
    };

    let (mut results, skipped) = score_batch(table, options)?;

    rank(&mut results);
    let statistics = summarize(&results);
    metrics::add_profitable_opportunities(statistics.profitable_opportunities);

    info!(
        scored = results.len(),
        skipped = skipped.len(),
        profitable = statistics.profitable_opportunities,
        "Batch analysis complete"
    );

    Ok(AnalysisReport {
        results,
        statistics,
        skipped,
        warnings,
    })
}

/// Analyze typed records through the same gate as a raw batch.
pub fn analyze_records(
    records: &[BettingRecord],
    options: &AnalysisOptions,
) -> Result<AnalysisReport, AnalysisError> {
    analyze(&RawTable::from_records(records), options)
}

/// Score every row of a batch that passed the gate.
///
/// Rows that cannot be scored are returned as skipped. Fails with
/// [`AnalysisError::NoSurvivors`] when no row could be scored.
fn score_batch(
    table: &RawTable,
    options: &AnalysisOptions,
) -> Result<(Vec<AnalysisResult>, Vec<SkippedRecord>), AnalysisError> {
    let positions = ColumnPositions::locate(table);
    let score = |row: usize| score_row(table, &positions, row);
    let scored: Vec<Result<AnalysisResult, SkippedRecord>> = if options.use_parallel(table.len())
    {
        debug!("Scoring in parallel");
        (0..table.len()).into_par_iter().map(score).collect()
    } else {
        (0..table.len()).map(score).collect()
    };

    let (results, skipped) = partition(scored);
    for record in &skipped {
        warn!(
            row = record.row,
            subject = ?record.subject,
            reason = %record.reason,
            "Skipping record"
        );
    }

    metrics::inc_batches_analyzed();
    metrics::add_records_scored(results.len());
    metrics::add_records_skipped(skipped.len());

    if results.is_empty() {
        error!(skipped = skipped.len(), "No records could be scored");
        return Err(AnalysisError::NoSurvivors {
            skipped: skipped.len(),
        });
    }

    Ok((results, skipped))
}

fn partition(
    scored: Vec<Result<AnalysisResult, SkippedRecord>>,
) -> (Vec<AnalysisResult>, Vec<SkippedRecord>) {
    let mut results = Vec::with_capacity(scored.len());
    let mut skipped = Vec::new();
    for outcome in scored {
        match outcome {
            Ok(result) => results.push(result),
            Err(record) => skipped.push(record),
        }
    }
    (results, skipped)
}

fn score_row(
    table: &RawTable,
    positions: &ColumnPositions,
    row: usize,
) -> Result<AnalysisResult, SkippedRecord> {
    let subject = table
        .cell(row, positions.position(Column::Subject))
        .map(|s| s.trim().to_string());

    record_from_row(table, positions, row)
        .and_then(|record| score_record(&record))
        .map_err(|err| SkippedRecord {
            row,
            subject,
            reason: err.to_string(),
        })
}

/// Read one row of a validated batch into a typed record.
fn record_from_row(
    table: &RawTable,
    positions: &ColumnPositions,
    row: usize,
) -> Result<BettingRecord, ProcessingError> {
    let text = |column: Column| {
        table
            .cell(row, positions.position(column))
            .ok_or_else(|| ProcessingError::MissingCell {
                row,
                column: column.to_string(),
            })
    };
    let number = |column: Column| {
        let cell = text(column)?;
        parse_number(cell).ok_or_else(|| ProcessingError::NotNumeric {
            row,
            column: column.to_string(),
            value: cell.to_string(),
        })
    };

    Ok(BettingRecord {
        subject: text(Column::Subject)?.trim().to_string(),
        rate: number(Column::Rate)?,
        line_over: number(Column::LineOver)?,
        odds_over: number(Column::OddsOver)?,
        line_under: number(Column::LineUnder)?,
        odds_under: number(Column::OddsUnder)?,
    })
}
