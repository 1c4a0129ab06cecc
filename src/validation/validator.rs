//! Batch validator.

use tracing::{debug, warn};

use super::outcome::{Diagnostic, DiagnosticKind, ValidationOutcome};
use crate::config::Config;
use crate::record::{Column, RawTable};

/// Tunable validation rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationRules {
    /// Largest accepted |lineOver - lineUnder|.
    pub line_tolerance: f64,
    /// Largest accepted rate. Scoring cost grows with the square root of the rate.
    pub max_rate: f64,
}

impl ValidationRules {
    /// Default tolerance for comparing the two quoted lines.
    pub const DEFAULT_LINE_TOLERANCE: f64 = 1e-6;
    /// Default rate ceiling.
    pub const DEFAULT_MAX_RATE: f64 = 1e6;
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            line_tolerance: Self::DEFAULT_LINE_TOLERANCE,
            max_rate: Self::DEFAULT_MAX_RATE,
        }
    }
}

impl From<&Config> for ValidationRules {
    fn from(config: &Config) -> Self {
        Self {
            line_tolerance: config.line_tolerance,
            max_rate: config.max_rate,
        }
    }
}

/// Parse a cell as a finite number. `NaN` and infinities count as non-numeric.
pub fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Validate a batch with the default rules.
pub fn validate(table: &RawTable) -> ValidationOutcome {
    validate_with(table, &ValidationRules::default())
}

/// Validate a batch.
pub fn validate_with(table: &RawTable, rules: &ValidationRules) -> ValidationOutcome {
    let mut warnings = Vec::new();

    if table.is_empty() {
        return ValidationOutcome::from_diagnostics(
            vec![Diagnostic::batch(
                DiagnosticKind::Empty,
                "batch is empty: no rows to analyze",
            )],
            warnings,
        );
    }

    let missing: Vec<String> = Column::required()
        .filter(|c| table.column_index(*c).is_none())
        .map(|c| c.to_string())
        .collect();
    if !missing.is_empty() {
        return ValidationOutcome::from_diagnostics(
            vec![Diagnostic::batch(
                DiagnosticKind::Schema,
                format!("missing required columns: {}", missing.join(", ")),
            )],
            warnings,
        );
    }

    let extra = table.extra_columns();
    if !extra.is_empty() {
        let note = format!("ignoring extra columns: {}", extra.join(", "));
        warn!(columns = %extra.join(","), "Extra columns in batch");
        warnings.push(note);
    }

    let columns = ColumnPositions::locate(table);
    let mut diagnostics = Vec::new();

    let mut coerce = |column: Column| {
        coerce_column(table, columns.position(column), column, &mut diagnostics)
    };
    let rates = coerce(Column::Rate);
    let lines_over = coerce(Column::LineOver);
    let odds_over = coerce(Column::OddsOver);
    let lines_under = coerce(Column::LineUnder);
    let odds_under = coerce(Column::OddsUnder);

    for row in 0..table.len() {
        let subject = table
            .cell(row, columns.position(Column::Subject))
            .map(str::trim)
            .unwrap_or_default();
        let label = if subject.is_empty() {
            format!("row {}", row)
        } else {
            format!("row {} ({})", row, subject)
        };
        let mut violate = |message: String| {
            diagnostics.push(Diagnostic::rows(
                DiagnosticKind::BusinessRule,
                vec![row],
                format!("{}: {}", label, message),
            ));
        };

        if subject.is_empty() {
            violate("subject must not be blank".to_string());
        }

        if let Some(rate) = rates[row] {
            if rate <= 0.0 {
                violate(format!("rate must be greater than 0, got {}", rate));
            } else if rate > rules.max_rate {
                violate(format!("rate must be at most {}, got {}", rules.max_rate, rate));
            }
        }

        let odds = [
            (Column::OddsOver, odds_over[row]),
            (Column::OddsUnder, odds_under[row]),
        ];
        for (column, odds) in odds {
            if let Some(odds) = odds {
                if odds <= 1.0 {
                    violate(format!("{} must be greater than 1.0, got {}", column, odds));
                }
            }
        }

        let lines = [
            (Column::LineOver, lines_over[row]),
            (Column::LineUnder, lines_under[row]),
        ];
        for (column, line) in lines {
            if let Some(line) = line {
                if line < 0.0 {
                    violate(format!("{} must be non-negative, got {}", column, line));
                }
            }
        }

        if let (Some(over), Some(under)) = (lines_over[row], lines_under[row]) {
            if (over - under).abs() > rules.line_tolerance {
                violate(format!(
                    "{} ({}) and {} ({}) must be equal",
                    Column::LineOver,
                    over,
                    Column::LineUnder,
                    under
                ));
            }
        }
    }

    debug!(
        rows = table.len(),
        problems = diagnostics.len(),
        "Batch validation finished"
    );

    ValidationOutcome::from_diagnostics(diagnostics, warnings)
}

/// Parse one numeric column, reporting every bad row in a single diagnostic.
fn coerce_column(
    table: &RawTable,
    position: usize,
    column: Column,
    diagnostics: &mut Vec<Diagnostic>,
) -> Vec<Option<f64>> {
    let values: Vec<Option<f64>> = (0..table.len())
        .map(|row| table.cell(row, position).and_then(parse_number))
        .collect();

    let bad_rows: Vec<usize> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_none())
        .map(|(row, _)| row)
        .collect();
    if !bad_rows.is_empty() {
        let message = format!("non-numeric values in column '{}' (rows: {:?})", column, bad_rows);
        diagnostics.push(Diagnostic::rows(DiagnosticKind::Coercion, bad_rows, message));
    }

    values
}

/// Positions of the required columns in one table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ColumnPositions {
    positions: [usize; 6],
}

impl ColumnPositions {
    /// Locate every required column. Callers must have checked the schema.
    pub(crate) fn locate(table: &RawTable) -> Self {
        let mut positions = [usize::MAX; 6];
        for (slot, column) in Column::required().enumerate() {
            positions[slot] = table.column_index(column).unwrap_or(usize::MAX);
        }
        Self { positions }
    }

    /// Position of a column; `usize::MAX` when absent, which reads as a missing cell.
    pub(crate) fn position(&self, column: Column) -> usize {
        self.positions[column as usize]
    }
}
