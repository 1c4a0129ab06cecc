//! Unified error types for the analysis engine.

use thiserror::Error;

/// Unified error type for the crate.
#[derive(Error, Debug)]
pub enum PropEvError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Batch analysis error.
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Sheet reading/writing error.
    #[error("sheet error: {0}")]
    Sheet(#[from] SheetError),

    /// JSON serialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Batch-level analysis failures.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// The batch failed the validation gate. Carries every diagnostic.
    #[error("batch rejected with {} problem(s): {}", .diagnostics.len(), .diagnostics.join("; "))]
    Rejected {
        /// Human-readable diagnostics, in detection order.
        diagnostics: Vec<String>,
    },

    /// Every record was dropped while scoring.
    #[error("no records could be scored ({skipped} skipped)")]
    NoSurvivors {
        /// Number of records dropped.
        skipped: usize,
    },
}

/// Failure while scoring a single, already validated record.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProcessingError {
    /// Required cell missing from the row.
    #[error("row {row}: missing value for '{column}'")]
    MissingCell {
        /// Row index.
        row: usize,
        /// Column name.
        column: String,
    },

    /// Cell could not be read as a number.
    #[error("row {row}: '{value}' in '{column}' is not a number")]
    NotNumeric {
        /// Row index.
        row: usize,
        /// Column name.
        column: String,
        /// Offending cell content.
        value: String,
    },

    /// A computed quantity came out NaN or infinite.
    #[error("{subject}: {quantity} is not finite")]
    NonFinite {
        /// Subject being scored.
        subject: String,
        /// Name of the quantity.
        quantity: &'static str,
    },
}

/// Delimited-text reading and writing errors.
#[derive(Error, Debug)]
pub enum SheetError {
    /// File could not be read or written.
    #[error("failed to access {path}: {source}")]
    Io {
        /// File path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// File has no header row.
    #[error("sheet is empty")]
    EmptyFile,

    /// Row width differs from the header.
    #[error("line {line}: expected {expected} fields, found {found}")]
    RaggedRow {
        /// 1-based line number.
        line: usize,
        /// Header width.
        expected: usize,
        /// Row width.
        found: usize,
    },

    /// A quoted field never closes.
    #[error("line {line}: unterminated quoted field")]
    UnterminatedQuote {
        /// 1-based line number.
        line: usize,
    },

    /// Required column absent.
    #[error("missing column '{0}'")]
    MissingColumn(String),

    /// One or more cells failed validation.
    #[error("invalid sheet: {}", .problems.join("; "))]
    InvalidValues {
        /// Every problem found.
        problems: Vec<String>,
    },
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, PropEvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_lists_every_diagnostic() {
        let err = AnalysisError::Rejected {
            diagnostics: vec!["batch is empty".to_string(), "other".to_string()],
        };

        let msg = err.to_string();
        assert!(msg.contains("2 problem(s)"));
        assert!(msg.contains("batch is empty; other"));
    }

    #[test]
    fn processing_error_names_row_and_column() {
        let err = ProcessingError::NotNumeric {
            row: 3,
            column: "rate".to_string(),
            value: "abc".to_string(),
        };

        assert_eq!(err.to_string(), "row 3: 'abc' in 'rate' is not a number");
    }
}
