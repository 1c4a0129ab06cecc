//! Raw tabular batches.

use strum::{Display, EnumIter, IntoEnumIterator};

use super::types::BettingRecord;

/// Required input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Column {
    #[strum(to_string = "subject")]
    Subject,
    #[strum(to_string = "rate")]
    Rate,
    #[strum(to_string = "lineOver")]
    LineOver,
    #[strum(to_string = "oddsOver")]
    OddsOver,
    #[strum(to_string = "lineUnder")]
    LineUnder,
    #[strum(to_string = "oddsUnder")]
    OddsUnder,
}

impl Column {
    /// Columns that must hold numbers, in report order.
    pub const NUMERIC: [Column; 5] = [
        Column::Rate,
        Column::LineOver,
        Column::OddsOver,
        Column::LineUnder,
        Column::OddsUnder,
    ];

    /// All required columns in schema order.
    pub fn required() -> impl Iterator<Item = Column> {
        Column::iter()
    }

    /// Normalized header names accepted for this column.
    fn accepted(&self) -> &'static [&'static str] {
        match self {
            Column::Subject => &["subject", "player"],
            Column::Rate => &["rate", "avgkills"],
            Column::LineOver => &["lineover"],
            Column::OddsOver => &["oddsover"],
            Column::LineUnder => &["lineunder"],
            Column::OddsUnder => &["oddsunder"],
        }
    }

    /// Check whether a header names this column.
    pub fn matches(&self, header: &str) -> bool {
        let normalized = normalize_header(header);
        self.accepted().contains(&normalized.as_str())
    }
}

/// Lowercase a header and drop separators, so `lineOver`, `line_over`
/// and `LINE OVER` compare equal.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Tabular batch of string cells, one row per subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Header row.
    pub headers: Vec<String>,
    /// Data rows. Each row has one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Build a table with the canonical schema from typed records.
    ///
    /// Numbers are written in their shortest round-trip form, so parsing
    /// the table back yields bit-identical values.
    pub fn from_records(records: &[BettingRecord]) -> Self {
        let headers = Column::required().map(|c| c.to_string()).collect();
        let rows = records
            .iter()
            .map(|r| {
                vec![
                    r.subject.clone(),
                    r.rate.to_string(),
                    r.line_over.to_string(),
                    r.odds_over.to_string(),
                    r.line_under.to_string(),
                    r.odds_under.to_string(),
                ]
            })
            .collect();
        Self { headers, rows }
    }

    /// Number of data rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no data rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Find the position of a required column.
    pub fn column_index(&self, column: Column) -> Option<usize> {
        self.headers.iter().position(|h| column.matches(h))
    }

    /// Headers that do not map to any required column.
    pub fn extra_columns(&self) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|h| !Column::required().any(|c| c.matches(h)))
            .map(String::as_str)
            .collect()
    }

    /// Get a cell by row and column position.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }
}
