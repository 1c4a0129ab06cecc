//! Validation results.

use serde::Serialize;
use strum::Display;

use crate::error::AnalysisError;

/// Category of a validation problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The batch has no rows.
    #[strum(to_string = "empty")]
    Empty,
    /// Required columns are absent.
    #[strum(to_string = "schema")]
    Schema,
    /// A numeric column holds non-numeric content.
    #[strum(to_string = "coercion")]
    Coercion,
    /// A value breaks a bounds or equality rule.
    #[strum(to_string = "business_rule")]
    BusinessRule,
}

/// One problem found in a batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Problem category.
    pub kind: DiagnosticKind,
    /// Offending row indices (0-based, data rows only). Empty for batch-level problems.
    pub rows: Vec<usize>,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Create a batch-level diagnostic.
    pub fn batch(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            message: message.into(),
        }
    }

    /// Create a diagnostic for specific rows.
    pub fn rows(kind: DiagnosticKind, rows: Vec<usize>, message: impl Into<String>) -> Self {
        Self {
            kind,
            rows,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Result of checking one batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationOutcome {
    /// Whether the batch may be scored.
    pub valid: bool,
    /// Problems in detection order. Empty iff `valid`.
    pub diagnostics: Vec<Diagnostic>,
    /// Non-fatal notes, e.g. ignored extra columns.
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    /// Build an outcome from collected diagnostics.
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>, warnings: Vec<String>) -> Self {
        Self {
            valid: diagnostics.is_empty(),
            diagnostics,
            warnings,
        }
    }

    /// Diagnostic messages in order.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.message.clone()).collect()
    }

    /// Check whether any diagnostic mentions a row.
    pub fn flags_row(&self, row: usize) -> bool {
        self.diagnostics.iter().any(|d| d.rows.contains(&row))
    }

    /// Convert into the gate decision, keeping the warnings on success.
    pub fn into_result(self) -> Result<Vec<String>, AnalysisError> {
        if self.valid {
            Ok(self.warnings)
        } else {
            Err(AnalysisError::Rejected {
                diagnostics: self.messages(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outcome_without_diagnostics_is_valid() {
        let outcome = ValidationOutcome::from_diagnostics(vec![], vec!["extra".to_string()]);

        assert!(outcome.valid);
        assert_eq!(outcome.into_result().unwrap(), vec!["extra".to_string()]);
    }

    #[test]
    fn outcome_with_diagnostics_rejects_with_all_messages() {
        let outcome = ValidationOutcome::from_diagnostics(
            vec![
                Diagnostic::rows(DiagnosticKind::BusinessRule, vec![0], "first"),
                Diagnostic::rows(DiagnosticKind::BusinessRule, vec![2], "second"),
            ],
            vec![],
        );

        assert!(!outcome.valid);
        assert!(outcome.flags_row(2));
        assert!(!outcome.flags_row(1));
        assert_eq!(
            outcome.into_result().unwrap_err(),
            AnalysisError::Rejected {
                diagnostics: vec!["first".to_string(), "second".to_string()],
            }
        );
    }
}
